use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(sqlx::Error),
    ConfigError(String),
    InternalError(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    /// A category/supplier id that names no existing record.
    InvalidReference(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "database error: {}", e),
            AppError::ConfigError(msg) => write!(f, "configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "forbidden: {}", msg),
            AppError::InvalidReference(msg) => write!(f, "invalid reference: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::DatabaseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::ConfigError(format!("migration failed: {}", err))
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::ConfigError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::DatabaseError(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "database error"
            }
            AppError::ConfigError(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                "server configuration error"
            }
            AppError::InternalError(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "internal server error"
            }
            AppError::NotFound(ref msg)
            | AppError::BadRequest(ref msg)
            | AppError::Conflict(ref msg)
            | AppError::Unauthorized(ref msg)
            | AppError::Forbidden(ref msg)
            | AppError::InvalidReference(ref msg) => msg.as_str(),
        };

        let body = Json(json!({
            "message": error_message,
        }));

        (status, body).into_response()
    }
}
