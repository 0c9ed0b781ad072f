use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError, utils::jwt};

/// Rejects requests without a valid bearer token; stores the claims otherwise.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing token".to_string()))?;

    let token = match auth_header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            token.trim()
        }
        _ => return Err(AppError::Unauthorized("invalid bearer token".to_string())),
    };

    let claims = jwt::verify_token(&state.auth, token).map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        AppError::Unauthorized("invalid token".to_string())
    })?;

    tracing::debug!(user = %claims.email, "Token verified");
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
