use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthResponse, DEFAULT_ROLE, NewUser, SignInRequest, SignUpRequest, SignUpResponse},
    utils::jwt,
};

const MIN_PASSWORD_LEN: usize = 6;

pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    let email = payload.email.trim().to_lowercase();
    let name = payload.name.trim().to_string();

    validate_email(&email)?;
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    validate_password(&payload.password)?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, state.auth.password_cost)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let role = payload
        .role
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .unwrap_or_else(|| DEFAULT_ROLE.to_string());

    let user = state
        .users
        .create_user(NewUser {
            name,
            email,
            password_hash,
            role,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(SignUpResponse::from(user))))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<AuthResponse>> {
    let email = payload.email.trim().to_lowercase();

    validate_email(&email)?;
    validate_password(&payload.password)?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let is_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    let token = jwt::generate_token(&state.auth, &user)?;

    Ok(Json(AuthResponse { token }))
}

fn validate_email(email: &str) -> Result<()> {
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_only_needs_an_at_sign() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("ana@localhost").is_ok());
        assert!(validate_email("ana.example.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
