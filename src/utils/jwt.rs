use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    error::{AppError, Result},
    models::User,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

pub fn generate_token(config: &AuthConfig, user: &User) -> Result<String> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(config.token_ttl_hours))
        .ok_or_else(|| AppError::InternalError("Failed to calculate expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {}", e)))
}

pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl_hours: 24,
            password_cost: 4,
        }
    }

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "hash".to_string(),
            role: "admin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let config = config("secret");
        let token = generate_token(&config, &user()).unwrap();
        let claims = verify_token(&config, &token).unwrap();

        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_token(&config("one"), &user()).unwrap();
        assert!(matches!(
            verify_token(&config("two"), &token),
            Err(AppError::Unauthorized(_))
        ));
    }
}
