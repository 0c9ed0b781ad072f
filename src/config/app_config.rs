use crate::{
    config::CityDirectory,
    error::{AppError, Result},
};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub geo: GeoConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_cost: u32,
}

#[derive(Debug, Clone)]
pub struct GeoConfig {
    pub ip_api_url: String,
    pub ip_api_key: Option<String>,
    pub cities: CityDirectory,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "1048576".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")
                    .map_err(|_| AppError::ConfigError("JWT_SECRET not set".to_string()))?,
                token_ttl_hours: env::var("JWT_TTL_HOURS")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid JWT_TTL_HOURS value".to_string()))?,
                password_cost: env::var("BCRYPT_COST")
                    .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid BCRYPT_COST value".to_string()))?,
            },
            geo: GeoConfig {
                ip_api_url: env::var("IP_API_URL")
                    .unwrap_or_else(|_| "https://api.ipapi.com/api".to_string()),
                ip_api_key: env::var("ACCESS_KEY_IP_API").ok(),
                cities: match env::var("CITY_COORDINATES") {
                    Ok(raw) => CityDirectory::from_json(&raw)?,
                    Err(_) => CityDirectory::default(),
                },
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
