use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::cors::CorsLayer;

use crate::{
    config::{AppConfig, AuthConfig, GeoConfig},
    database,
    error::{AppError, Result},
    repository::{CatalogRepository, PgCatalogRepository, PgUserRepository, UserRepository},
    routes,
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub users: Arc<dyn UserRepository>,
    pub auth: AuthConfig,
    pub geo: Arc<GeoConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        users: Arc<dyn UserRepository>,
        auth: AuthConfig,
        geo: GeoConfig,
    ) -> Self {
        Self {
            catalog,
            users,
            auth,
            geo: Arc::new(geo),
            http: reqwest::Client::new(),
        }
    }
}

/// Routes plus body limit, without CORS. `with_state` is already applied.
pub fn router(state: AppState, max_body_size: usize) -> Router {
    routes::create_router(&state)
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let state = AppState::new(
        Arc::new(PgCatalogRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool)),
        config.auth.clone(),
        config.geo.clone(),
    );

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .expose_headers([http::header::CONTENT_DISPOSITION])
        .allow_origin(allowed_origins);

    Ok(router(state, config.server.max_body_size).layer(cors))
}
