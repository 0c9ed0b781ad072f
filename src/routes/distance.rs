use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Query, Request, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::{AppError, Result},
    services::geo_service,
    utils::extractors::client_ip,
};

#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    pub city: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub ip: String,
    pub user_lat: f64,
    pub user_lon: f64,
    pub city: String,
    pub city_lat: f64,
    pub city_lon: f64,
    pub distance: String,
}

/// Distance between the caller's IP location and a known city.
pub async fn calculate_distance(
    State(state): State<AppState>,
    Query(params): Query<DistanceParams>,
    request: Request,
) -> Result<Json<DistanceResponse>> {
    let city = params
        .city
        .map(|city| city.trim().to_string())
        .filter(|city| !city.is_empty())
        .ok_or_else(|| AppError::BadRequest("city is required".to_string()))?;

    let city_coords = state
        .geo
        .cities
        .get(&city)
        .ok_or_else(|| AppError::BadRequest(format!("No coordinates known for {}", city)))?;

    let connect_info = request.extensions().get::<ConnectInfo<SocketAddr>>();
    let ip = client_ip(request.headers(), connect_info)
        .ok_or_else(|| AppError::BadRequest("Could not determine client IP".to_string()))?;

    let user_coords = geo_service::locate_ip(&state.http, &state.geo, &ip).await?;
    let distance = geo_service::haversine_km(user_coords, city_coords);

    tracing::debug!(%ip, %city, distance, "Computed distance");

    Ok(Json(DistanceResponse {
        ip,
        user_lat: user_coords.lat,
        user_lon: user_coords.lon,
        city,
        city_lat: city_coords.lat,
        city_lon: city_coords.lon,
        distance: format!("{:.2} km", distance),
    }))
}
