use serde::Deserialize;

use crate::{
    config::{Coordinates, GeoConfig},
    error::{AppError, Result},
};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Deserialize)]
struct IpLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Looks up the coordinates of `ip` through the configured IP API.
pub async fn locate_ip(client: &reqwest::Client, config: &GeoConfig, ip: &str) -> Result<Coordinates> {
    let access_key = config
        .ip_api_key
        .as_deref()
        .ok_or_else(|| AppError::ConfigError("ACCESS_KEY_IP_API not set".to_string()))?;

    let url = format!("{}/{}", config.ip_api_url.trim_end_matches('/'), ip);

    let location: IpLocation = client
        .get(&url)
        .query(&[("access_key", access_key)])
        .send()
        .await
        .map_err(|e| AppError::InternalError(format!("IP location request failed: {}", e)))?
        .error_for_status()
        .map_err(|e| AppError::InternalError(format!("IP location request failed: {}", e)))?
        .json()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to parse IP location: {}", e)))?;

    match (location.latitude, location.longitude) {
        (Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
        _ => Err(AppError::InternalError(format!(
            "IP location has no coordinates for {}",
            ip
        ))),
    }
}
