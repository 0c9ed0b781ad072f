mod app_config;
mod city_directory;

pub use app_config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, GeoConfig, ServerConfig};
pub use city_directory::{CityDirectory, Coordinates};
