use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Read-only city coordinate table, built once at startup.
#[derive(Debug, Clone)]
pub struct CityDirectory {
    cities: HashMap<String, Coordinates>,
}

impl CityDirectory {
    pub fn new(cities: HashMap<String, Coordinates>) -> Self {
        Self { cities }
    }

    /// Parses `{"Paris": {"lat": 48.85, "lon": 2.35}, ...}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cities: HashMap<String, Coordinates> = serde_json::from_str(raw).map_err(|e| {
            AppError::ConfigError(format!("Invalid CITY_COORDINATES value: {}", e))
        })?;

        Ok(Self::new(cities))
    }

    pub fn get(&self, city: &str) -> Option<Coordinates> {
        self.cities.get(city).copied()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for CityDirectory {
    fn default() -> Self {
        let cities = [
            ("Paris", 48.8566, 2.3522),
            ("Bordeaux", 44.8378, -0.5792),
            ("Lyon", 45.7640, 4.8357),
            ("Toulouse", 43.6047, 1.4442),
            ("Marseille", 43.2965, 5.3698),
        ]
        .into_iter()
        .map(|(name, lat, lon)| (name.to_string(), Coordinates { lat, lon }))
        .collect();

        Self::new(cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_builtin_cities() {
        let directory = CityDirectory::default();
        assert_eq!(directory.len(), 5);
        assert_eq!(
            directory.get("Lyon"),
            Some(Coordinates {
                lat: 45.7640,
                lon: 4.8357
            })
        );
        assert!(directory.get("Berlin").is_none());
    }

    #[test]
    fn parses_json_override() {
        let directory =
            CityDirectory::from_json(r#"{"Nantes": {"lat": 47.2184, "lon": -1.5536}}"#).unwrap();
        assert_eq!(directory.len(), 1);
        assert!(directory.get("Nantes").is_some());
        assert!(directory.get("Paris").is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            CityDirectory::from_json("Paris=48.8,2.3"),
            Err(AppError::ConfigError(_))
        ));
    }
}
