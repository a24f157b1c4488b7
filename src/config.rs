//! Service configuration, read from the environment.

use crate::error::AppError;

/// Port used when `CHARGEPULSE_PORT` is unset.
const DEFAULT_PORT: u16 = 3000;

/// Radius for nearby listings when neither the request nor
/// `CHARGEPULSE_NEARBY_RADIUS_KM` sets one.
const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub nearby_radius_km: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            nearby_radius_km: DEFAULT_NEARBY_RADIUS_KM,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let nearby_radius_km = parse_or_default(
            &lookup,
            "CHARGEPULSE_NEARBY_RADIUS_KM",
            DEFAULT_NEARBY_RADIUS_KM,
        )?;
        if !(nearby_radius_km.is_finite() && nearby_radius_km > 0.0) {
            return Err(AppError::config(
                "CHARGEPULSE_NEARBY_RADIUS_KM must be a positive number",
            ));
        }

        Ok(Self {
            port: parse_or_default(&lookup, "CHARGEPULSE_PORT", DEFAULT_PORT)?,
            nearby_radius_km,
        })
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, crate::error::AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.nearby_radius_km, 10.0);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CHARGEPULSE_PORT", " 8080 "),
            ("CHARGEPULSE_NEARBY_RADIUS_KM", "25"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.nearby_radius_km, 25.0);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("CHARGEPULSE_PORT", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_rejects_invalid_port() {
        let err = config_from(&[("CHARGEPULSE_PORT", "http")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: CHARGEPULSE_PORT must be a valid number"
        );
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(config_from(&[("CHARGEPULSE_NEARBY_RADIUS_KM", "0")]).is_err());
        assert!(config_from(&[("CHARGEPULSE_NEARBY_RADIUS_KM", "-5")]).is_err());
        assert!(config_from(&[("CHARGEPULSE_NEARBY_RADIUS_KM", "far")]).is_err());
    }
}
