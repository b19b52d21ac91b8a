//! Application Configuration
//! Data directory and cache settings from defaults, an optional JSON file,
//! and environment overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Optional configuration file read from the working directory.
pub const CONFIG_FILE: &str = "fleetlens.json";

/// Environment override for the data directory.
pub const ENV_DATA_DIR: &str = "FLEETLENS_DATA_DIR";
/// Environment override for the cache expiry, in seconds.
pub const ENV_CACHE_TTL: &str = "FLEETLENS_CACHE_TTL_SECS";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Runtime configuration for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory containing `vehicles.csv` and `rentals.csv`.
    pub data_dir: PathBuf,
    /// Loaded-data cache expiry in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl AppConfig {
    /// Resolve configuration: defaults, then `fleetlens.json` if present,
    /// then environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file(CONFIG_FILE).unwrap_or_default();
        config.apply_env();
        config
    }

    /// Parse a configuration file, if it exists and is valid JSON.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring invalid {}: {}", path, e);
                None
            }
        }
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(ttl) = std::env::var(ENV_CACHE_TTL) {
            match ttl.parse::<u64>() {
                Ok(secs) => self.cache_ttl_secs = secs,
                Err(_) => log::warn!("Ignoring non-numeric {}: {}", ENV_CACHE_TTL, ttl),
            }
        }
    }

    /// Cache expiry as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Path of the vehicles dataset.
    pub fn vehicles_path(&self) -> PathBuf {
        self.data_dir.join("vehicles.csv")
    }

    /// Path of the rentals dataset.
    pub fn rentals_path(&self) -> PathBuf {
        self.data_dir.join("rentals.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.vehicles_path(), PathBuf::from("data/vehicles.csv"));
        assert_eq!(config.rentals_path(), PathBuf::from("data/rentals.csv"));
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"data_dir": "/srv/fleet"}"#).unwrap();
        assert_eq!(parsed.data_dir, PathBuf::from("/srv/fleet"));
        assert_eq!(parsed.cache_ttl_secs, 300);
    }
}
