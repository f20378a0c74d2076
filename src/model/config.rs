use std::fs;
use std::path::Path;

use bevy::prelude::*;
use cfg_if::cfg_if;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_PATH: &str = "surface_gravity.json";

/// Global tuning of the gravity resolver.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// How fast `local_up` turns towards the surface, per second.
    pub reorient_rate: f32,
    /// How far a surface probe reaches. Independent of any source's range.
    pub max_probe_distance: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        GravityConfig {
            reorient_rate: 10.0,
            max_probe_distance: 1000.0,
        }
    }
}

impl GravityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.reorient_rate.is_finite() && self.reorient_rate > 0.0) {
            return Err(ConfigError::Invalid("reorient_rate must be positive"));
        }
        if !(self.max_probe_distance.is_finite() && self.max_probe_distance > 0.0) {
            return Err(ConfigError::Invalid("max_probe_distance must be positive"));
        }
        Ok(())
    }
}

pub fn persist_config(path: impl AsRef<Path>, config: &GravityConfig) -> Result<(), ConfigError> {
    let contents = serde_json::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

pub fn read_config(path: impl AsRef<Path>) -> Result<GravityConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GravityConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Reads the config from `path`, falling back to the defaults. Never writes.
pub fn config_or_default(path: impl AsRef<Path>) -> GravityConfig {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            let _ = path;
            GravityConfig::default()
        } else {
            read_config(path).unwrap_or_else(|e| {
                info!("Using default gravity config ({})", e);
                GravityConfig::default()
            })
        }
    }
}

/// Loads the config from `path`, falling back to (and writing back) the defaults when the
/// file is missing or invalid.
pub fn load_config(path: impl AsRef<Path>) -> GravityConfig {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            let _ = path;
            GravityConfig::default()
        } else {
            let path = path.as_ref();
            match read_config(path) {
                Ok(config) => config,
                Err(e) => {
                    info!("Using default gravity config ({})", e);
                    let config = GravityConfig::default();
                    if let Err(e) = persist_config(path, &config) {
                        error!("Failed to persist gravity config: {:#}", e);
                    }
                    config
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_and_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gravity.json");

        assert_eq!(load_config(&path), GravityConfig::default());
        assert_eq!(read_config(&path).unwrap(), GravityConfig::default());
    }

    #[test]
    fn config_or_default_leaves_the_disk_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gravity.json");

        assert_eq!(config_or_default(&path), GravityConfig::default());
        assert!(!path.exists());

        fs::write(&path, r#"{ "max_probe_distance": 50.0 }"#).unwrap();
        assert_eq!(config_or_default(&path).max_probe_distance, 50.0);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gravity.json");
        fs::write(&path, r#"{ "reorient_rate": 4.0 }"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.reorient_rate, 4.0);
        assert_eq!(config.max_probe_distance, 1000.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gravity.json");
        fs::write(&path, r#"{ "max_probe_distance": -1.0 }"#).unwrap();

        assert!(matches!(read_config(&path), Err(ConfigError::Invalid(_))));
        assert_eq!(load_config(&path), GravityConfig::default());
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gravity.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(read_config(&path), Err(ConfigError::Serde(_))));
    }
}
