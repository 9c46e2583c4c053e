//! Configuration file support for expcalc.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/expcalc/config.toml`.

use crate::curve::{DECAY_HORIZON_FACTOR, DEFAULT_SAMPLES};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on configured decimals; f64 carries about 15-17 significant digits
const MAX_DECIMALS: usize = 15;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub curve: CurveConfig,
}

/// Result formatting configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Decimals for quantities, temperatures and times
    #[serde(default = "default_value_decimals")]
    pub value_decimals: usize,

    /// Decimals for decay and cooling constants
    #[serde(default = "default_rate_decimals")]
    pub rate_decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            value_decimals: default_value_decimals(),
            rate_decimals: default_rate_decimals(),
        }
    }
}

/// Curve export configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CurveConfig {
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Curve horizon as a multiple of the queried time
    #[serde(default = "default_horizon_factor")]
    pub horizon_factor: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            horizon_factor: default_horizon_factor(),
        }
    }
}

// Default value functions
fn default_value_decimals() -> usize {
    4
}

fn default_rate_decimals() -> usize {
    6
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

fn default_horizon_factor() -> f64 {
    DECAY_HORIZON_FACTOR
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            Some(config_path) => {
                tracing::info!("No config file found at {:?}, using defaults", config_path);
                Ok(Self::default())
            }
            None => {
                tracing::info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("expcalc").join("config.toml"))
    }

    /// Reject values the calculators cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.display.value_decimals > MAX_DECIMALS || self.display.rate_decimals > MAX_DECIMALS {
            return Err(Error::Config(format!(
                "decimals must be at most {}",
                MAX_DECIMALS
            )));
        }

        if self.curve.samples < 2 {
            return Err(Error::Config(format!(
                "curve.samples must be at least 2, got {}",
                self.curve.samples
            )));
        }

        if self.curve.horizon_factor <= 0.0 || self.curve.horizon_factor.is_nan() {
            return Err(Error::Config(format!(
                "curve.horizon_factor must be positive, got {}",
                self.curve.horizon_factor
            )));
        }

        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.value_decimals, 4);
        assert_eq!(config.display.rate_decimals, 6);
        assert_eq!(config.curve.samples, 500);
        assert_eq!(config.curve.horizon_factor, 1.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[display]
rate_decimals = 8
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.display.rate_decimals, 8);
        assert_eq!(config.display.value_decimals, 4); // default
        assert_eq!(config.curve.samples, 500); // default
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.curve.samples = 1;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.curve.horizon_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.value_decimals = 40;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.curve.samples = 120;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[curve]\nsamples = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
