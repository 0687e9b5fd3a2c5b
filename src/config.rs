//! Configuration management for anvil.
//!
//! This module handles the layered configuration system with the following
//! precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AnvilError, Result};

/// Command-line arguments for anvil
#[derive(Parser, Debug)]
#[command(name = "anvil")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Root of the frame archive (frames at <dir>/YYYY/MM/YYYYMMDDHHMM.nc)
    pub data_dir: PathBuf,

    /// Host address to bind to
    #[arg(short = 'H', long, env = "ANVIL_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "ANVIL_PORT", default_value = "8000")]
    pub port: u16,

    /// Path to JSON configuration file
    #[arg(short, long, env = "ANVIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ANVIL_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Geographic bounds of the data domain, used by the viewer to anchor
/// overlays. Defaults cover the Southern-Africa Meteosat domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoBounds {
    #[serde(default = "default_lat_min")]
    pub lat_min: f64,
    #[serde(default = "default_lat_max")]
    pub lat_max: f64,
    #[serde(default = "default_lon_min")]
    pub lon_min: f64,
    #[serde(default = "default_lon_max")]
    pub lon_max: f64,
}

/// Data and rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root of the frame archive
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Geographic bounds of the grid
    #[serde(default)]
    pub bounds: GeoBounds,

    /// Maximum number of rendered overlays kept in memory
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        let args = Args::parse();
        Self::from_args(args)
    }

    /// Build the configuration from already-parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        config.server.host = args.host;
        config.server.port = args.port;
        config.log_level = args.log_level;
        config.data.data_dir = Some(args.data_dir);

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.server = other.server;
        self.data = other.data;
        self.log_level = other.log_level;
    }

    /// The configured archive root; validation guarantees it is set.
    pub fn data_dir(&self) -> &PathBuf {
        self.data
            .data_dir
            .as_ref()
            .expect("data_dir is validated at startup")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(AnvilError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(AnvilError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(AnvilError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        if self.data.data_dir.is_none() {
            return Err(AnvilError::Config {
                message: "Data directory is not set".to_string(),
            });
        }

        if self.data.cache_capacity == 0 {
            return Err(AnvilError::Config {
                message: "Render cache capacity cannot be 0".to_string(),
            });
        }

        let b = &self.data.bounds;
        if !(b.lat_min < b.lat_max) || !(b.lon_min < b.lon_max) {
            return Err(AnvilError::Config {
                message: format!(
                    "Invalid bounds: lat {}..{}, lon {}..{}",
                    b.lat_min, b.lat_max, b.lon_min, b.lon_max
                ),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            bounds: GeoBounds::default(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self {
            lat_min: default_lat_min(),
            lat_max: default_lat_max(),
            lon_min: default_lon_min(),
            lon_max: default_lon_max(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cache_capacity() -> usize {
    96
}

fn default_lat_min() -> f64 {
    -41.989723
}

fn default_lat_max() -> f64 {
    27.232262
}

fn default_lon_min() -> f64 {
    -27.161226
}

fn default_lon_max() -> f64 {
    79.549774
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data.cache_capacity, 96);
        assert!(config.data.data_dir.is_none());
    }

    #[test]
    fn test_default_bounds_cover_southern_africa() {
        let bounds = GeoBounds::default();
        assert!(bounds.lat_min < bounds.lat_max);
        assert!(bounds.lon_min < bounds.lon_max);
        assert!(bounds.lat_min < -40.0 && bounds.lat_max > 27.0);
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.server.port = 9000;
        config2.data.cache_capacity = 8;

        config1.merge(config2);

        assert_eq!(config1.server.port, 9000);
        assert_eq!(config1.data.cache_capacity, 8);
    }

    #[test]
    fn test_config_validation() {
        // A config with a data dir should pass
        let mut config = Config::default();
        config.data.data_dir = Some(PathBuf::from("/data"));
        assert!(config.validate().is_ok());

        // Missing data dir
        let config = Config::default();
        assert!(config.validate().is_err());

        // Test invalid host
        let mut config = Config::default();
        config.data.data_dir = Some(PathBuf::from("/data"));
        config.server.host = "".to_string();
        assert!(config.validate().is_err());

        // Test invalid port
        let mut config = Config::default();
        config.data.data_dir = Some(PathBuf::from("/data"));
        config.server.port = 0;
        assert!(config.validate().is_err());

        // Test invalid log level
        let mut config = Config::default();
        config.data.data_dir = Some(PathBuf::from("/data"));
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        // Test zero cache capacity
        let mut config = Config::default();
        config.data.data_dir = Some(PathBuf::from("/data"));
        config.data.cache_capacity = 0;
        assert!(config.validate().is_err());

        // Test inverted bounds
        let mut config = Config::default();
        config.data.data_dir = Some(PathBuf::from("/data"));
        config.data.bounds.lat_min = 50.0;
        config.data.bounds.lat_max = -50.0;
        assert!(config.validate().is_err());
    }
}
