//! TOML configuration file
//!
//! ```toml
//! [database]
//! path = ".navdeck/navdeck.db"
//! busy_timeout_ms = 5000
//!
//! [logging]
//! profile = "development"
//! ```

use std::path::{Path, PathBuf};

use navdeck_core::logging_facility::Profile;
use navdeck_store::StoreConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "navdeck.toml";
pub const DEFAULT_DB_PATH: &str = ".navdeck/navdeck.db";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout_ms: StoreConfig::default().busy_timeout_ms,
        }
    }
}

impl DatabaseConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}

/// Logging stays off unless a profile is configured
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Option<Profile>,
}

impl CliConfig {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `explicit`, or `navdeck.toml` in the working directory if present
    ///
    /// A missing explicit file is an error; a missing default file means
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
        Ok(Self::parse(&text)?)
    }
}
