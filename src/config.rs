/// Service configuration loader - parses aqmon.toml
///
/// Keeps source paths, header aliases and server settings out of the code,
/// making it easy to point the service at a new export or rename a column
/// without recompiling.
///
/// Precedence (lowest to highest): built-in defaults, aqmon.toml, the `PORT`
/// environment variable (also read from `.env`), command-line flags.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use log::warn;

use crate::model::FuelFootprint;

pub const DEFAULT_CONFIG_PATH: &str = "aqmon.toml";
pub const CONFIG_PATH_ENV: &str = "AQMON_CONFIG";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WORKERS: usize = 4;

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub sources: SourceConfig,
    /// Extra header aliases per dataset, keyed by logical field name.
    pub aliases: AliasConfig,
    /// Static fuel table served when the footprint source has no fuel column.
    pub water_fuel: Vec<FuelFootprint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Number of request-handling threads.
    pub workers: usize,
    /// Enables `POST /api/reload`.
    pub allow_reload: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub monitors: PathBuf,
    pub facilities: PathBuf,
    pub footprints: PathBuf,
    pub facility_refresh: FacilityRefresh,
}

/// Whether the facility dataset is re-read on every request (picks up live
/// file edits) or loaded once with the other datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityRefresh {
    PerRequest,
    Cached,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AliasConfig {
    pub monitors: HashMap<String, Vec<String>>,
    pub facilities: HashMap<String, Vec<String>>,
    pub footprints: HashMap<String, Vec<String>>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sources: SourceConfig::default(),
            aliases: AliasConfig::default(),
            water_fuel: default_water_fuel(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            allow_reload: false,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            monitors: PathBuf::from("data/annual_conc_by_monitor.csv"),
            facilities: PathBuf::from("data/data_centers.csv"),
            footprints: PathBuf::from("data/water_footprint.csv"),
            facility_refresh: FacilityRefresh::PerRequest,
        }
    }
}

/// Per-fuel water footprint totals published with the first release of the
/// dashboard.
pub fn default_water_fuel() -> Vec<FuelFootprint> {
    vec![
        FuelFootprint { primary_fuel: "PUR".to_string(), water_footprint: 0.0 },
        FuelFootprint { primary_fuel: "WAT".to_string(), water_footprint: 728516.30 },
        FuelFootprint { primary_fuel: "WDS".to_string(), water_footprint: 73098.11 },
    ]
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads configuration from `$AQMON_CONFIG`, or `aqmon.toml` in the current
/// working directory.
pub fn load_config() -> Result<ServiceConfig, ConfigError> {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(Path::new(&path))
}

/// Loads configuration from a specific file.
///
/// A missing file is not an error: defaults are used and a warning logged.
/// A file that exists but cannot be read or parsed is an error, since
/// silently ignoring a broken config would serve the wrong data.
pub fn load_config_from(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} not found, using default configuration", path.display());
            return Ok(ServiceConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config: ServiceConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == 0 {
            return Err(ConfigError::InvalidValue(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies the `PORT` environment variable, loading `.env` first.
    pub fn apply_env(&mut self) {
        dotenv::dotenv().ok();
        if let Some(port) = parse_port(env::var(PORT_ENV).ok().as_deref()) {
            self.server.port = port;
        }
    }
}

/// Parses a port value; unparseable values are logged and ignored.
pub fn parse_port(value: Option<&str>) -> Option<u16> {
    let value = value?.trim();
    match value.parse::<u16>() {
        Ok(port) => Some(port),
        Err(e) => {
            warn!("Ignoring invalid {} value {:?}: {}", PORT_ENV, value, e);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
