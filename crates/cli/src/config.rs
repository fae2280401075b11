//! TOML configuration for the `beacon` binary.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use beacon_core::{CadenceConfig, MILLIS_IN_A_DAY, MILLIS_IN_A_WEEK};

/// The `beacon.toml` document.
#[derive(Debug, Deserialize)]
pub struct BeaconConfig {
    /// Base URL of the usage endpoint, without a query string.
    pub endpoint: String,
    /// Fixed platform identifier.
    pub platform: String,
    /// Fixed release channel identifier.
    pub channel: String,
    /// App version string to report.
    pub version: String,
    /// Location of the JSON watermark store.
    pub data_path: PathBuf,
    /// Cadence threshold overrides, for testing against staging endpoints.
    #[serde(default)]
    pub cadence: CadenceSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CadenceSection {
    pub day_millis: i64,
    pub week_millis: i64,
}

impl Default for CadenceSection {
    fn default() -> Self {
        Self {
            day_millis: MILLIS_IN_A_DAY,
            week_millis: MILLIS_IN_A_WEEK,
        }
    }
}

impl BeaconConfig {
    pub fn cadence_config(&self) -> CadenceConfig {
        CadenceConfig {
            day_millis: self.cadence.day_millis,
            week_millis: self.cadence.week_millis,
        }
    }
}

/// Load and parse a config file, with a readable error for the CLI.
pub fn load_config(path: &Path) -> Result<BeaconConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}
