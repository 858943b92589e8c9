//! Saved threshold persistence.
//!
//! Lets the daemon start without arguments by remembering the last pair
//! given with `--save`. Values are stored in millidegrees Celsius, the same
//! convention as the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::Thresholds;
use crate::error::{FanError, Result};

// =============================================================================
// Config Path
// =============================================================================

const APP_NAME: &str = "gpu-fan-control";
const CONFIG_FILE: &str = "config.json";

/// Get the configuration directory path (`~/.config/gpu-fan-control/`).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or_else(|| FanError::Storage("Could not find config directory".into()))
}

/// Get the full path to the config file.
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

// =============================================================================
// Storage Structures
// =============================================================================

/// Threshold pair as written to `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredThresholds {
    /// 0% duty temperature in millidegrees Celsius
    pub min_temp: i64,
    /// 100% duty temperature in millidegrees Celsius
    pub max_temp: i64,
}

impl StoredThresholds {
    /// Validate into ordered [`Thresholds`].
    pub fn to_thresholds(&self) -> Result<Thresholds> {
        Thresholds::from_millicelsius(self.min_temp, self.max_temp)
    }
}

impl From<&Thresholds> for StoredThresholds {
    fn from(t: &Thresholds) -> Self {
        Self {
            min_temp: t.min().millicelsius(),
            max_temp: t.max().millicelsius(),
        }
    }
}

// =============================================================================
// Storage Functions
// =============================================================================

/// Load thresholds from `path`, `None` if the file does not exist.
pub fn load_thresholds_from(path: &Path) -> Result<Option<StoredThresholds>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| FanError::Storage(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| FanError::Storage(format!("Failed to parse config: {}", e)))
}

/// Save thresholds to `path`, creating parent directories as needed.
pub fn save_thresholds_to(path: &Path, thresholds: &StoredThresholds) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| FanError::Storage(format!("Failed to create config dir: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(thresholds)
        .map_err(|e| FanError::Storage(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(path, content)
        .map_err(|e| FanError::Storage(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Load thresholds from the default config file.
pub fn load_thresholds() -> Result<Option<StoredThresholds>> {
    load_thresholds_from(&get_config_path()?)
}

/// Save thresholds to the default config file, returning its path.
pub fn save_thresholds(thresholds: &StoredThresholds) -> Result<PathBuf> {
    let path = get_config_path()?;
    save_thresholds_to(&path, thresholds)?;
    Ok(path)
}
