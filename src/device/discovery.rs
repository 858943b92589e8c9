//! Locating the amdgpu hwmon directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::device::hwmon::{DUTY_CHANNEL, MODE_CHANNEL, TEMP_CHANNEL};
use crate::error::{FanError, Result};

/// Root used on a real system.
pub const DEFAULT_SYSFS_ROOT: &str = "/";

/// hwmon class directory, relative to the filesystem root.
const HWMON_CLASS_DIR: &str = "sys/class/hwmon";

/// Driver name reported by the amdgpu hwmon `name` attribute.
const AMDGPU_DRIVER: &str = "amdgpu";

/// Find the first amdgpu hwmon directory under `root`.
///
/// Entries are visited in name order, so the result is stable across runs.
///
/// # Errors
/// Returns `DeviceNotFound` if no entry reports `amdgpu` with all three
/// fan channels present.
pub fn find_hwmon(root: impl AsRef<Path>) -> Result<PathBuf> {
    let root = root.as_ref();
    let class_dir = root.join(HWMON_CLASS_DIR);

    let mut entries: Vec<PathBuf> = match fs::read_dir(&class_dir) {
        Ok(dir) => dir.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(e) => {
            debug!("Cannot list {}: {}", class_dir.display(), e);
            return Err(FanError::DeviceNotFound(root.to_path_buf()));
        }
    };
    entries.sort();

    entries
        .into_iter()
        .find(|dir| is_compatible(dir))
        .ok_or_else(|| FanError::DeviceNotFound(root.to_path_buf()))
}

fn is_compatible(dir: &Path) -> bool {
    let name = fs::read_to_string(dir.join("name")).unwrap_or_default();
    if name.trim() != AMDGPU_DRIVER {
        debug!("Skipping {} (driver {:?})", dir.display(), name.trim());
        return false;
    }

    [MODE_CHANNEL, TEMP_CHANNEL, DUTY_CHANNEL]
        .iter()
        .all(|channel| dir.join(channel).exists())
}
