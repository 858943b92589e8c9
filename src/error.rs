//! Custom error types for GPU fan control.
//!
//! This module provides fine-grained error handling for argument validation,
//! hwmon channel access, and threshold storage.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for fan control operations.
#[derive(Error, Debug)]
pub enum FanError {
    /// Malformed or missing temperature threshold.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Both thresholds map to the same temperature, leaving no range.
    #[error("Thresholds {0} m°C and {1} m°C map to the same temperature")]
    DegenerateRange(i64, i64),

    /// No compatible hwmon directory was located.
    #[error("No amdgpu hwmon device found under {}", .0.display())]
    DeviceNotFound(PathBuf),

    /// A channel exists but could not be opened or read at startup.
    #[error("Failed to open {}: {source}", path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a channel failed after the device was acquired.
    #[error("Failed to read {}: {source}", path.display())]
    ChannelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a channel failed after the device was acquired.
    #[error("Failed to write {}: {source}", path.display())]
    ChannelWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A channel produced content that is not a valid value.
    #[error("Unexpected value {value:?} in {}", path.display())]
    InvalidChannelValue { path: PathBuf, value: String },

    /// Saved thresholds could not be loaded or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FanError {
    /// Whether this error stems from missing privileges on a channel.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            FanError::DeviceOpen { source, .. }
            | FanError::ChannelRead { source, .. }
            | FanError::ChannelWrite { source, .. } => {
                source.kind() == std::io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }
}

/// Result type alias for fan control operations.
pub type Result<T> = std::result::Result<T, FanError>;
