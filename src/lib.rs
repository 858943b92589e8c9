//! GPU Fan Control Library
//!
//! Drives an AMD GPU fan through its hwmon sysfs interface as a smoothed
//! function of the GPU temperature.
//!
//! # Features
//!
//! - Locate the amdgpu hwmon directory and take manual fan control
//! - Map temperature linearly between two thresholds with saturating math
//! - Slew-rate limit the fan duty (fast rise, slow fall)
//! - Restore the original fan mode and duty on shutdown
//!
//! # Example
//!
//! ```no_run
//! use gpu_fan_control::config::{Thresholds, UPDATE_INTERVAL};
//! use gpu_fan_control::cooling::Driver;
//! use gpu_fan_control::device::{HwmonDevice, find_hwmon};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let thresholds = Thresholds::from_millicelsius(40_000, 85_000)?;
//!
//!     let gpu = HwmonDevice::open(find_hwmon("/")?)?;
//!     let mut driver = Driver::new(gpu, thresholds);
//!
//!     // Runs until something is sent on `tx` (e.g. from a signal handler)
//!     let (tx, rx) = std::sync::mpsc::channel();
//!     ctrlc::set_handler(move || {
//!         let _ = tx.send(());
//!     })?;
//!     driver.run(&rx, UPDATE_INTERVAL, &mut std::io::stdout())?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cooling;
pub mod device;
pub mod error;
pub mod saturating;
pub mod storage;
pub mod temperature;
pub mod utils;

// Re-exports for convenience
pub use config::Thresholds;
pub use device::{FanDevice, HwmonDevice, PwmMode};
pub use error::{FanError, Result};
pub use temperature::Temperature;
