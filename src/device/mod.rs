//! Device abstraction layer for GPU fan control.
//!
//! Provides hwmon discovery and the fan control surface used by the driver.

pub mod discovery;
pub mod hwmon;

pub use discovery::{DEFAULT_SYSFS_ROOT, find_hwmon};
pub use hwmon::{HwmonDevice, OriginalState, PwmMode};

use crate::error::Result;
use crate::temperature::Temperature;

/// Operations the control loop needs from a fan device.
pub trait FanDevice {
    /// Current temperature reading.
    fn read_temperature(&mut self) -> Result<Temperature>;

    /// Switch the fan control mode.
    fn set_mode(&mut self, mode: PwmMode) -> Result<()>;

    /// Write a raw PWM duty (0-255).
    fn set_duty(&mut self, duty: u8) -> Result<()>;

    /// Return the hardware to the state it had before we took over.
    fn restore(&mut self) -> Result<()>;
}
