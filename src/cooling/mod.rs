//! Cooling control module.
//!
//! Provides the temperature-to-duty control law and the loop that applies it.

pub mod controller;
pub mod driver;

pub use controller::{ControlOutput, FanController, compute, raw_duty, slew, to_pwm};
pub use driver::{Driver, DriverState};
