//! Control configuration for the fan loop.
//!
//! Provides the threshold pair and the fixed tuning constants of the
//! control law.

use std::time::Duration;

use crate::error::{FanError, Result};
use crate::saturating::{CONTROL_MAX, ControlValue};
use crate::temperature::Temperature;

// =============================================================================
// Tuning Constants
// =============================================================================

/// Highest value accepted by the hwmon `pwm*` channel.
pub const PWM_MAX: ControlValue = 255;

/// Maximum increase of the smoothed duty per tick (1% of full scale).
pub const RISE_MAX: ControlValue = CONTROL_MAX / 100;

/// Maximum decrease of the smoothed duty per tick (0.1% of full scale).
pub const FALL_MAX: ControlValue = CONTROL_MAX / 1000;

/// Delay between two control iterations.
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(200);

// =============================================================================
// Thresholds
// =============================================================================

/// Ordered temperature pair mapping onto 0% and 100% duty.
///
/// Construction normalizes the order and rejects equal values, so
/// `range()` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    min: Temperature,
    max: Temperature,
}

impl Thresholds {
    /// Build thresholds from two temperatures given in any order.
    ///
    /// # Errors
    /// Returns `DegenerateRange` if both temperatures are equal.
    pub fn new(a: Temperature, b: Temperature) -> Result<Self> {
        if a == b {
            return Err(FanError::DegenerateRange(
                a.millicelsius(),
                b.millicelsius(),
            ));
        }
        Ok(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    /// Build thresholds from two millidegree Celsius values.
    ///
    /// Errors carry the values as given, before clamping to the
    /// representable range.
    pub fn from_millicelsius(a: i64, b: i64) -> Result<Self> {
        Self::new(
            Temperature::from_millicelsius(a),
            Temperature::from_millicelsius(b),
        )
        .map_err(|e| match e {
            FanError::DegenerateRange(..) => FanError::DegenerateRange(a, b),
            other => other,
        })
    }

    /// Temperature at which the fan is off.
    pub fn min(&self) -> Temperature {
        self.min
    }

    /// Temperature at which the fan runs at full speed.
    pub fn max(&self) -> Temperature {
        self.max
    }

    /// Width of the mapped range in millikelvin (always > 0).
    pub fn range(&self) -> ControlValue {
        self.max.millikelvin() - self.min.millikelvin()
    }
}

impl std::fmt::Display for Thresholds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.min, self.max)
    }
}
