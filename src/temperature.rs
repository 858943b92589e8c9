//! Temperature representation.
//!
//! Temperatures are carried internally in millikelvin as an unsigned value,
//! which keeps every reading non-negative for the saturating control math.
//! The hwmon `temp*_input` channels and the command line both use signed
//! millidegrees Celsius; conversion happens once at those boundaries.

use std::fmt;

/// Offset between millidegrees Celsius and millikelvin.
pub const ZERO_CELSIUS_MK: i64 = 273_150;

/// A temperature in millikelvin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Temperature(u32);

impl Temperature {
    /// Create a temperature from a raw millikelvin value.
    pub const fn from_millikelvin(mk: u32) -> Self {
        Self(mk)
    }

    /// Create a temperature from millidegrees Celsius.
    ///
    /// Values below absolute zero clamp to 0 mK, values too hot for the
    /// representation clamp to `u32::MAX` mK.
    pub fn from_millicelsius(mc: i64) -> Self {
        let mk = mc.saturating_add(ZERO_CELSIUS_MK);
        Self(mk.clamp(0, u32::MAX as i64) as u32)
    }

    /// Raw millikelvin value.
    pub const fn millikelvin(self) -> u32 {
        self.0
    }

    /// Value in millidegrees Celsius.
    pub fn millicelsius(self) -> i64 {
        self.0 as i64 - ZERO_CELSIUS_MK
    }

    /// Whole degrees Celsius, truncated toward zero.
    pub fn celsius(self) -> i64 {
        self.millicelsius() / 1000
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.celsius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millicelsius() {
        assert_eq!(Temperature::from_millicelsius(0).millikelvin(), 273_150);
        assert_eq!(Temperature::from_millicelsius(45_000).millikelvin(), 318_150);
        assert_eq!(Temperature::from_millicelsius(-10_000).millikelvin(), 263_150);
    }

    #[test]
    fn test_from_millicelsius_clamps() {
        assert_eq!(Temperature::from_millicelsius(-300_000).millikelvin(), 0);
        assert_eq!(Temperature::from_millicelsius(i64::MIN).millikelvin(), 0);
        assert_eq!(
            Temperature::from_millicelsius(i64::MAX).millikelvin(),
            u32::MAX
        );
    }

    #[test]
    fn test_celsius_round_trip_and_display() {
        let t = Temperature::from_millicelsius(67_890);
        assert_eq!(t.millicelsius(), 67_890);
        assert_eq!(t.celsius(), 67);
        assert_eq!(t.to_string(), "67°C");

        let cold = Temperature::from_millicelsius(-5_500);
        assert_eq!(cold.celsius(), -5);
    }
}
