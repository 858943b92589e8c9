//! Control law mapping temperature to fan duty.
//!
//! The raw duty is a linear map of the temperature between the thresholds,
//! computed with saturating arithmetic so any reading (including ones far
//! outside the thresholds) yields a value in `[0, CONTROL_MAX]`. The applied
//! duty is then slew-rate limited: it may rise quickly to follow thermal
//! spikes but only falls slowly, which keeps the fan from hunting.

use crate::config::{FALL_MAX, PWM_MAX, RISE_MAX, Thresholds};
use crate::saturating::{self, CONTROL_MAX, ControlValue};
use crate::temperature::Temperature;

/// Result of one control law evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlOutput {
    /// Smoothed duty to carry into the next tick.
    pub smoothed: ControlValue,
    /// Value for the hwmon `pwm` channel (0-255).
    pub pwm: u8,
}

impl ControlOutput {
    /// Smoothed duty as an integer percentage (0-100).
    pub fn percent(&self) -> u8 {
        (self.smoothed as u64 * 100 / CONTROL_MAX as u64) as u8
    }
}

/// Unsmoothed duty for `temperature`.
///
/// Below `min` the result is 0, at or above `max` it is `CONTROL_MAX`.
/// The multiplier is rounded up so the top threshold reaches full scale;
/// the integer step between adjacent millikelvin is expected quantization.
pub fn raw_duty(temperature: Temperature, thresholds: &Thresholds) -> ControlValue {
    let relative = saturating::subtract(
        temperature.millikelvin(),
        thresholds.min().millikelvin(),
    );
    let multiplier = CONTROL_MAX.div_ceil(thresholds.range());
    saturating::multiply(relative, multiplier).min(CONTROL_MAX)
}

/// Move from `previous` toward `raw`, bounded by the rise/fall limits.
pub fn slew(previous: ControlValue, raw: ControlValue) -> ControlValue {
    if raw > previous {
        raw.min(saturating::add(previous, RISE_MAX))
    } else {
        raw.max(saturating::subtract(previous, FALL_MAX))
    }
}

/// Rescale a control value into the hardware PWM range.
pub fn to_pwm(value: ControlValue) -> u8 {
    (value / (CONTROL_MAX / PWM_MAX)) as u8
}

/// Evaluate the control law for one tick.
///
/// # Arguments
/// * `temperature` - Current reading
/// * `thresholds` - Configured 0% / 100% temperatures
/// * `previous` - Smoothed duty from the previous tick
pub fn compute(
    temperature: Temperature,
    thresholds: &Thresholds,
    previous: ControlValue,
) -> ControlOutput {
    let raw = raw_duty(temperature, thresholds);
    let smoothed = slew(previous, raw);
    ControlOutput {
        smoothed,
        pwm: to_pwm(smoothed),
    }
}

// =============================================================================
// Fan Controller
// =============================================================================

/// Stateful wrapper holding the smoothed duty between ticks.
#[derive(Debug, Clone)]
pub struct FanController {
    thresholds: Thresholds,
    smoothed: Option<ControlValue>,
}

impl FanController {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            smoothed: None,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Smoothed duty of the last tick, if any.
    pub fn smoothed(&self) -> Option<ControlValue> {
        self.smoothed
    }

    /// Feed a new reading and return the output to apply.
    ///
    /// The first reading seeds the smoothed value with its raw duty.
    pub fn update(&mut self, temperature: Temperature) -> ControlOutput {
        let previous = self
            .smoothed
            .unwrap_or_else(|| raw_duty(temperature, &self.thresholds));
        let output = compute(temperature, &self.thresholds, previous);
        self.smoothed = Some(output.smoothed);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn celsius(c: i64) -> Temperature {
        Temperature::from_millicelsius(c * 1000)
    }

    fn thresholds() -> Thresholds {
        Thresholds::new(celsius(30), celsius(80)).unwrap()
    }

    #[test]
    fn test_raw_duty_endpoints() {
        let t = thresholds();
        assert_eq!(raw_duty(celsius(30), &t), 0);
        assert_eq!(raw_duty(celsius(20), &t), 0);
        assert_eq!(raw_duty(celsius(80), &t), CONTROL_MAX);
        assert_eq!(raw_duty(celsius(200), &t), CONTROL_MAX);
    }

    #[test]
    fn test_raw_duty_midpoint() {
        let raw = raw_duty(celsius(55), &thresholds());
        assert_eq!(to_pwm(raw), 127);
    }

    #[test]
    fn test_compute_at_min_is_off() {
        let out = compute(celsius(30), &thresholds(), 0);
        assert_eq!(out.smoothed, 0);
        assert_eq!(out.pwm, 0);
        assert_eq!(out.percent(), 0);
    }

    #[test]
    fn test_compute_rise_is_capped() {
        let out = compute(celsius(80), &thresholds(), 0);
        assert_eq!(out.smoothed, RISE_MAX);
        assert_eq!(out.pwm, 2);
        assert_eq!(out.percent(), 0);

        let out = compute(celsius(200), &thresholds(), 0);
        assert_eq!(out.smoothed, RISE_MAX);
    }

    #[test]
    fn test_compute_fall_is_capped() {
        let out = compute(celsius(0), &thresholds(), CONTROL_MAX);
        assert_eq!(out.smoothed, CONTROL_MAX - FALL_MAX);
        assert_eq!(out.pwm, 254);

        let out = compute(celsius(0), &thresholds(), FALL_MAX / 2);
        assert_eq!(out.smoothed, 0);
    }

    #[test]
    fn test_compute_full_scale() {
        let out = compute(celsius(90), &thresholds(), CONTROL_MAX);
        assert_eq!(out.pwm, 255);
        assert_eq!(out.percent(), 100);
    }

    #[test]
    fn test_slew_reaches_target_within_limits() {
        assert_eq!(slew(100, 150), 150);
        assert_eq!(slew(150, 100), 100);
        assert_eq!(slew(CONTROL_MAX - 1, CONTROL_MAX), CONTROL_MAX);
    }

    #[test]
    fn test_controller_seeds_from_first_reading() {
        let mut controller = FanController::new(thresholds());
        assert_eq!(controller.smoothed(), None);

        let out = controller.update(celsius(80));
        assert_eq!(out.smoothed, CONTROL_MAX);
        assert_eq!(out.pwm, 255);

        // Sudden drop only lowers the duty by FALL_MAX per tick
        let out = controller.update(celsius(30));
        assert_eq!(out.smoothed, CONTROL_MAX - FALL_MAX);
        assert_eq!(controller.smoothed(), Some(CONTROL_MAX - FALL_MAX));
    }

    #[test]
    fn test_controller_ramps_up() {
        let mut controller = FanController::new(thresholds());
        controller.update(celsius(25));
        let first = controller.update(celsius(80));
        let second = controller.update(celsius(80));
        assert_eq!(first.smoothed, RISE_MAX);
        assert_eq!(second.smoothed, 2 * RISE_MAX);
    }
}
