//! Saturating arithmetic over the control-value range.
//!
//! Every operation clamps to `[0, CONTROL_MAX]` instead of wrapping, which
//! keeps the control law total for any temperature reading.

/// Internal high-resolution control value (0 = 0% duty, `CONTROL_MAX` = 100%).
pub type ControlValue = u32;

/// Largest representable control value.
pub const CONTROL_MAX: ControlValue = ControlValue::MAX;

/// `a + b`, clamped to `CONTROL_MAX`.
#[inline]
pub const fn add(a: ControlValue, b: ControlValue) -> ControlValue {
    a.saturating_add(b)
}

/// `a - b`, clamped to zero.
#[inline]
pub const fn subtract(a: ControlValue, b: ControlValue) -> ControlValue {
    a.saturating_sub(b)
}

/// `a * b`, clamped to `CONTROL_MAX`.
#[inline]
pub const fn multiply(a: ControlValue, b: ControlValue) -> ControlValue {
    a.saturating_mul(b)
}
