//! Property tests for the saturating arithmetic and the control law.

use gpu_fan_control::config::{FALL_MAX, RISE_MAX, Thresholds};
use gpu_fan_control::cooling::{compute, raw_duty, to_pwm};
use gpu_fan_control::saturating::{self, CONTROL_MAX};
use gpu_fan_control::temperature::Temperature;
use proptest::prelude::*;

fn thresholds_strategy() -> impl Strategy<Value = Thresholds> {
    (-50_000i64..150_000, 1i64..200_000)
        .prop_map(|(min, width)| Thresholds::from_millicelsius(min, min + width).unwrap())
}

proptest! {
    #[test]
    fn subtract_is_zero_when_b_exceeds_a(a: u32, b: u32) {
        prop_assume!(b > a);
        prop_assert_eq!(saturating::subtract(a, b), 0);
    }

    #[test]
    fn add_and_multiply_never_wrap(a: u32, b: u32) {
        let sum = saturating::add(a, b);
        prop_assert!(sum >= a.max(b));
        prop_assert_eq!(sum as u64, (a as u64 + b as u64).min(CONTROL_MAX as u64));

        let product = saturating::multiply(a, b);
        prop_assert_eq!(product as u64, (a as u64 * b as u64).min(CONTROL_MAX as u64));
    }

    #[test]
    fn pwm_is_monotonic_in_temperature(
        thresholds in thresholds_strategy(),
        previous: u32,
        t1 in 0u32..1_000_000,
        t2 in 0u32..1_000_000,
    ) {
        let (lo, hi) = (t1.min(t2), t1.max(t2));
        let low = compute(Temperature::from_millikelvin(lo), &thresholds, previous);
        let high = compute(Temperature::from_millikelvin(hi), &thresholds, previous);
        prop_assert!(low.pwm <= high.pwm);
        prop_assert!(low.smoothed <= high.smoothed);
    }

    #[test]
    fn rise_is_bounded(thresholds in thresholds_strategy(), previous: u32) {
        let hot = Temperature::from_millikelvin(u32::MAX);
        let out = compute(hot, &thresholds, previous);
        prop_assert!(out.smoothed as u64 <= previous as u64 + RISE_MAX as u64);
        prop_assert!(out.smoothed >= previous);
    }

    #[test]
    fn fall_is_bounded(thresholds in thresholds_strategy(), previous: u32) {
        let cold = Temperature::from_millikelvin(0);
        prop_assert_eq!(raw_duty(cold, &thresholds), 0);

        let out = compute(cold, &thresholds, previous);
        prop_assert!(out.smoothed <= previous);
        prop_assert!(out.smoothed >= previous.saturating_sub(FALL_MAX));
    }

    #[test]
    fn thresholds_are_order_independent(a in -100_000i64..200_000, b in -100_000i64..200_000) {
        prop_assume!(a != b);
        let forward = Thresholds::from_millicelsius(a, b).unwrap();
        let backward = Thresholds::from_millicelsius(b, a).unwrap();
        prop_assert_eq!(forward, backward);
        prop_assert!(forward.min() < forward.max());
    }

    #[test]
    fn pwm_rescale_is_monotonic(value: u32) {
        prop_assert!(to_pwm(value) <= to_pwm(value.saturating_add(1)));
        prop_assert_eq!(to_pwm(CONTROL_MAX), 255);
    }
}

#[test]
fn scenario_thirty_to_eighty() {
    let thresholds = Thresholds::from_millicelsius(30_000, 80_000).unwrap();
    let at = |c: i64| Temperature::from_millicelsius(c * 1000);

    let out = compute(at(30), &thresholds, 0);
    assert_eq!((out.smoothed, out.pwm), (0, 0));

    assert_eq!(raw_duty(at(80), &thresholds), CONTROL_MAX);
    let out = compute(at(80), &thresholds, 0);
    assert_eq!(out.smoothed, RISE_MAX);

    assert_eq!(raw_duty(at(200), &thresholds), CONTROL_MAX);
    let out = compute(at(200), &thresholds, CONTROL_MAX);
    assert_eq!(out.pwm, 255);
}
