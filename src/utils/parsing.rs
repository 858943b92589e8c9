//! Parsing utilities for CLI arguments.
//!
//! Temperatures on the command line are integers in millidegrees Celsius,
//! the same convention the hwmon `temp*_input` channels use.

use crate::config::Thresholds;
use crate::error::{FanError, Result};
use crate::storage::StoredThresholds;

// =============================================================================
// Temperature Parsing
// =============================================================================

/// Parse a temperature argument in millidegrees Celsius.
///
/// # Example
/// ```
/// use gpu_fan_control::utils::parsing::parse_millicelsius;
///
/// assert_eq!(parse_millicelsius("45000").unwrap(), 45_000);
/// assert_eq!(parse_millicelsius("-5000").unwrap(), -5_000);
/// assert!(parse_millicelsius("45°C").is_err());
/// ```
pub fn parse_millicelsius(value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| {
        FanError::InvalidArgument(format!(
            "'{}' is not an integer temperature in millidegrees Celsius",
            value
        ))
    })
}

// =============================================================================
// Threshold Resolution
// =============================================================================

/// Pick the thresholds to run with.
///
/// Temperatures given on the command line win over saved ones. Either way
/// the pair is normalized and checked for a non-empty range.
///
/// # Arguments
/// * `args` - Pair from the command line, if both were given
/// * `stored` - Pair loaded from the config file, if any
pub fn resolve_thresholds(
    args: Option<(i64, i64)>,
    stored: Option<StoredThresholds>,
) -> Result<Thresholds> {
    match (args, stored) {
        (Some((a, b)), _) => Thresholds::from_millicelsius(a, b),
        (None, Some(stored)) => stored.to_thresholds(),
        (None, None) => Err(FanError::InvalidArgument(
            "Two temperatures are required (no saved thresholds found)".into(),
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================
