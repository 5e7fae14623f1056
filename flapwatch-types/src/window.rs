//! Comparison-window duration parsing.

use std::time::Duration;

use thiserror::Error;

/// A window duration that is not `<number><d|h|m>`.
///
/// Window durations come from configuration, so this error is fatal at
/// startup rather than recovered per cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid window duration {0:?}: expected <number> followed by 'd', 'h' or 'm'")]
pub struct WindowParseError(pub String);

/// Suffix to seconds multiplier (order matters: a bare number has no unit)
const UNITS: &[(&str, u64)] = &[("d", 86_400), ("h", 3_600), ("m", 60)];

/// Parse a window duration like `2h`, `45m` or `1d`.
///
/// Only an integer count followed by one of the three unit suffixes is
/// accepted; everything else is a configuration error.
pub fn parse_window(s: &str) -> Result<Duration, WindowParseError> {
    let trimmed = s.trim();

    for (suffix, secs_per_unit) in UNITS {
        if let Some(digits) = trimmed.strip_suffix(suffix) {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                break;
            }
            let count: u64 = digits.parse().map_err(|_| WindowParseError(s.to_string()))?;
            let secs = count
                .checked_mul(*secs_per_unit)
                .ok_or_else(|| WindowParseError(s.to_string()))?;
            return Ok(Duration::from_secs(secs));
        }
    }

    Err(WindowParseError(s.to_string()))
}
