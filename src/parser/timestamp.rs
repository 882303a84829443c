//! Timestamp normalization.
//!
//! trace-cmd renders timestamps in three ways depending on layout and
//! options. All of them are folded into seconds as `f64`.

use crate::utils::error::ParseError;

/// Convert a timestamp token to seconds
///
/// **Public** - used by the line parser and the clock_event decoder
///
/// * `123us` - integer microseconds
/// * `1.5` - seconds
/// * `1500000000` - integer nanoseconds
///
/// # Errors
/// * `ParseError::InvalidTimestamp` - token is not numeric or not finite
pub fn normalize_timestamp(token: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidTimestamp(token.to_string());

    let seconds = if let Some(us) = token.strip_suffix("us") {
        us.parse::<u64>().map_err(|_| invalid())? as f64 / 1_000_000.0
    } else if token.contains('.') {
        token.parse::<f64>().map_err(|_| invalid())?
    } else {
        nanos_to_seconds(token).ok_or_else(invalid)?
    };

    if seconds.is_finite() {
        Ok(seconds)
    } else {
        Err(invalid())
    }
}

/// Parse an integer nanosecond count into seconds
pub fn nanos_to_seconds(token: &str) -> Option<f64> {
    token.parse::<u64>().ok().map(|ns| ns as f64 / 1_000_000_000.0)
}
