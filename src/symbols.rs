//! Area-preserving circle sizing and the display rounding used in popups and the legend.

use std::f64::consts::PI;

use crate::error::{Result, SymbolError};

/// Area units per percentage point. Picked so single and double digit
/// percentages give readable marker sizes.
pub const SCALE_FACTOR: f64 = 1050.0;

pub fn radius(value: f64) -> Result<f64> {
    radius_scaled(value, SCALE_FACTOR)
}

/// `sqrt(value * scale / PI)`. Negative and non-finite values are rejected.
pub fn radius_scaled(value: f64, scale: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(SymbolError::InvalidValue(value));
    }
    let area = value * scale;
    Ok((area / PI).sqrt())
}

/// Rounds half away from zero on the decimal representation of `value`, so
/// `5.005` becomes `5.01` even though the nearest double is slightly below it.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let shifted: f64 = format!("{}e{}", value, decimals).parse().unwrap_or(value);
    let rounded = shifted.round();
    format!("{}e-{}", rounded, decimals).parse().unwrap_or(rounded)
}

/// Shortest display form: `6`, `5.01`, `-0.5`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}
