//! Parse-or-default boundary for user-entered numbers
//!
//! Everything typed into the calculator passes through here exactly once.
//! Empty or non-numeric text becomes `0`; the engine downstream only ever
//! sees finite values.

use tracing::debug;

/// Replace NaN and infinities with zero
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse a user-entered amount or percentage, defaulting to zero
///
/// Accepts an optional leading `$`, `,` thousands separators and a trailing
/// `%`, e.g. `"$1,200.50"` or `"2.9%"`.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let cleaned: String = unsigned
        .trim_start_matches('$')
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    // A single sign only; "--5" and "-$-5" are malformed
    if negative && cleaned.starts_with(&['-', '+'][..]) {
        debug!("Malformed numeric entry {:?} coerced to 0", raw);
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if negative {
                -value
            } else {
                value
            }
        }
        Ok(_) => {
            debug!("Non-finite entry {:?} coerced to 0", raw);
            0.0
        }
        Err(_) => {
            debug!("Malformed numeric entry {:?} coerced to 0", raw);
            0.0
        }
    }
}

/// Parse an on/off switch; `None` when the text is not a recognised toggle
pub fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "y" | "1" | "enable" | "enabled" => Some(true),
        "off" | "false" | "no" | "n" | "0" | "disable" | "disabled" => Some(false),
        _ => None,
    }
}
