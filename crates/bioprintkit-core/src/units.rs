//! Number formatting and parsing for the controller command syntax
//!
//! The bioprinter controller expects decimal values written the way the
//! reference tooling writes them: shortest round-trip representation, always
//! carrying a fractional part (`20.0`, `18.16`, `54.480000000000004`), and a
//! signed two-digit exponent outside `1e-4..1e16`.

use crate::error::ParameterError;

/// Format a value with the shortest representation that round-trips.
pub fn format_number(value: f64) -> String {
    let debug = format!("{:?}", value);
    match debug.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => debug,
    }
}

/// Format a value with three fixed decimals (precision mode coordinates).
pub fn format_fixed(value: f64) -> String {
    let fixed = format!("{:.3}", value);
    // -0.000 would read as a distinct coordinate
    if fixed.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        "0.000".to_string()
    } else {
        fixed
    }
}

/// Parse a text field into a number, naming the field on failure.
pub fn parse_number(field: &str, input: &str) -> Result<f64, ParameterError> {
    let trimmed = input.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParameterError::Malformed {
            field: field.to_string(),
            value: input.to_string(),
        })
}
