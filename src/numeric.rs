//! Numeric parsing for number and currency cells
//!
//! Accepts both `1,234.56` and `1.234,56` style input. A comma is a decimal
//! separator only when it is followed by one or two trailing digits; anything
//! that still fails to parse becomes `0` so an edit can always be committed.

use serde_json::{Number, Value};

/// Parse user input from a numeric cell editor
pub fn parse_numeric(input: &str) -> f64 {
    let cleaned: String = input
        .chars()
        .filter(|c| *c != '$' && !c.is_whitespace())
        .collect();

    let has_comma = cleaned.contains(',');
    let has_dot = cleaned.contains('.');

    let normalized = if has_comma && has_dot {
        if has_decimal_comma(&cleaned) {
            let without_dots: String = cleaned.chars().filter(|c| *c != '.').collect();
            replace_last_comma(&without_dots)
        } else {
            cleaned.replace(',', "")
        }
    } else if has_comma {
        if has_decimal_comma(&cleaned) {
            replace_last_comma(&cleaned)
        } else {
            cleaned.replace(',', "")
        }
    } else {
        cleaned
    };

    parse_float_prefix(&normalized).unwrap_or(0.0)
}

/// Convert a parsed number into a JSON value, keeping integers integral
pub fn number_value(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::from(0))
    }
}

/// Coerce a cell value to a number the way a loosely typed host would
///
/// Empty strings and `null` yield `None`; strings are trimmed and parsed.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// True when the string ends in `,d` or `,dd`
fn has_decimal_comma(s: &str) -> bool {
    let Some(idx) = s.rfind(',') else {
        return false;
    };
    let tail = &s[idx + 1..];
    (1..=2).contains(&tail.len()) && tail.chars().all(|c| c.is_ascii_digit())
}

fn replace_last_comma(s: &str) -> String {
    match s.rfind(',') {
        Some(idx) => format!("{}.{}", &s[..idx], &s[idx + 1..]),
        None => s.to_string(),
    }
}

/// Parse the longest leading float literal (`-12.5e3xyz` -> -12500)
fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}
