use serde_json::Value;

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Round at a decimal place, half away from zero.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let p = 10f64.powi(digits as i32);
    (value * p).round() / p
}

/// Coerce an untrusted JSON value into a finite number.
///
/// Numbers pass through as long as they are finite; strings are trimmed and
/// parsed. Anything else, or a non-finite result, yields `fallback`.
pub fn safe_number(value: &Value, fallback: f64) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    if n.is_finite() { n } else { fallback }
}

/// Input-boundary cleanup for user-supplied macro grams: missing, negative
/// or non-finite values become zero rather than an error.
pub fn sanitize_macro(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}
