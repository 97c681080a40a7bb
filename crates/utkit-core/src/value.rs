//! Loose coercions over `serde_json::Value`.
//!
//! Records coming from pages are untyped JSON, and the filter and sort
//! helpers compare them the way page scripts expect: numbers parsed out of
//! strings, booleans counted as 0/1, arrays flattened to comma lists.

use serde_json::Value;

/// Coerce a value to a number.
///
/// Returns `NaN` when the value has no numeric reading.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => str_to_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => str_to_number(&to_display_string(single)),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Parse a string the way numeric coercion does: whitespace trimmed,
/// empty means zero, hex accepted, anything else non-numeric is `NaN`.
pub fn str_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust also accepts "inf" and "nan"; numeric coercion does not.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }

    s.parse().unwrap_or(f64::NAN)
}

/// Render a number without a trailing `.0` for integral values.
///
/// Unlike JS `Number#toString`, this never switches to exponent notation:
/// magnitudes of `1e21` and above, or below `1e-6`, are written out in
/// full (`1e21` gives `"1000000000000000000000"`, not `"1e+21"`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{}", n)
    }
}

/// Convert a value to its string form.
///
/// Arrays join their elements with `,` (nulls become empty), objects
/// render as `[object Object]`.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Strict equality: same kind and same content.
///
/// Numbers compare by value, so `1` and `1.0` are equal; containers compare
/// structurally.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Loose equality with type coercion between primitives.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_))
        | (Value::Bool(_), Value::Bool(_)) => strict_eq(a, b),
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => a == b,
        (Value::Bool(_), _) => loose_eq(&number_value(to_number(a)), b),
        (_, Value::Bool(_)) => loose_eq(a, &number_value(to_number(b))),
        (Value::Number(x), Value::String(s)) | (Value::String(s), Value::Number(x)) => {
            x.as_f64() == Some(str_to_number(s))
        }
        (Value::Array(_) | Value::Object(_), _) => {
            loose_eq(&Value::String(to_display_string(a)), b)
        }
        (_, Value::Array(_) | Value::Object(_)) => {
            loose_eq(a, &Value::String(to_display_string(b)))
        }
    }
}

fn number_value(n: f64) -> Value {
    serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!(42)), 42.0);
        assert_eq!(to_number(&json!(" 3.5 ")), 3.5);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(null)), 0.0);
        assert_eq!(to_number(&json!("0x1F")), 31.0);
        assert_eq!(to_number(&json!(["7"])), 7.0);
        assert!(to_number(&json!("abc")).is_nan());
        assert!(to_number(&json!("inf")).is_nan());
        assert!(to_number(&json!({"a": 1})).is_nan());
    }

    #[test]
    fn test_format_number_never_uses_exponents() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(1e21), "1000000000000000000000");
        assert_eq!(format_number(1e-7), "0.0000001");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_to_display_string() {
        assert_eq!(to_display_string(&json!(5)), "5");
        assert_eq!(to_display_string(&json!(1.5)), "1.5");
        assert_eq!(to_display_string(&json!([1, null, "a"])), "1,,a");
        assert_eq!(to_display_string(&json!({})), "[object Object]");
        assert_eq!(to_display_string(&json!(null)), "null");
    }

    #[test]
    fn test_loose_eq() {
        assert!(loose_eq(&json!(1), &json!("1")));
        assert!(loose_eq(&json!("1"), &json!(1.0)));
        assert!(loose_eq(&json!(true), &json!(1)));
        assert!(loose_eq(&json!(false), &json!("0")));
        assert!(loose_eq(&json!([2]), &json!(2)));
        assert!(!loose_eq(&json!(null), &json!(0)));
        assert!(!loose_eq(&json!("a"), &json!("A")));
    }

    #[test]
    fn test_strict_eq() {
        assert!(strict_eq(&json!(1), &json!(1.0)));
        assert!(!strict_eq(&json!(1), &json!("1")));
        assert!(strict_eq(&json!({"a": [1]}), &json!({"a": [1]})));
    }
}
