//! Classification of computed CSS values and relative unit resolution.
//!
//! The browser side reads a raw computed value (`"1.5rem"`, `"#fff"`, `"12"`)
//! and hands it to [`resolve_css_value`] together with a [`UnitContext`]
//! that knows the element's font size and the viewport.

use serde::{Serialize, Serializer};

use crate::color::{CssColor, parse_css_color};
use crate::config::{ABSOLUTE_UNITS, RELATIVE_UNITS};
use crate::value::str_to_number;

/// Layout facts needed to turn relative lengths into pixels.
pub trait UnitContext {
    /// Resolved font size of the element, in pixels.
    fn font_size(&self) -> f64;
    /// Viewport `(width, height)` in pixels.
    fn viewport(&self) -> (f64, f64);
}

/// What kind of value a computed CSS string holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssUnit {
    /// A unitless number.
    Number,
    /// An absolute length unit such as `px` or `cm`.
    Absolute(&'static str),
    /// A relative length unit such as `rem` or `vh`.
    Relative(&'static str),
    /// A color.
    Rgba,
    /// Not recognized.
    None,
}

impl Serialize for CssUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number => serializer.serialize_str("number"),
            Self::Absolute(unit) | Self::Relative(unit) => serializer.serialize_str(unit),
            Self::Rgba => serializer.serialize_str("rgba"),
            Self::None => serializer.serialize_bool(false),
        }
    }
}

/// Numeric part of a value, or the raw string when there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CssScalar {
    Number(f64),
    Text(String),
}

/// Resolved form of a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Computed {
    /// Pixels for resolvable lengths; the bare number for absolute units
    /// and unitless values.
    Value(f64),
    Color(CssColor),
    None,
}

/// A classified computed CSS value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssValue {
    /// Numeric part. Viewport and percentage units are stored as fractions
    /// (`50vw` gives `0.5`).
    pub value: CssScalar,
    pub unit: CssUnit,
    pub absolute: bool,
    pub computed: Computed,
}

impl CssValue {
    fn unrecognized(raw: &str) -> Self {
        Self {
            value: CssScalar::Text(raw.to_string()),
            unit: CssUnit::None,
            absolute: false,
            computed: Computed::None,
        }
    }

    /// The numeric part, if any.
    pub fn number(&self) -> Option<f64> {
        match self.value {
            CssScalar::Number(n) => Some(n),
            CssScalar::Text(_) => None,
        }
    }

    /// Resolved pixel (or bare) value, if any.
    pub fn computed_value(&self) -> Option<f64> {
        match self.computed {
            Computed::Value(n) => Some(n),
            _ => None,
        }
    }
}

/// Number in front of `unit`, if `raw` ends with it and the rest parses.
fn strip_unit(raw: &str, unit: &str) -> Option<f64> {
    let number = raw.strip_suffix(unit)?.trim();
    if number.is_empty() {
        return None;
    }
    let n = str_to_number(number);
    (!n.is_nan()).then_some(n)
}

/// Round half up, as layout code expects for pixel values.
fn round_px(n: f64) -> f64 {
    (n + 0.5).floor()
}

/// Classify a raw computed value and resolve relative lengths.
///
/// Checks, in order: unitless numbers, absolute units, relative units,
/// colors. `em`/`rem` resolve against the context font size, `%`/`vw`
/// against viewport width, `vh` against viewport height, and
/// `vmin`/`vmax` against the smaller/larger viewport side. Other relative
/// units are classified but not resolved. An empty value is unrecognized.
pub fn resolve_css_value(raw: &str, ctx: &impl UnitContext) -> CssValue {
    let raw = raw.trim();
    if raw.is_empty() {
        return CssValue::unrecognized(raw);
    }

    let n = str_to_number(raw);
    if !n.is_nan() {
        return CssValue {
            value: CssScalar::Number(n),
            unit: CssUnit::Number,
            absolute: true,
            computed: Computed::Value(n),
        };
    }

    for &unit in ABSOLUTE_UNITS {
        if let Some(n) = strip_unit(raw, unit) {
            return CssValue {
                value: CssScalar::Number(n),
                unit: CssUnit::Absolute(unit),
                absolute: true,
                computed: Computed::Value(n),
            };
        }
    }

    for &unit in RELATIVE_UNITS {
        let Some(n) = strip_unit(raw, unit) else {
            continue;
        };

        let (value, computed) = match unit {
            "em" | "rem" => (n, Computed::Value(round_px(n * ctx.font_size()))),
            "%" | "vw" => {
                let fraction = n / 100.0;
                (fraction, Computed::Value(round_px(fraction * ctx.viewport().0)))
            }
            "vh" => {
                let fraction = n / 100.0;
                (fraction, Computed::Value(round_px(fraction * ctx.viewport().1)))
            }
            "vmin" | "vmax" => {
                let fraction = n / 100.0;
                let (width, height) = ctx.viewport();
                let side = if unit == "vmin" {
                    width.min(height)
                } else {
                    width.max(height)
                };
                (fraction, Computed::Value(round_px(fraction * side)))
            }
            _ => (n, Computed::None),
        };

        return CssValue {
            value: CssScalar::Number(value),
            unit: CssUnit::Relative(unit),
            absolute: false,
            computed,
        };
    }

    match parse_css_color(raw) {
        Some(color) => CssValue {
            value: CssScalar::Text(raw.to_string()),
            unit: CssUnit::Rgba,
            absolute: true,
            computed: Computed::Color(color),
        },
        None => CssValue::unrecognized(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        font_size: f64,
        width: f64,
        height: f64,
    }

    impl UnitContext for Fixed {
        fn font_size(&self) -> f64 {
            self.font_size
        }

        fn viewport(&self) -> (f64, f64) {
            (self.width, self.height)
        }
    }

    const CTX: Fixed = Fixed {
        font_size: 16.0,
        width: 1000.0,
        height: 600.0,
    };

    #[test]
    fn test_number() {
        let v = resolve_css_value(" 42 ", &CTX);
        assert_eq!(v.unit, CssUnit::Number);
        assert_eq!(v.number(), Some(42.0));
        assert!(v.absolute);
    }

    #[test]
    fn test_absolute_units() {
        let v = resolve_css_value("12px", &CTX);
        assert_eq!(v.unit, CssUnit::Absolute("px"));
        assert_eq!(v.computed_value(), Some(12.0));

        let v = resolve_css_value("2in", &CTX);
        assert_eq!(v.unit, CssUnit::Absolute("in"));
    }

    #[test]
    fn test_font_relative() {
        let v = resolve_css_value("1.5rem", &CTX);
        assert_eq!(v.unit, CssUnit::Relative("rem"));
        assert_eq!(v.number(), Some(1.5));
        assert_eq!(v.computed_value(), Some(24.0));
        assert!(!v.absolute);

        let v = resolve_css_value("2em", &CTX);
        assert_eq!(v.unit, CssUnit::Relative("em"));
        assert_eq!(v.computed_value(), Some(32.0));
    }

    #[test]
    fn test_viewport_relative() {
        assert_eq!(resolve_css_value("50vw", &CTX).computed_value(), Some(500.0));
        assert_eq!(resolve_css_value("10%", &CTX).computed_value(), Some(100.0));
        assert_eq!(resolve_css_value("50vh", &CTX).computed_value(), Some(300.0));
        assert_eq!(resolve_css_value("10vmin", &CTX).computed_value(), Some(60.0));
        assert_eq!(resolve_css_value("10vmax", &CTX).computed_value(), Some(100.0));

        let v = resolve_css_value("25vw", &CTX);
        assert_eq!(v.number(), Some(0.25));
    }

    #[test]
    fn test_longer_suffixes_win() {
        assert_eq!(resolve_css_value("10vmin", &CTX).unit, CssUnit::Relative("vmin"));
        assert_eq!(resolve_css_value("3rlh", &CTX).unit, CssUnit::Relative("rlh"));
        assert_eq!(resolve_css_value("3svh", &CTX).unit, CssUnit::Relative("svh"));
        assert_eq!(resolve_css_value("3ch", &CTX).computed, Computed::None);
    }

    #[test]
    fn test_color_fallback() {
        let v = resolve_css_value("#ff0000", &CTX);
        assert_eq!(v.unit, CssUnit::Rgba);
        assert_eq!(v.computed, Computed::Color(CssColor::rgb(255.0, 0.0, 0.0)));
    }

    #[test]
    fn test_unrecognized() {
        let v = resolve_css_value("solid", &CTX);
        assert_eq!(v.unit, CssUnit::None);
        assert_eq!(v.value, CssScalar::Text("solid".to_string()));
        assert_eq!(resolve_css_value("", &CTX).unit, CssUnit::None);
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(resolve_css_value("solid", &CTX)).unwrap();
        assert_eq!(json["unit"], serde_json::json!(false));
        assert_eq!(json["value"], serde_json::json!("solid"));
    }
}
