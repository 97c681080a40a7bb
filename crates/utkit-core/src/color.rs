//! CSS color string parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static HEX6: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})").unwrap());
static HEX3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("#([0-9a-fA-F])([0-9a-fA-F])([0-9a-fA-F])").unwrap());
static RGBA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba\(([0-9]+),([0-9]+),([0-9]+),([0-9]+|[0-9]*\.[0-9]+)\)").unwrap()
});
static RGB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rgb\(([0-9]+),([0-9]+),([0-9]+)\)").unwrap());

/// An RGBA color. Channels are not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 4]")]
pub struct CssColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl CssColor {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// `[r, g, b, a]`
    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `rgba(r,g,b,a)`
    pub fn to_css_string(self) -> String {
        css_color_string(&self.to_array())
    }
}

impl From<CssColor> for [f64; 4] {
    fn from(color: CssColor) -> Self {
        color.to_array()
    }
}

/// Parse `#rrggbb`, `#rgb`, `rgba(r,g,b,a)` or `rgb(r,g,b)`.
///
/// Whitespace is ignored anywhere in the input. Alpha defaults to 1.
/// Returns `None` for anything else, including named colors.
pub fn parse_css_color(color: &str) -> Option<CssColor> {
    let compact: String = color.chars().filter(|c| !c.is_whitespace()).collect();

    let channel = |s: &str| s.parse::<f64>().ok();
    let hex = |s: &str| u8::from_str_radix(s, 16).ok().map(f64::from);

    if let Some(caps) = HEX6.captures(&compact) {
        return Some(CssColor::rgb(hex(&caps[1])?, hex(&caps[2])?, hex(&caps[3])?));
    }
    if let Some(caps) = HEX3.captures(&compact) {
        return Some(CssColor::rgb(
            hex(&caps[1])? * 17.0,
            hex(&caps[2])? * 17.0,
            hex(&caps[3])? * 17.0,
        ));
    }
    if let Some(caps) = RGBA.captures(&compact) {
        return Some(CssColor {
            r: channel(&caps[1])?,
            g: channel(&caps[2])?,
            b: channel(&caps[3])?,
            a: channel(&caps[4])?,
        });
    }
    if let Some(caps) = RGB.captures(&compact) {
        return Some(CssColor::rgb(
            channel(&caps[1])?,
            channel(&caps[2])?,
            channel(&caps[3])?,
        ));
    }
    None
}

/// Render color components: four or more as `rgba(...)`, otherwise `rgb(...)`.
pub fn css_color_string(components: &[f64]) -> String {
    let part = |i: usize| components.get(i).copied().unwrap_or(0.0);
    if components.len() > 3 {
        format!("rgba({},{},{},{})", part(0), part(1), part(2), part(3))
    } else {
        format!("rgb({},{},{})", part(0), part(1), part(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let red = parse_css_color("#ff0000").unwrap();
        assert_eq!(red.to_array(), [255.0, 0.0, 0.0, 1.0]);
        assert_eq!(parse_css_color("#0f8").unwrap().to_array(), [0.0, 255.0, 136.0, 1.0]);
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(
            parse_css_color("rgb(10, 20, 30)").unwrap().to_array(),
            [10.0, 20.0, 30.0, 1.0]
        );
        assert_eq!(
            parse_css_color(" rgba( 1, 2, 3, .5 ) ").unwrap().to_array(),
            [1.0, 2.0, 3.0, 0.5]
        );
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(parse_css_color("red"), None);
        assert_eq!(parse_css_color("12px"), None);
        assert_eq!(parse_css_color("#zz0000"), None);
    }

    #[test]
    fn test_css_color_string() {
        assert_eq!(css_color_string(&[1.0, 2.0, 3.0]), "rgb(1,2,3)");
        assert_eq!(css_color_string(&[1.0, 2.0, 3.0, 0.5]), "rgba(1,2,3,0.5)");
        assert_eq!(CssColor::rgb(255.0, 0.0, 0.0).to_css_string(), "rgba(255,0,0,1)");
    }

    #[test]
    fn test_serialize_as_array() {
        let json = serde_json::to_string(&CssColor::rgb(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,1.0]");
    }
}
