//! Geometry helpers: aspect-ratio scaling, hit testing, transform parsing.

use std::str::FromStr;

use serde::Serialize;

use crate::error::UnknownScaleMode;

/// How a source box is scaled into a target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Fit entirely inside the target, letterboxing if needed (`fit`, `contain`).
    Contain,
    /// Cover the whole target, cropping if needed (`full`, `cover`).
    Cover,
    /// Stretch to the target size, ignoring aspect ratio.
    Fill,
}

impl FromStr for ScaleMode {
    type Err = UnknownScaleMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fit" | "contain" => Ok(Self::Contain),
            "full" | "cover" => Ok(Self::Cover),
            "fill" => Ok(Self::Fill),
            other => Err(UnknownScaleMode(other.to_string())),
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Result of [`calc_scale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleResult {
    pub scale_x: f64,
    pub scale_y: f64,
    /// Placement inside the target: `[x, y, width, height]`.
    pub rect: [f64; 4],
}

fn round_half_up(n: f64) -> f64 {
    (n + 0.5).floor()
}

/// Scale an `original` box into a `target` box.
///
/// Sizes are rounded to whole pixels. With `center`, the result is
/// offset so it sits in the middle of the target (offsets may be negative
/// for [`ScaleMode::Cover`]).
pub fn calc_scale(
    original_width: f64,
    original_height: f64,
    target_width: f64,
    target_height: f64,
    mode: ScaleMode,
    center: bool,
) -> ScaleResult {
    let target_is_narrower = target_width / target_height < original_width / original_height;
    let fit_width = || {
        (
            target_width,
            round_half_up(original_height * (target_width / original_width)),
        )
    };
    let fit_height = || {
        (
            round_half_up(original_width * (target_height / original_height)),
            target_height,
        )
    };

    let (width, height) = match mode {
        ScaleMode::Contain if target_is_narrower => fit_width(),
        ScaleMode::Contain => fit_height(),
        ScaleMode::Cover if target_is_narrower => fit_height(),
        ScaleMode::Cover => fit_width(),
        ScaleMode::Fill => (target_width, target_height),
    };

    let (x, y) = if center {
        (
            round_half_up(target_width / 2.0 - width / 2.0),
            round_half_up(target_height / 2.0 - height / 2.0),
        )
    } else {
        (0.0, 0.0)
    };

    ScaleResult {
        scale_x: width / original_width,
        scale_y: height / original_height,
        rect: [x, y, width, height],
    }
}

/// Whether `(x, y)` lies strictly inside `rect`.
pub fn hit_rect(rect: Rect, x: f64, y: f64) -> bool {
    x > rect.x && x < rect.x + rect.width && y > rect.y && y < rect.y + rect.height
}

/// Translation `[x, y]` of a computed `transform` value.
///
/// Understands `matrix(...)` and `matrix3d(...)`; anything else, including
/// `none`, is no translation.
pub fn parse_translate(transform: &str) -> [f64; 2] {
    let transform = transform.trim();
    let components = |inner: &str| -> Vec<f64> {
        inner
            .split(',')
            .map(|part| part.trim().parse().unwrap_or(0.0))
            .collect()
    };
    let pick = |values: &[f64], i: usize, j: usize| {
        [
            values.get(i).copied().unwrap_or(0.0),
            values.get(j).copied().unwrap_or(0.0),
        ]
    };

    if let Some(inner) = transform
        .strip_prefix("matrix3d(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return pick(&components(inner), 12, 13);
    }
    if let Some(inner) = transform
        .strip_prefix("matrix(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return pick(&components(inner), 4, 5);
    }
    [0.0, 0.0]
}
