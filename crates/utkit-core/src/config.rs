//! Library configuration.
//!
//! Centralizes the constants shared by the core helpers.

// =============================================================================
// Library Metadata
// =============================================================================

/// Semantic version triple exposed on the namespace.
pub const VERSION: [u32; 3] = [3, 0, 0];

/// Release date (year, month, day) exposed on the namespace.
pub const VERSION_DATE: [u32; 3] = [2023, 3, 23];

// =============================================================================
// Media Types
// =============================================================================

/// Extensions recognized as images.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "apng", "webp", "jpg", "jpeg", "jfif", "pjpeg", "pjp", "avif", "gif", "svg", "bmp",
    "ico", "cur", "tif", "tiff",
];

/// Extensions recognized as video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "av1", "webm", "oga", "mpg", "mpeg", "mov"];

/// Extensions recognized as audio.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "flac", "ogg", "wav", "aif", "aiff"];

// =============================================================================
// CSS Units
// =============================================================================

/// Absolute length units, matched as value suffixes.
pub const ABSOLUTE_UNITS: &[&str] = &["cm", "mm", "Q", "in", "pc", "pt", "px"];

/// Relative length units, matched as value suffixes in this order.
pub const RELATIVE_UNITS: &[&str] = &[
    "%", "rem", "em", "ex", "ch", "lh", "rlh", "svw", "svh", "dvw", "dvh", "lvw", "lvh", "vw",
    "vh", "vmin", "vmax", "vb", "vi",
];

// =============================================================================
// Cookies
// =============================================================================

/// Expiry attribute value used to delete a cookie.
pub const COOKIE_EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 UTC";

/// `strftime` pattern matching `Date.prototype.toUTCString`.
pub const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

// =============================================================================
// Time Constants
// =============================================================================

/// Milliseconds per hour.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Milliseconds per second.
pub const MS_PER_SECOND: f64 = 1000.0;

/// Frame rate assumed for timecodes when none is given.
pub const DEFAULT_FPS: u32 = 30;

/// Width `lz` pads to when none is given.
pub const DEFAULT_PAD_WIDTH: usize = 2;
