//! Formatting utilities for strings, dates, durations and file sizes.

use std::fmt::Display;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::config::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new("[^a-z0-9 -]").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(" +").unwrap());
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new("-+").unwrap());

// =============================================================================
// Strings
// =============================================================================

/// Left-pad the display form of `value` with zeros up to `size` characters.
pub fn lz(value: impl Display, size: usize) -> String {
    format!("{:0>size$}", value.to_string())
}

/// Uppercase the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Random integer in `0..max`; `0` when `max` is zero.
pub fn random_int(max: u64) -> u64 {
    if max == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..max)
    }
}

/// Short unique-ish identifier: `_` followed by a base-36 number mixing
/// randomness with the current time.
pub fn id() -> String {
    let random: u64 = rand::thread_rng().gen_range(0..1_000_000_000_000_000);
    let now = Utc::now().timestamp_millis().unsigned_abs();
    format!("_{}", to_base36(random.wrapping_add(now)))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Turn free text into an identifier-safe slug.
///
/// Lowercases, strips accents, drops everything except `a-z`, `0-9`,
/// spaces and hyphens, then collapses space runs and hyphen runs into
/// single underscores. Returns `None` for empty input.
pub fn slugify(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }

    let lowered = s.trim().to_lowercase();
    let stripped: String = lowered
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();

    let kept = NON_SLUG_CHARS.replace_all(&stripped, "");
    let spaced = SPACE_RUNS.replace_all(&kept, "_");
    Some(DASH_RUNS.replace_all(&spaced, "_").into_owned())
}

// =============================================================================
// Dates
// =============================================================================

/// Zero-padded calendar fields of a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateKeys {
    pub year: i32,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minutes: String,
    pub seconds: String,
    pub milliseconds: String,
}

/// A timestamp rendered in the common display layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedDate {
    pub keys: DateKeys,
    /// `HH:MM:SS`
    pub time: String,
    /// `DD.MM.YYYY`
    pub date: String,
    /// `YYYY-MM-DD`, as accepted by date inputs
    pub date_input: String,
    /// `DD.MM.YYYY - HH:MM:SS`
    pub full: String,
    /// `DD.MM.YYYY - HH:MM`
    pub file: String,
    /// `DD.MM.YYYY - HH:MM:SS:mmm`
    pub log: String,
}

/// Format a Unix timestamp in milliseconds using the local time zone.
///
/// Returns `None` for timestamps outside the representable range.
pub fn format_date(timestamp_ms: i64) -> Option<FormattedDate> {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| format_datetime(&dt))
}

/// Format a date-time in its own time zone.
pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> FormattedDate {
    let keys = DateKeys {
        year: dt.year(),
        month: lz(dt.month(), 2),
        day: lz(dt.day(), 2),
        hour: lz(dt.hour(), 2),
        minutes: lz(dt.minute(), 2),
        seconds: lz(dt.second(), 2),
        milliseconds: lz(dt.timestamp_subsec_millis().min(999), 3),
    };

    let time = format!("{}:{}:{}", keys.hour, keys.minutes, keys.seconds);
    let date = format!("{}.{}.{}", keys.day, keys.month, keys.year);

    FormattedDate {
        date_input: format!("{}-{}-{}", keys.year, keys.month, keys.day),
        full: format!("{} - {}", date, time),
        file: format!("{} - {}:{}", date, keys.hour, keys.minutes),
        log: format!("{} - {}:{}", date, time, keys.milliseconds),
        time,
        date,
        keys,
    }
}

// =============================================================================
// Durations
// =============================================================================

/// A millisecond duration split into clock fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayTime {
    pub is_negative: bool,
    pub hours: String,
    pub minutes: String,
    pub full_minutes: u64,
    pub seconds: String,
    pub milliseconds: String,
    /// Frame index within the current second.
    pub frames: String,
    /// `M:SS` with unbounded minutes
    pub minsec: String,
    /// `HH:MM:SS`
    pub short: String,
    /// `HH:MM:SS:mmm`
    pub full: String,
    /// `HH:MM:SS:FF`
    pub timecode: String,
}

/// Split a duration in milliseconds into display fields.
///
/// Negative durations are formatted by magnitude with `is_negative` set.
pub fn play_time(ms: f64, fps: u32) -> PlayTime {
    let is_negative = ms < 0.0;
    let n = ms.abs();

    let hours = lz((n / MS_PER_HOUR).floor(), 2);
    let minutes = lz((n % MS_PER_HOUR / MS_PER_MINUTE).floor(), 2);
    let full_minutes = (n / MS_PER_MINUTE).floor() as u64;
    let seconds = lz((n % MS_PER_MINUTE / MS_PER_SECOND).floor(), 2);
    let sub_second = n % MS_PER_SECOND;
    let milliseconds = lz(sub_second.floor(), 3);
    let frames = lz((sub_second * f64::from(fps) / MS_PER_SECOND).floor(), 2);

    PlayTime {
        is_negative,
        minsec: format!("{}:{}", full_minutes, seconds),
        short: format!("{}:{}:{}", hours, minutes, seconds),
        full: format!("{}:{}:{}:{}", hours, minutes, seconds, milliseconds),
        timecode: format!("{}:{}:{}:{}", hours, minutes, seconds, frames),
        hours,
        minutes,
        full_minutes,
        seconds,
        milliseconds,
        frames,
    }
}

// =============================================================================
// Sizes
// =============================================================================

const KIB: f64 = 1024.0;

/// Format a byte count with a binary unit (e.g., "1.5 KB", "2 GB").
///
/// Up to two decimals with trailing zeros removed. Counts up to 1024 are
/// returned as the bare number; zero yields an empty string.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::new();
    }

    let n = bytes as f64;
    let scales = [
        ("TB", KIB.powi(4)),
        ("GB", KIB.powi(3)),
        ("MB", KIB.powi(2)),
        ("KB", KIB),
    ];

    for (unit, scale) in scales {
        if n > scale {
            return format!("{} {}", trim_decimals(n / scale), unit);
        }
    }

    bytes.to_string()
}

/// Two decimals with ties rounded away from zero, then trailing zeros cut.
fn trim_decimals(value: f64) -> String {
    let fixed = format!("{:.2}", (value * 100.0).round() / 100.0);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

// =============================================================================
// JSON
// =============================================================================

/// Parse JSON, falling back to the input as a plain string.
pub fn parse_json(s: &str) -> Value {
    serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lz() {
        assert_eq!(lz(5, 2), "05");
        assert_eq!(lz(123, 2), "123");
        assert_eq!(lz(7, 3), "007");
        assert_eq!(lz("ab", 4), "00ab");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hello world"), "Hello world");
        assert_eq!(capitalize("élan"), "Élan");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World! Test"), Some("hello_world_test".to_string()));
        assert_eq!(slugify("  Crème Brûlée  "), Some("creme_brulee".to_string()));
        assert_eq!(slugify("a--b   c"), Some("a_b_c".to_string()));
        assert_eq!(slugify(""), None);
    }

    #[test]
    fn test_id() {
        let a = id();
        assert!(a.starts_with('_'));
        assert!(a[1..].chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_random_int() {
        for _ in 0..100 {
            assert!(random_int(10) < 10);
        }
        assert_eq!(random_int(0), 0);
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 5, 9, 3, 7).unwrap()
            + chrono::TimeDelta::milliseconds(42);
        let out = format_datetime(&dt);
        assert_eq!(out.keys.year, 2024);
        assert_eq!(out.time, "09:03:07");
        assert_eq!(out.date, "05.01.2024");
        assert_eq!(out.date_input, "2024-01-05");
        assert_eq!(out.full, "05.01.2024 - 09:03:07");
        assert_eq!(out.file, "05.01.2024 - 09:03");
        assert_eq!(out.log, "05.01.2024 - 09:03:07:042");
    }

    #[test]
    fn test_play_time() {
        let t = play_time(3_723_456.0, 30);
        assert!(!t.is_negative);
        assert_eq!(t.hours, "01");
        assert_eq!(t.minutes, "02");
        assert_eq!(t.full_minutes, 62);
        assert_eq!(t.seconds, "03");
        assert_eq!(t.milliseconds, "456");
        assert_eq!(t.frames, "13");
        assert_eq!(t.minsec, "62:03");
        assert_eq!(t.short, "01:02:03");
        assert_eq!(t.full, "01:02:03:456");
        assert_eq!(t.timecode, "01:02:03:13");
    }

    #[test]
    fn test_play_time_negative() {
        let t = play_time(-1500.0, 25);
        assert!(t.is_negative);
        assert_eq!(t.short, "00:00:01");
        assert_eq!(t.milliseconds, "500");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(0), "");
        assert_eq!(format_file_size(512), "512");
        assert_eq!(format_file_size(1024), "1024");
        assert_eq!(format_file_size(2 * 1024 * 1024 * 1024), "2 GB");
        assert_eq!(format_file_size(10 * 1024 * 1024 + 1), "10 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
    }

    #[test]
    fn test_format_file_size_rounds_ties_up() {
        // 1.125 and 2.625 are exact in binary, so they hit the tie.
        assert_eq!(format_file_size(1152), "1.13 KB");
        assert_eq!(format_file_size(2688), "2.63 KB");
        assert_eq!(format_file_size(1126), "1.1 KB");
    }

    #[test]
    fn test_parse_json() {
        assert_eq!(parse_json(r#"{"a": 1}"#), json!({"a": 1}));
        assert_eq!(parse_json("not json"), json!("not json"));
    }
}
