//! Cookie header parsing and `document.cookie` assignment strings.
//!
//! The browser front end only reads and writes `document.cookie`; building
//! and taking apart the strings happens here.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::{COOKIE_DATE_FORMAT, COOKIE_EPOCH, MS_PER_HOUR};

/// All cookies in a `name=value; name2=value2` header, values as written.
pub fn parse_cookies(header: &str) -> BTreeMap<String, String> {
    parse_cookies_with(header, str::to_string)
}

/// Like [`parse_cookies`], running each value through `decode`.
///
/// Values may themselves contain `=`. Pairs with an empty name are skipped.
pub fn parse_cookies_with(
    header: &str,
    decode: impl Fn(&str) -> String,
) -> BTreeMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), decode(value)))
        })
        .collect()
}

/// Value of cookie `name`, or an empty string when it is not set.
pub fn find_cookie(header: &str, name: &str) -> String {
    let prefix = format!("{name}=");
    header
        .split(';')
        .map(|pair| pair.trim_start_matches(' '))
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))
        .unwrap_or_default()
        .to_string()
}

/// Whether a looked-up cookie value counts as present.
///
/// An empty value is never present; with `expected`, the value must also
/// equal it.
pub fn cookie_matches(found: &str, expected: Option<&str>) -> bool {
    if found.is_empty() {
        return false;
    }
    match expected {
        Some(expected) if !expected.is_empty() => found == expected,
        _ => true,
    }
}

/// Expiry instant `hours` after `now`; `None` if out of range.
pub fn expiry_after_hours(now: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    let ms = hours * MS_PER_HOUR;
    if !ms.is_finite() {
        return None;
    }
    let delta = TimeDelta::try_milliseconds(ms.round() as i64)?;
    now.checked_add_signed(delta)
}

/// `document.cookie` assignment that sets `name` until `expires`.
///
/// `path` is appended after a leading `/`; the value is not encoded.
pub fn set_cookie_string(name: &str, value: &str, expires: DateTime<Utc>, path: &str) -> String {
    format!(
        "{name}={value};expires={};path=/{path}",
        expires.format(COOKIE_DATE_FORMAT)
    )
}

/// `document.cookie` assignment that expires `name` immediately.
pub fn delete_cookie_string(name: &str, path: &str) -> String {
    format!("{name}=; expires={COOKIE_EPOCH}; path=/{path};")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_cookies() {
        let cookies = parse_cookies("a=1; b=x=y;  c=");
        assert_eq!(cookies["a"], "1");
        assert_eq!(cookies["b"], "x=y");
        assert_eq!(cookies["c"], "");
        assert!(parse_cookies("").is_empty());
    }

    #[test]
    fn test_parse_cookies_with_decoder() {
        let cookies = parse_cookies_with("k=a%20b", |v| v.replace("%20", " "));
        assert_eq!(cookies["k"], "a b");
    }

    #[test]
    fn test_find_cookie() {
        let header = "theme=dark; session=abc; sess=no";
        assert_eq!(find_cookie(header, "session"), "abc");
        assert_eq!(find_cookie(header, "sess"), "no");
        assert_eq!(find_cookie(header, "missing"), "");
    }

    #[test]
    fn test_cookie_matches() {
        assert!(cookie_matches("v", None));
        assert!(cookie_matches("v", Some("v")));
        assert!(!cookie_matches("v", Some("w")));
        assert!(!cookie_matches("", None));
    }

    #[test]
    fn test_set_cookie_string() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let expires = expiry_after_hours(now, 1.5).unwrap();
        assert_eq!(
            set_cookie_string("k", "v", expires, ""),
            "k=v;expires=Fri, 01 Mar 2024 13:30:00 GMT;path=/"
        );
        assert!(set_cookie_string("k", "v", expires, "app").ends_with(";path=/app"));
    }

    #[test]
    fn test_delete_cookie_string() {
        assert_eq!(
            delete_cookie_string("k", ""),
            "k=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/;"
        );
    }

    #[test]
    fn test_expiry_out_of_range() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(expiry_after_hours(now, f64::INFINITY), None);
        assert!(expiry_after_hours(now, -1.0).unwrap() < now);
    }
}
