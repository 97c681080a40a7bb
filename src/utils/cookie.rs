//! Cookie helpers over `document.cookie`.
//!
//! Values are written as given, without encoding.

use std::collections::BTreeMap;

use chrono::Utc;
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use utkit_core::cookie::{
    cookie_matches, delete_cookie_string, expiry_after_hours, find_cookie, parse_cookies_with,
    set_cookie_string,
};

use crate::core::error::DomError;
use crate::utils::dom::document;

fn html_document() -> Result<HtmlDocument, DomError> {
    document()?
        .dyn_into::<HtmlDocument>()
        .map_err(|_| DomError::NoDocument)
}

fn cookie_header() -> Result<String, DomError> {
    Ok(html_document()?.cookie()?)
}

fn write_cookie(assignment: &str) -> Result<(), DomError> {
    html_document()?.set_cookie(assignment).map_err(|e| {
        let err = DomError::from(e);
        tracing::warn!("cookie write failed: {err}");
        err
    })
}

/// All cookies, each value passed through `decodeURI`.
pub fn get_cookies() -> Result<BTreeMap<String, String>, DomError> {
    let header = cookie_header()?;
    Ok(parse_cookies_with(&header, |value| {
        js_sys::decode_uri(value)
            .map(String::from)
            .unwrap_or_else(|_| value.to_string())
    }))
}

/// Set a cookie that expires `hours` from now under `/{path}`.
pub fn set_cookie(name: &str, value: &str, hours: f64, path: &str) -> Result<(), DomError> {
    let expires = expiry_after_hours(Utc::now(), hours)
        .ok_or_else(|| DomError::Js(format!("cookie expiry of {hours} hours is out of range")))?;
    write_cookie(&set_cookie_string(name, value, expires, path))
}

/// Value of cookie `name`, or an empty string.
///
/// The whole cookie string is run through `decodeURIComponent` first.
pub fn get_cookie(name: &str) -> Result<String, DomError> {
    let header = cookie_header()?;
    let decoded = js_sys::decode_uri_component(&header)
        .map(String::from)
        .unwrap_or(header);
    Ok(find_cookie(&decoded, name))
}

/// Expire cookie `name` under `/{path}`.
pub fn delete_cookie(name: &str, path: &str) -> Result<(), DomError> {
    write_cookie(&delete_cookie_string(name, path))
}

/// Whether cookie `name` is set (and equals `value`, when given).
pub fn check_cookie(name: &str, value: Option<&str>) -> Result<bool, DomError> {
    Ok(cookie_matches(&get_cookie(name)?, value))
}
