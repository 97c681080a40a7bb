//! Custom error types for the browser helpers.
//!
//! - [`DomError`] - Document access, selectors, element types and JS exceptions
//! - [`FetchError`] - Network/fetch-related errors for HTTP requests

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Extract a readable message from a thrown JS value.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

/// DOM and document errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomError {
    /// Browser window not available
    #[error("browser window not available")]
    NoWindow,
    /// Document (or one of its parts, such as `<head>`) not available
    #[error("document not available")]
    NoDocument,
    /// `querySelector` rejected the selector
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
    /// Selector matched nothing where an element is required
    #[error("no element matches '{0}'")]
    NotFound(String),
    /// Element does not support the requested operation
    #[error("element is not {0}")]
    WrongType(&'static str),
    /// A resource element fired `error` instead of `load`
    #[error("failed to load '{0}'")]
    LoadFailed(String),
    /// Any other exception thrown by a browser API
    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_error_message(&value))
    }
}

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Failed to build the request (bad URL, body or method)
    #[error("failed to create request: {0}")]
    RequestCreationFailed(String),
    /// Network request failed (CORS, DNS, offline, ...)
    #[error("{0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP {status}: {status_text}")]
    HttpError { status: u16, status_text: String },
    /// Request aborted after the configured timeout
    #[error("request timed out")]
    Timeout,
    /// Failed to read the response body
    #[error("failed to read response: {0}")]
    ResponseReadFailed(String),
    /// Body was not valid JSON
    #[error("Invalid JSON response: {0}")]
    JsonParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        let err = FetchError::HttpError {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
    }

    #[test]
    fn test_dom_error_messages() {
        assert_eq!(
            DomError::NotFound("#app".to_string()).to_string(),
            "no element matches '#app'"
        );
        assert_eq!(
            DomError::WrongType("an HTML element").to_string(),
            "element is not an HTML element"
        );
    }
}
