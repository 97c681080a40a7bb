//! Types for the fetch wrapper.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData, RequestCredentials};

use crate::config::FETCH_TIMEOUT_MS;
use crate::core::error::FetchError;

/// How the response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Json,
    Text,
    Blob,
}

/// A download progress update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Bytes received so far.
    pub loaded: f64,
    /// `content-length`, or 0 when the server did not send one.
    pub total: f64,
    /// `loaded / total`; `None` when the total is unknown.
    pub progress: Option<f64>,
    pub complete: bool,
}

impl Progress {
    pub fn new(loaded: f64, total: f64, complete: bool) -> Self {
        Self {
            loaded,
            total,
            progress: (total > 0.0).then(|| loaded / total),
            complete,
        }
    }
}

pub type ProgressCallback = Rc<dyn Fn(&Progress)>;

/// Request settings.
#[derive(Clone)]
pub struct FetchOptions {
    pub method: String,
    pub response_type: ResponseType,
    pub credentials: RequestCredentials,
    pub timeout_ms: i32,
    /// When set, the body is streamed and reported chunk by chunk.
    pub on_progress: Option<ProgressCallback>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            response_type: ResponseType::Json,
            credentials: RequestCredentials::SameOrigin,
            timeout_ms: FETCH_TIMEOUT_MS,
            on_progress: None,
        }
    }
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("method", &self.method)
            .field("response_type", &self.response_type)
            .field("credentials", &self.credentials)
            .field("timeout_ms", &self.timeout_ms)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl FetchOptions {
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn credentials(mut self, credentials: RequestCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: i32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn on_progress(mut self, callback: impl Fn(&Progress) + 'static) -> Self {
        self.on_progress = Some(Rc::new(callback));
        self
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// Request data.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    None,
    /// Query string for `GET`, form-encoded body otherwise.
    Fields(Vec<(String, String)>),
    /// Sent as the body unchanged; on `GET` its text fields become the query.
    Form(FormData),
    /// Any other body value, sent as-is. Not allowed on `GET`.
    Raw(JsValue),
}

impl Payload {
    pub fn fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Payload::Fields(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A decoded response body.
#[derive(Debug, Clone)]
pub enum FetchBody {
    Json(serde_json::Value),
    Text(String),
    Blob(Blob),
}

/// Outcome of a fetch. Failures are values, never panics.
pub type FetchResult = Result<FetchBody, FetchError>;
