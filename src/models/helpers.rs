//! Types for the page helpers.

use serde::Deserialize;
use web_sys::Event;

use crate::config::{PLACEHOLDER_HEIGHT, PLACEHOLDER_TEXT, PLACEHOLDER_WIDTH};

/// Kind of resource injected into `<head>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// Classic `<script>`.
    Js,
    /// `<script type="module">`.
    Esm,
    /// `<link rel="stylesheet">`.
    Css,
}

/// A script or stylesheet to add to `<head>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadImport {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ImportKind,
}

impl HeadImport {
    pub fn js(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: ImportKind::Js,
        }
    }

    pub fn esm(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: ImportKind::Esm,
        }
    }

    pub fn css(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: ImportKind::Css,
        }
    }
}

/// Placeholder image settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlaceholderImage {
    pub text: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlaceholderImage {
    fn default() -> Self {
        Self {
            text: PLACEHOLDER_TEXT.to_string(),
            width: PLACEHOLDER_WIDTH,
            height: PLACEHOLDER_HEIGHT,
        }
    }
}

/// What ended an `await_event` wait.
#[derive(Debug, Clone)]
pub enum AwaitOutcome {
    Event(Event),
    Timeout,
}

impl AwaitOutcome {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AwaitOutcome::Timeout)
    }
}
