//! Error types for the core helpers.
//!
//! - [`PathError`] - Writes through a deep path that does not resolve
//! - [`UnknownCondition`] - Filter operator names outside the condition table
//! - [`RegistryError`] - Module names the registry does not know
//! - [`UnknownScaleMode`] - Scale mode names outside fit/cover/fill

use thiserror::Error;

/// Failure to write through a `.`-separated path.
///
/// Raised by [`deep_set`](crate::data::deep_set) when the call itself is
/// malformed, so callers see it instead of a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// An intermediate segment does not exist.
    #[error("path '{path}': segment '{segment}' does not exist")]
    MissingSegment { path: String, segment: String },
    /// The value reached before the last segment cannot hold children.
    #[error("path '{path}': cannot set '{segment}' on a non-container value")]
    NotAContainer { path: String, segment: String },
    /// An array segment is not a usable index.
    #[error("path '{path}': '{segment}' is not a valid index for an array of length {len}")]
    InvalidIndex {
        path: String,
        segment: String,
        len: usize,
    },
}

/// A filter condition name that is not in the condition table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid condition: {0}")]
pub struct UnknownCondition(pub String);

/// Module registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No module group with this name exists.
    #[error("module '{0}' not found")]
    UnknownModule(String),
}

/// A scale mode name [`ScaleMode`](crate::geometry::ScaleMode) does not accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scale mode: {0}")]
pub struct UnknownScaleMode(pub String);
