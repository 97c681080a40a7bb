//! Shared plumbing for the browser helpers.
//!
//! This module provides:
//! - [`error`] - [`DomError`] and [`FetchError`]
//! - The [`Namespace`] registry, re-exported from `utkit_core`

pub mod error;

pub use error::{DomError, FetchError, js_error_message};
pub use utkit_core::{Module, ModuleSelection, Namespace};
