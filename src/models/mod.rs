//! Data models and option types for the browser helpers.
//!
//! Contains:
//! - [`Target`], [`ElementOptions`], [`ObserverOptions`], [`Offset`] - DOM helpers
//! - [`FetchOptions`], [`Payload`], [`Progress`], [`FetchBody`] - Fetch wrapper
//! - [`HeadImport`], [`PlaceholderImage`], [`AwaitOutcome`] - Page helpers

mod dom;
mod fetch;
mod helpers;

pub use dom::{ElementOptions, Inner, ObserverOptions, Offset, Target};
pub use fetch::{
    FetchBody, FetchOptions, FetchResult, Payload, Progress, ProgressCallback, ResponseType,
};
pub use helpers::{AwaitOutcome, HeadImport, ImportKind, PlaceholderImage};
