//! Browser helper modules.
//!
//! Provides:
//! - [`dom`] - Queries, classes, element creation, geometry, observers
//! - [`fetch`] - [`fetch`](fetch::fetch) with timeout, form encoding and progress
//! - [`cookie`] - Read/write/delete over `document.cookie`
//! - [`css`] - CSS variables, stylesheet loading, dark theme
//! - [`env`] - Environment detection and image format probes
//! - [`helpers`] - Head imports, placeholder images, async waits

pub mod cookie;
pub mod css;
pub mod dom;
pub mod env;
pub mod fetch;
pub mod helpers;

pub use dom::{ElementExt, Listeners, VisibilityObserver};
pub use helpers::{Deadline, with_deadline};
