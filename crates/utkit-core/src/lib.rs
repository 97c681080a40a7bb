//! Browser-independent core of the utkit helper library.
//!
//! Everything here operates on plain Rust values and `serde_json::Value`
//! graphs, so it can be unit tested on the host and reused from the
//! browser front end and the CLI alike.
//!
//! Provides:
//! - [`data`] - Deep path access, sorting, lookups and array helpers
//! - [`filter`] - Declarative per-field condition matching
//! - [`format`] - Padding, slugs, dates, durations and file sizes
//! - [`color`], [`units`] - CSS color parsing and unit resolution
//! - [`registry`] - The [`Namespace`] module registry

pub mod color;
pub mod config;
pub mod cookie;
pub mod data;
pub mod env;
mod error;
pub mod ext;
pub mod file;
pub mod filter;
pub mod format;
pub mod geometry;
pub mod location;
pub mod registry;
pub mod units;
pub mod value;

pub use color::{CssColor, css_color_string, parse_css_color};
pub use data::{deep_get, deep_set, sort_by_key};
pub use error::{PathError, RegistryError, UnknownCondition, UnknownScaleMode};
pub use ext::PathSliceExt;
pub use filter::{Condition, ConditionSpec, Conditions, match_value, turbo_filter};
pub use format::{format_file_size, slugify};
pub use registry::{Module, ModuleSelection, Namespace};
pub use units::{Computed, CssScalar, CssUnit, CssValue, UnitContext, resolve_css_value};
