//! Browser-side configuration.
//!
//! Centralizes the constants used by the DOM, fetch, CSS and helper
//! modules. Library-wide constants (version, media tables, CSS units) live
//! in [`utkit_core::config`].

// =============================================================================
// Network Configuration
// =============================================================================

/// Default fetch timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

/// Response header used to compute download progress.
pub const CONTENT_LENGTH_HEADER: &str = "content-length";

// =============================================================================
// Async Helpers
// =============================================================================

/// Default timeout for `await_event`, in milliseconds.
pub const AWAIT_EVENT_TIMEOUT_MS: i32 = 100000;

// =============================================================================
// Theme
// =============================================================================

/// Class toggled on the theme target when the OS prefers a dark scheme.
pub const DARK_CLASS: &str = "dark";

/// Media query matching a dark color scheme preference.
pub const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Directory stylesheets are injected from, relative to the page.
pub const STYLESHEET_BASE: &str = "./css";

/// Font size assumed when an element's computed font size is unreadable.
pub const FALLBACK_FONT_SIZE_PX: f64 = 16.0;

// =============================================================================
// DOM Events
// =============================================================================

/// Event dispatched on an observed element when its visibility changes.
pub const VISIBILITY_EVENT: &str = "visibility_change";

// =============================================================================
// Image Format Probes
// =============================================================================

/// 2x2 lossy WebP image.
pub const WEBP_PROBE: &str = "data:image/webp;base64,UklGRjoAAABXRUJQVlA4IC4AAACyAgCdASoCAAIALmk0mk0iIiIiIgBoSygABc6WWgAA/veff/0PP8bA//LwYAAA";

/// Height the WebP probe decodes to when the format is supported.
pub const WEBP_PROBE_HEIGHT: u32 = 2;

/// 1x1 AVIF image.
pub const AVIF_PROBE: &str = "data:image/avif;base64,AAAAHGZ0eXBhdmlmAAAAAGF2aWZtaWYxbWlhZgAAAOptZXRhAAAAAAAAACFoZGxyAAAAAAAAAABwaWN0AAAAAAAAAAAAAAAAAAAAAA5waXRtAAAAAAABAAAAImlsb2MAAAAAREAAAQABAAAAAAEOAAEAAAAAAAAAIgAAACNpaW5mAAAAAAABAAAAFWluZmUCAAAAAAEAAGF2MDEAAAAAamlwcnAAAABLaXBjbwAAABNjb2xybmNseAABAA0AAIAAAAAMYXYxQ4EgAgAAAAAUaXNwZQAAAAAAAAAQAAAAEAAAABBwaXhpAAAAAAMICAgAAAAXaXBtYQAAAAAAAAABAAEEgYIDhAAAACptZGF0EgAKCDgM/9lAQ0AIMhQQAAAAFLm4wN/TRReKCcSo648oag==";

// =============================================================================
// Placeholder Image
// =============================================================================

/// Caption drawn under the placeholder title.
pub const PLACEHOLDER_TEXT: &str = "Missing Asset";

/// Title drawn in the middle of the placeholder.
pub const PLACEHOLDER_TITLE: &str = "ASSET MISSING";

/// Placeholder canvas size in pixels.
pub const PLACEHOLDER_WIDTH: u32 = 960;
pub const PLACEHOLDER_HEIGHT: u32 = 720;

pub const PLACEHOLDER_BACKGROUND: &str = "rgba(30,30,30,0.9)";
pub const PLACEHOLDER_TITLE_COLOR: &str = "rgba(237,63,24,1)";
pub const PLACEHOLDER_TEXT_COLOR: &str = "rgba(255,255,255,0.8)";

/// Title and caption font sizes before device pixel ratio scaling.
pub const PLACEHOLDER_TITLE_SIZE: f64 = 40.0;
pub const PLACEHOLDER_TEXT_SIZE: f64 = 14.0;

pub const PLACEHOLDER_FONT: &str =
    "-apple-system, BlinkMacSystemFont, Segoe UI, Roboto, Helvetica, Arial, sans-serif";
