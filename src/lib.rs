//! Browser utility helpers compiled to WebAssembly.
//!
//! The browser-independent logic lives in [`utkit_core`]; this crate binds
//! it to the DOM, `fetch`, `document.cookie` and the CSSOM, and exports a
//! JavaScript surface from [`bindings`].

pub mod bindings;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use utkit_core::{Module, ModuleSelection, Namespace, PathSliceExt};
pub use utils::ElementExt;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}
