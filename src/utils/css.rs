//! CSS variable inspection, stylesheet loading and theme switching.

use std::collections::{BTreeMap, HashSet};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CssStyleRule, CssStyleSheet, Element, HtmlElement, MediaQueryList, MediaQueryListEvent,
    Window,
};

use utkit_core::units::{CssValue, UnitContext, resolve_css_value};

use crate::config::{DARK_CLASS, DARK_QUERY, FALLBACK_FONT_SIZE_PX, STYLESHEET_BASE};
use crate::core::error::DomError;
use crate::models::{HeadImport, Target};
use crate::utils::dom::{self, document, window};
use crate::utils::helpers::add_head_import;

/// Font size and viewport of a live element.
struct ElementUnits<'a> {
    element: &'a Element,
    window: &'a Window,
}

impl UnitContext for ElementUnits<'_> {
    fn font_size(&self) -> f64 {
        get_css_var("font-size", Some(self.element))
            .ok()
            .and_then(|v| v.number())
            .unwrap_or(FALLBACK_FONT_SIZE_PX)
    }

    fn viewport(&self) -> (f64, f64) {
        let dimension =
            |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }
}

fn body() -> Result<Element, DomError> {
    document()?
        .body()
        .map(Element::from)
        .ok_or(DomError::NoDocument)
}

/// Read and classify the computed value of `prop` on `element`
/// (default `<body>`).
pub fn get_css_var(prop: &str, element: Option<&Element>) -> Result<CssValue, DomError> {
    let window = window().ok_or(DomError::NoWindow)?;
    let element = match element {
        Some(element) => element.clone(),
        None => body()?,
    };
    let raw = match window.get_computed_style(&element)? {
        Some(style) => style.get_property_value(prop)?,
        None => String::new(),
    };
    let ctx = ElementUnits {
        element: &element,
        window: &window,
    };
    Ok(resolve_css_value(&raw, &ctx))
}

/// Names of every custom property (`--*`) declared in the page's
/// stylesheets, in declaration order.
///
/// Sheets whose rules cannot be read (cross-origin) are skipped.
pub fn get_css_var_names() -> Result<Vec<String>, DomError> {
    let sheets = document()?.style_sheets();
    let mut names: Vec<String> = Vec::new();

    for i in 0..sheets.length() {
        let Some(sheet) = sheets
            .item(i)
            .and_then(|s| s.dyn_into::<CssStyleSheet>().ok())
        else {
            continue;
        };
        let Ok(rules) = sheet.css_rules() else {
            continue;
        };
        for j in 0..rules.length() {
            let Some(rule) = rules
                .item(j)
                .and_then(|r| r.dyn_into::<CssStyleRule>().ok())
            else {
                continue;
            };
            let style = rule.style();
            for k in 0..style.length() {
                let name = style.item(k);
                if name.starts_with("--") && !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }

    Ok(names)
}

/// Every declared custom property, resolved against `<body>`.
pub fn get_css_vars() -> Result<BTreeMap<String, CssValue>, DomError> {
    get_css_var_names()?
        .into_iter()
        .map(|name| {
            let value = get_css_var(&name, None)?;
            Ok((name, value))
        })
        .collect()
}

/// Set a custom property on `element` (default `<html>`).
pub fn set_css_var(
    name: &str,
    value: &str,
    element: Option<&HtmlElement>,
) -> Result<(), DomError> {
    let element = match element {
        Some(element) => element.clone(),
        None => document()?
            .document_element()
            .ok_or(DomError::NoDocument)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::WrongType("an HTML element"))?,
    };
    element.style().set_property(name, value)?;
    Ok(())
}

// =============================================================================
// Theme
// =============================================================================

/// Keeps the dark class in sync with the OS preference. Stops when dropped.
pub struct ThemeListener {
    query: MediaQueryList,
    callback: Option<Closure<dyn FnMut(MediaQueryListEvent)>>,
}

impl ThemeListener {
    /// Keep listening for the page lifetime.
    pub fn forget(mut self) {
        if let Some(callback) = self.callback.take() {
            callback.forget();
        }
    }
}

impl Drop for ThemeListener {
    fn drop(&mut self) {
        if let Some(callback) = &self.callback {
            let _ = self
                .query
                .remove_event_listener_with_callback("change", callback.as_ref().unchecked_ref());
        }
    }
}

fn apply_theme(element: &Element, dark: bool) {
    let list = element.class_list();
    let result = if dark {
        list.add_1(DARK_CLASS)
    } else {
        list.remove_1(DARK_CLASS)
    };
    if let Err(e) = result {
        tracing::warn!("failed to apply theme: {}", crate::core::error::js_error_message(&e));
    }
}

/// Add or remove the `dark` class on `target` (default `<body>`) from the
/// OS color scheme preference.
///
/// With `listen`, the returned handle keeps tracking preference changes.
pub fn set_theme(
    target: Option<Target<'_>>,
    listen: bool,
) -> Result<Option<ThemeListener>, DomError> {
    let element = match target {
        Some(target) => dom::resolve(target)?,
        None => body()?,
    };
    let window = window().ok_or(DomError::NoWindow)?;
    let Some(query) = window.match_media(DARK_QUERY)? else {
        apply_theme(&element, false);
        return Ok(None);
    };
    apply_theme(&element, query.matches());

    if !listen {
        return Ok(None);
    }

    let callback = Closure::<dyn FnMut(MediaQueryListEvent)>::new(
        move |event: MediaQueryListEvent| apply_theme(&element, event.matches()),
    );
    query.add_event_listener_with_callback("change", callback.as_ref().unchecked_ref())?;
    Ok(Some(ThemeListener {
        query,
        callback: Some(callback),
    }))
}

// =============================================================================
// Stylesheet Loading
// =============================================================================

/// Injects a stylesheet when the custom property it defines is missing.
///
/// Each property is checked once per loader.
#[derive(Debug, Clone)]
pub struct StylesheetLoader {
    base_url: String,
    checked: HashSet<String>,
}

impl Default for StylesheetLoader {
    fn default() -> Self {
        Self::new(STYLESHEET_BASE)
    }
}

impl StylesheetLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            checked: HashSet::new(),
        }
    }

    fn url(&self, file: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), file)
    }

    /// Make sure `prop` is defined, loading `file` from the base URL if not.
    ///
    /// Returns the custom properties known after any load.
    pub async fn ensure(
        &mut self,
        prop: &str,
        file: &str,
    ) -> Result<BTreeMap<String, CssValue>, DomError> {
        let vars = get_css_vars()?;
        if !self.checked.insert(prop.to_string()) {
            return Ok(vars);
        }
        if vars.contains_key(prop) {
            tracing::debug!(prop, "stylesheet already loaded");
            return Ok(vars);
        }

        let url = self.url(file);
        tracing::info!(url = %url, "injecting stylesheet");
        add_head_import(&HeadImport::css(url)).await?;
        get_css_vars()
    }
}
