//! DOM and Web API utility functions.
//!
//! Elements are addressed through [`Target`]: either a selector resolved
//! against the document or an element the caller already holds.
//! Selector syntax errors are returned as [`DomError::InvalidSelector`].

use js_sys::{Array, Function};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DomRect, Element, Event, EventTarget, HtmlElement, HtmlImageElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, NodeList, Window,
};

use utkit_core::file::get_extension;
use utkit_core::geometry::{self, Rect};
use utkit_core::location::{self, Params};

use crate::config::VISIBILITY_EVENT;
use crate::core::error::DomError;
use crate::models::{ElementOptions, Inner, ObserverOptions, Offset, Target};
use crate::utils::helpers::{load_promise, loaded};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the document.
pub fn document() -> Result<Document, DomError> {
    window()
        .ok_or(DomError::NoWindow)?
        .document()
        .ok_or(DomError::NoDocument)
}

// =============================================================================
// Queries
// =============================================================================

fn invalid_selector(selector: &str, err: JsValue) -> DomError {
    DomError::InvalidSelector {
        selector: selector.to_string(),
        message: crate::core::error::js_error_message(&err),
    }
}

fn node_list_elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// First element in the document matching `selector`.
pub fn el(selector: &str) -> Result<Option<Element>, DomError> {
    document()?
        .query_selector(selector)
        .map_err(|e| invalid_selector(selector, e))
}

/// First descendant of `context` matching `selector`.
pub fn el_in(context: &Element, selector: &str) -> Result<Option<Element>, DomError> {
    context
        .query_selector(selector)
        .map_err(|e| invalid_selector(selector, e))
}

/// All elements in the document matching `selector`.
pub fn els(selector: &str) -> Result<Vec<Element>, DomError> {
    let list = document()?
        .query_selector_all(selector)
        .map_err(|e| invalid_selector(selector, e))?;
    Ok(node_list_elements(&list))
}

/// All descendants of `context` matching `selector`.
pub fn els_in(context: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
    let list = context
        .query_selector_all(selector)
        .map_err(|e| invalid_selector(selector, e))?;
    Ok(node_list_elements(&list))
}

/// The element a target refers to, if any.
pub fn find<'a>(target: impl Into<Target<'a>>) -> Result<Option<Element>, DomError> {
    match target.into() {
        Target::Element(element) => Ok(Some(element.clone())),
        Target::Selector(selector) => el(selector),
    }
}

/// The element a target refers to; [`DomError::NotFound`] when nothing matches.
pub fn resolve<'a>(target: impl Into<Target<'a>>) -> Result<Element, DomError> {
    match target.into() {
        Target::Element(element) => Ok(element.clone()),
        Target::Selector(selector) => {
            el(selector)?.ok_or_else(|| DomError::NotFound(selector.to_string()))
        }
    }
}

fn resolve_html<'a>(target: impl Into<Target<'a>>) -> Result<HtmlElement, DomError> {
    resolve(target)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| DomError::WrongType("an HTML element"))
}

/// Element-scoped query shortcuts.
pub trait ElementExt {
    /// First descendant matching `selector`.
    fn el(&self, selector: &str) -> Result<Option<Element>, DomError>;
    /// All descendants matching `selector`.
    fn els(&self, selector: &str) -> Result<Vec<Element>, DomError>;
}

impl ElementExt for Element {
    fn el(&self, selector: &str) -> Result<Option<Element>, DomError> {
        el_in(self, selector)
    }

    fn els(&self, selector: &str) -> Result<Vec<Element>, DomError> {
        els_in(self, selector)
    }
}

// =============================================================================
// Classes and Styles
// =============================================================================

/// Set inline style properties, or clear them when `remove` is set.
pub fn css<'a, K, V>(
    target: impl Into<Target<'a>>,
    props: impl IntoIterator<Item = (K, V)>,
    remove: bool,
) -> Result<(), DomError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let style = resolve_html(target)?.style();
    for (key, value) in props {
        if remove {
            style.remove_property(key.as_ref())?;
        } else {
            style.set_property(key.as_ref(), value.as_ref())?;
        }
    }
    Ok(())
}

/// Add space-separated class names. Adding a present class is a no-op.
pub fn add_class<'a>(target: impl Into<Target<'a>>, classes: &str) -> Result<(), DomError> {
    let list = resolve(target)?.class_list();
    for class in classes.split_whitespace() {
        list.add_1(class)?;
    }
    Ok(())
}

/// Add each entry of `classes`; entries may themselves hold several names.
pub fn add_classes<'a, S: AsRef<str>>(
    target: impl Into<Target<'a>>,
    classes: &[S],
) -> Result<(), DomError> {
    let element = resolve(target)?;
    for entry in classes {
        add_class(&element, entry.as_ref())?;
    }
    Ok(())
}

/// Remove space-separated class names.
pub fn remove_class<'a>(target: impl Into<Target<'a>>, classes: &str) -> Result<(), DomError> {
    let list = resolve(target)?.class_list();
    for class in classes.split_whitespace() {
        list.remove_1(class)?;
    }
    Ok(())
}

/// Toggle a class; returns whether it is now present.
pub fn toggle_class<'a>(target: impl Into<Target<'a>>, class: &str) -> Result<bool, DomError> {
    Ok(resolve(target)?.class_list().toggle(class)?)
}

pub fn has_class<'a>(target: impl Into<Target<'a>>, class: &str) -> Result<bool, DomError> {
    Ok(resolve(target)?.class_list().contains(class))
}

/// Clear an inline `display` override.
pub fn show<'a>(target: impl Into<Target<'a>>) -> Result<(), DomError> {
    resolve_html(target)?.style().remove_property("display")?;
    Ok(())
}

pub fn hide<'a>(target: impl Into<Target<'a>>) -> Result<(), DomError> {
    resolve_html(target)?
        .style()
        .set_property("display", "none")?;
    Ok(())
}

// =============================================================================
// Tree Manipulation
// =============================================================================

/// Remove all children. Does nothing when the target is missing.
pub fn kill_kids<'a>(target: impl Into<Target<'a>>) -> Result<(), DomError> {
    if let Some(element) = find(target)? {
        while let Some(child) = element.first_child() {
            element.remove_child(&child)?;
        }
    }
    Ok(())
}

/// Detach the element from its parent. Does nothing when the target is missing.
pub fn kill_me<'a>(target: impl Into<Target<'a>>) -> Result<(), DomError> {
    if let Some(element) = find(target)?
        && let Some(parent) = element.parent_node()
    {
        parent.remove_child(&element)?;
    }
    Ok(())
}

/// Set attributes on an element.
pub fn attributes<'a, K, V>(
    target: impl Into<Target<'a>>,
    attrs: impl IntoIterator<Item = (K, V)>,
) -> Result<(), DomError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let element = resolve(target)?;
    for (name, value) in attrs {
        element.set_attribute(name.as_ref(), value.as_ref())?;
    }
    Ok(())
}

/// Create an element configured by `options`.
///
/// Event listeners are not attached here; use [`add_events`] and keep
/// the returned handle.
pub fn create_element(tag: &str, options: ElementOptions) -> Result<Element, DomError> {
    let element = document()?.create_element(tag)?;

    if let Some(id) = &options.id {
        element.set_id(id);
    }
    if let Some(classes) = &options.classes {
        add_class(&element, classes)?;
    }
    if !options.style.is_empty() {
        css(&element, &options.style, false)?;
    }
    match &options.inner {
        Some(Inner::Html(html)) => element.set_inner_html(html),
        Some(Inner::Node(node)) => {
            element.append_child(node)?;
        }
        None => {}
    }
    if let Some(target) = &options.target {
        target.append_child(&element)?;
    }
    attributes(&element, &options.attributes)?;
    if !options.dataset.is_empty() {
        let html = element
            .dyn_ref::<HtmlElement>()
            .ok_or(DomError::WrongType("an HTML element"))?;
        let dataset = html.dataset();
        for (key, value) in &options.dataset {
            dataset.set(key, value)?;
        }
    }

    Ok(element)
}

/// Parse markup into an element.
///
/// Markup with several top-level elements is wrapped in a `<div>`.
pub fn html_object(markup: &str) -> Result<Option<Element>, DomError> {
    let doc = document()?;
    let fragment = doc.create_range()?.create_contextual_fragment(markup)?;
    if fragment.children().length() > 1 {
        let wrapped = doc
            .create_range()?
            .create_contextual_fragment(&format!("<div>{markup}</div>"))?;
        return Ok(wrapped.first_element_child());
    }
    Ok(fragment.first_element_child())
}

// =============================================================================
// Events
// =============================================================================

/// Event listeners attached to one target.
///
/// Dropping the handle removes every listener; call [`Listeners::forget`]
/// to leave them attached for the page lifetime.
pub struct Listeners {
    target: EventTarget,
    entries: Vec<(String, Function)>,
    closures: Vec<Closure<dyn FnMut(Event)>>,
}

impl Listeners {
    pub fn new(target: &EventTarget) -> Self {
        Self {
            target: target.clone(),
            entries: Vec::new(),
            closures: Vec::new(),
        }
    }

    /// Attach a Rust handler.
    pub fn on(
        &mut self,
        event: &str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), DomError> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let function: &Function = closure.as_ref().unchecked_ref();
        self.on_function(event, function)?;
        self.closures.push(closure);
        Ok(())
    }

    /// Attach a JS function.
    pub fn on_function(&mut self, event: &str, function: &Function) -> Result<(), DomError> {
        self.target
            .add_event_listener_with_callback(event, function)?;
        self.entries.push((event.to_string(), function.clone()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every listener attached through this handle.
    pub fn clear(&mut self) {
        for (event, function) in self.entries.drain(..) {
            let _ = self
                .target
                .remove_event_listener_with_callback(&event, &function);
        }
        self.closures.clear();
    }

    /// Keep the listeners attached after the handle is gone.
    pub fn forget(mut self) {
        self.entries.clear();
        for closure in self.closures.drain(..) {
            closure.forget();
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Attach handlers by event name.
pub fn add_events<'a, F>(
    target: impl Into<Target<'a>>,
    events: impl IntoIterator<Item = (&'a str, F)>,
) -> Result<Listeners, DomError>
where
    F: FnMut(Event) + 'static,
{
    let element = resolve(target)?;
    let mut listeners = Listeners::new(&element);
    for (event, handler) in events {
        listeners.on(event, handler)?;
    }
    Ok(listeners)
}

/// Report page visibility changes: `cb(true)` when the page becomes hidden.
pub fn visibility(mut cb: impl FnMut(bool) + 'static) -> Result<Listeners, DomError> {
    let doc = document()?;
    let mut listeners = Listeners::new(&doc);
    let watched = doc.clone();
    listeners.on("visibilitychange", move |_| cb(watched.hidden()))?;
    Ok(listeners)
}

// =============================================================================
// Geometry
// =============================================================================

fn dom_rect(rect: &DomRect) -> Rect {
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// Position of the element relative to the document.
pub fn offset<'a>(target: impl Into<Target<'a>>) -> Result<Offset, DomError> {
    let rect = resolve(target)?.get_bounding_client_rect();
    let window = window().ok_or(DomError::NoWindow)?;
    Ok(Offset {
        top: rect.top() + window.scroll_y()?,
        left: rect.left() + window.scroll_x()?,
    })
}

/// Whether viewport point `(x, y)` lies strictly inside the element's box.
pub fn hit_object<'a>(target: impl Into<Target<'a>>, x: f64, y: f64) -> Result<bool, DomError> {
    let rect = resolve(target)?.get_bounding_client_rect();
    Ok(geometry::hit_rect(dom_rect(&rect), x, y))
}

/// Translation `[x, y]` of the element's computed transform.
pub fn get_computed_translate_xy<'a>(
    target: impl Into<Target<'a>>,
) -> Result<[f64; 2], DomError> {
    let element = resolve(target)?;
    let window = window().ok_or(DomError::NoWindow)?;
    let transform = match window.get_computed_style(&element)? {
        Some(style) => style.get_property_value("transform")?,
        None => String::new(),
    };
    Ok(geometry::parse_translate(&transform))
}

/// Load an image and wait until it has decoded.
pub async fn get_image(src: &str) -> Result<HtmlImageElement, DomError> {
    let image = HtmlImageElement::new()?;
    let pending = load_promise(&image);
    image.set_src(src);
    if loaded(pending).await {
        Ok(image)
    } else {
        Err(DomError::LoadFailed(src.to_string()))
    }
}

// =============================================================================
// Location
// =============================================================================

/// Parameters in `hash`, or in the current `location.hash` when `None`.
pub fn location_hash(hash: Option<&str>) -> Result<Params, DomError> {
    let hash = match hash {
        Some(hash) => hash.to_string(),
        None => window().ok_or(DomError::NoWindow)?.location().hash()?,
    };
    Ok(location::parse_hash(&hash))
}

/// Parameters in `search`, or in the current `location.search` when `None`.
pub fn location_search(search: Option<&str>) -> Result<Params, DomError> {
    let search = match search {
        Some(search) => search.to_string(),
        None => window().ok_or(DomError::NoWindow)?.location().search()?,
    };
    Ok(location::parse_search(&search))
}

// =============================================================================
// Fullscreen
// =============================================================================

pub fn enter_fullscreen<'a>(target: impl Into<Target<'a>>) -> Result<(), DomError> {
    resolve(target)?.request_fullscreen()?;
    Ok(())
}

pub fn exit_fullscreen() -> Result<(), DomError> {
    document()?.exit_fullscreen();
    Ok(())
}

/// Enter fullscreen, or leave it if something is already fullscreen.
/// Returns whether the target is now fullscreen.
pub fn toggle_fullscreen<'a>(target: impl Into<Target<'a>>) -> Result<bool, DomError> {
    if document()?.fullscreen_element().is_some() {
        exit_fullscreen()?;
        Ok(false)
    } else {
        enter_fullscreen(target)?;
        Ok(true)
    }
}

// =============================================================================
// Visibility Observer
// =============================================================================

/// A running `IntersectionObserver`. Disconnects when dropped.
pub struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array)>,
}

impl VisibilityObserver {
    pub fn disconnect(&self) {
        self.observer.disconnect();
    }

    pub fn observer(&self) -> &IntersectionObserver {
        &self.observer
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Watch whether the element intersects the viewport (or `options.root`).
///
/// `cb` receives the intersection state and the raw entry; a
/// `visibility_change` event is also dispatched on the element.
pub fn is_visible_observer<'a>(
    target: impl Into<Target<'a>>,
    mut cb: impl FnMut(bool, &IntersectionObserverEntry) + 'static,
    options: ObserverOptions,
) -> Result<VisibilityObserver, DomError> {
    let element = resolve(target)?;

    let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            cb(entry.is_intersecting(), &entry);
            if let Ok(event) = Event::new(VISIBILITY_EVENT) {
                let _ = entry.target().dispatch_event(&event);
            }
        }
    });

    let init = IntersectionObserverInit::new();
    init.set_root(options.root.as_ref());
    if let Some(margin) = &options.root_margin {
        init.set_root_margin(margin);
    }
    if !options.threshold.is_empty() {
        let thresholds: Array = options
            .threshold
            .iter()
            .map(|t| JsValue::from_f64(*t))
            .collect();
        init.set_threshold(&thresholds);
    }

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    observer.observe(&element);

    Ok(VisibilityObserver {
        observer,
        _callback: callback,
    })
}

// =============================================================================
// Inline SVG
// =============================================================================

/// Replace every `<img>` whose source is an `.svg` file with the SVG markup.
///
/// Images that fail to load or parse are left in place with a warning.
/// Returns how many images were replaced.
pub async fn inline_svg(classes: Option<&str>) -> Result<usize, DomError> {
    let mut replaced = 0;
    for element in els("img")? {
        let Ok(image) = element.dyn_into::<HtmlImageElement>() else {
            continue;
        };
        let src = image.src();
        if get_extension(&src) != "svg" {
            continue;
        }
        match inline_one(&image, &src, classes).await {
            Ok(()) => replaced += 1,
            Err(e) => tracing::warn!(src = %src, "failed to inline svg: {e}"),
        }
    }
    Ok(replaced)
}

async fn inline_one(
    image: &HtmlImageElement,
    src: &str,
    classes: Option<&str>,
) -> Result<(), DomError> {
    let response = gloo_net::http::Request::get(src)
        .send()
        .await
        .map_err(|e| DomError::Js(e.to_string()))?;
    let markup = response
        .text()
        .await
        .map_err(|e| DomError::Js(e.to_string()))?;
    let svg = html_object(&markup)?.ok_or_else(|| DomError::LoadFailed(src.to_string()))?;
    let parent = image
        .parent_element()
        .ok_or(DomError::WrongType("attached to a parent"))?;
    parent.prepend_with_node_1(&svg)?;
    parent.remove_child(image)?;
    if let Some(classes) = classes {
        add_class(&svg, classes)?;
    }
    Ok(())
}
