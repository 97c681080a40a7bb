//! JavaScript surface of the library.
//!
//! Values cross the boundary as plain JSON-compatible objects. Fallible
//! calls throw, except `fetchUrl` and `readJson`, which always resolve and
//! report failures as `{ error }`.

use std::collections::BTreeMap;

use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, Element, EventTarget, FormData, HtmlElement, HtmlImageElement, Node, RequestCredentials,
};

use utkit_core::geometry::{self, ScaleMode};
use utkit_core::value::{format_number, to_display_string};
use utkit_core::{
    Conditions, Module, ModuleSelection, Namespace, PathSliceExt, color, data, file, filter,
    format,
};

use crate::config::AWAIT_EVENT_TIMEOUT_MS;
use crate::core::error::js_error_message;
use crate::models::{
    AwaitOutcome, ElementOptions, FetchBody, FetchOptions, FetchResult, HeadImport,
    ObserverOptions, Payload, PlaceholderImage, ResponseType, Target,
};
use crate::utils::{Listeners, VisibilityObserver, cookie, css, dom, env, fetch, helpers};

// =============================================================================
// Conversion Helpers
// =============================================================================

#[derive(Serialize)]
struct ErrorReply<'a> {
    error: &'a str,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsError> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

fn from_js_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    from_js(value)
}

fn error_reply(message: &str) -> JsValue {
    to_js(&ErrorReply { error: message }).unwrap_or_else(|_| JsValue::from_str(message))
}

/// Invoke a JS callback; an exception it throws is logged and yields `None`.
fn call_reporting(callback: &Function, name: &str, args: &[&JsValue]) -> Option<JsValue> {
    let args: Array = args.iter().collect();
    match callback.apply(&JsValue::NULL, &args) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{name} callback threw: {}", js_error_message(&e));
            None
        }
    }
}

fn get(object: &JsValue, key: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// A selector string or an element handed in from JS.
enum JsTarget {
    Selector(String),
    Element(Element),
}

impl JsTarget {
    fn from_js(value: &JsValue) -> Result<Self, JsError> {
        if let Some(selector) = value.as_string() {
            return Ok(Self::Selector(selector));
        }
        value
            .dyn_ref::<Element>()
            .cloned()
            .map(Self::Element)
            .ok_or_else(|| JsError::new("expected a selector or an element"))
    }

    fn as_target(&self) -> Target<'_> {
        match self {
            Self::Selector(selector) => Target::Selector(selector),
            Self::Element(element) => Target::Element(element),
        }
    }
}

fn selection_from_js(value: JsValue) -> Result<ModuleSelection, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(ModuleSelection::All);
    }
    from_js(value)
}

/// Attach every `name: handler` pair of a JS object.
fn listeners_from_object(target: &EventTarget, events: &JsValue) -> Result<Listeners, JsError> {
    let mut listeners = Listeners::new(target);
    if let Some(events) = events.dyn_ref::<Object>() {
        for entry in Object::entries(events).iter() {
            let pair: Array = entry.unchecked_into();
            let name = pair.get(0).as_string();
            let handler = pair.get(1).dyn_into::<Function>();
            let (Some(name), Ok(handler)) = (name, handler) else {
                continue;
            };
            listeners.on_function(&name, &handler)?;
        }
    }
    Ok(listeners)
}

// =============================================================================
// Namespace
// =============================================================================

/// Registry of the loaded helper groups.
#[wasm_bindgen(js_name = Ut)]
pub struct UtNamespace {
    inner: Namespace,
}

impl UtNamespace {
    /// Helpers reached through the instance fail unless their group is loaded.
    fn require(&self, module: Module) -> Result<(), JsError> {
        if self.inner.is_loaded(module) {
            Ok(())
        } else {
            Err(JsError::new(&format!("module '{}' is not loaded", module.name())))
        }
    }
}

#[wasm_bindgen(js_class = Ut)]
impl UtNamespace {
    /// `"all"` (or nothing), one group name, or a list of names.
    #[wasm_bindgen(constructor)]
    pub fn new(selection: JsValue) -> Result<UtNamespace, JsError> {
        Ok(Self {
            inner: Namespace::init(selection_from_js(selection)?),
        })
    }

    pub fn load(&mut self, selection: JsValue) -> Result<(), JsError> {
        self.inner.load(selection_from_js(selection)?);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> Vec<u32> {
        self.inner.version.to_vec()
    }

    #[wasm_bindgen(getter, js_name = versionDate)]
    pub fn version_date(&self) -> Vec<u32> {
        self.inner.version_date.to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn modules(&self) -> Vec<String> {
        self.inner.modules().map(|m| m.name().to_string()).collect()
    }

    #[wasm_bindgen(js_name = isLoaded)]
    pub fn is_loaded(&self, name: &str) -> Result<bool, JsError> {
        let module: Module = name.parse()?;
        Ok(self.inner.is_loaded(module))
    }

    #[wasm_bindgen(js_name = itemByProp)]
    pub fn item_by_prop(
        &self,
        items: JsValue,
        prop: &str,
        value: JsValue,
    ) -> Result<JsValue, JsError> {
        self.require(Module::Data)?;
        item_by_prop(items, prop, value)
    }

    #[wasm_bindgen(js_name = keyByDeepValue)]
    pub fn key_by_deep_value(
        &self,
        obj: JsValue,
        path: &str,
        value: JsValue,
    ) -> Result<Option<String>, JsError> {
        self.require(Module::Data)?;
        key_by_deep_value(obj, path, value)
    }

    #[wasm_bindgen(js_name = randomIndex)]
    pub fn random_index(&self, max: usize) -> Result<usize, JsError> {
        self.require(Module::Data)?;
        Ok(random_index(max))
    }

    pub fn jclone(&self, value: JsValue) -> Result<JsValue, JsError> {
        self.require(Module::Data)?;
        jclone(value)
    }

    #[wasm_bindgen(js_name = hitRect)]
    pub fn hit_rect(&self, rect: Vec<f64>, x: f64, y: f64) -> Result<bool, JsError> {
        self.require(Module::Dom)?;
        hit_rect(rect, x, y)
    }

    #[wasm_bindgen(js_name = enterFullscreen)]
    pub fn enter_fullscreen(&self, target: JsValue) -> Result<(), JsError> {
        self.require(Module::Dom)?;
        enter_fullscreen(target)
    }

    #[wasm_bindgen(js_name = exitFullscreen)]
    pub fn exit_fullscreen(&self) -> Result<(), JsError> {
        self.require(Module::Dom)?;
        exit_fullscreen()
    }
}

/// Event listeners attached from JS. `clear()` detaches them.
#[wasm_bindgen]
pub struct EventHandle {
    listeners: Listeners,
}

#[wasm_bindgen]
impl EventHandle {
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.listeners.len()
    }
}

/// A running visibility observer.
#[wasm_bindgen]
pub struct ObserverHandle {
    observer: VisibilityObserver,
}

#[wasm_bindgen]
impl ObserverHandle {
    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

// =============================================================================
// Data
// =============================================================================

#[wasm_bindgen(js_name = deepGet)]
pub fn deep_get(obj: JsValue, path: &str) -> Result<JsValue, JsError> {
    let obj: Value = from_js(obj)?;
    match data::deep_get(&obj, path) {
        Some(value) => to_js(value),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Returns a copy of `obj` with `path` set.
#[wasm_bindgen(js_name = deepSet)]
pub fn deep_set(obj: JsValue, path: &str, value: JsValue) -> Result<JsValue, JsError> {
    let mut obj: Value = from_js(obj)?;
    data::deep_set(&mut obj, path, from_js(value)?)?;
    to_js(&obj)
}

#[wasm_bindgen(js_name = sortByKey)]
pub fn sort_by_key(items: JsValue, path: &str, numeric: Option<bool>) -> Result<JsValue, JsError> {
    let mut items: Vec<Value> = from_js(items)?;
    items.sort_by_path(path, numeric.unwrap_or(false));
    to_js(&items)
}

#[wasm_bindgen(js_name = includesDeep)]
pub fn includes_deep(items: JsValue, path: &str, compare: JsValue) -> Result<bool, JsError> {
    let items: Vec<Value> = from_js(items)?;
    Ok(items.includes_deep(path, &from_js(compare)?))
}

#[wasm_bindgen(js_name = indexByProp)]
pub fn index_by_prop(
    items: JsValue,
    prop: &str,
    value: JsValue,
) -> Result<Option<usize>, JsError> {
    let items: Vec<Value> = from_js(items)?;
    Ok(data::index_by_prop(&items, prop, &from_js(value)?))
}

/// First record holding `value` at `prop`, or `undefined`.
#[wasm_bindgen(js_name = itemByProp)]
pub fn item_by_prop(items: JsValue, prop: &str, value: JsValue) -> Result<JsValue, JsError> {
    let items: Vec<Value> = from_js(items)?;
    match data::item_by_prop(&items, prop, &from_js(value)?) {
        Some(item) => to_js(item),
        None => Ok(JsValue::UNDEFINED),
    }
}

#[wasm_bindgen(js_name = allIdxByProp)]
pub fn all_idx_by_prop(
    items: JsValue,
    prop: &str,
    value: JsValue,
) -> Result<Vec<usize>, JsError> {
    let items: Vec<Value> = from_js(items)?;
    Ok(data::all_idx_by_prop(&items, prop, &from_js(value)?))
}

#[wasm_bindgen(js_name = keyByValue)]
pub fn key_by_value(obj: JsValue, value: JsValue) -> Result<Option<String>, JsError> {
    let obj: Map<String, Value> = from_js(obj)?;
    Ok(data::key_by_value(&obj, &from_js(value)?).map(str::to_string))
}

#[wasm_bindgen(js_name = keyByDeepValue)]
pub fn key_by_deep_value(
    obj: JsValue,
    path: &str,
    value: JsValue,
) -> Result<Option<String>, JsError> {
    let obj: Map<String, Value> = from_js(obj)?;
    Ok(data::key_by_deep_value(&obj, path, &from_js(value)?).map(str::to_string))
}

#[wasm_bindgen(js_name = arrayToObject)]
pub fn array_to_object(items: JsValue, key: &str) -> Result<JsValue, JsError> {
    let items: Vec<Value> = from_js(items)?;
    to_js(&data::array_to_object(&items, key))
}

#[wasm_bindgen(js_name = shuffleArray)]
pub fn shuffle_array(items: JsValue) -> Result<JsValue, JsError> {
    let mut items: Vec<Value> = from_js(items)?;
    data::shuffle_array(&mut items);
    to_js(&items)
}

#[wasm_bindgen(js_name = randomNumbers)]
pub fn random_numbers(max: usize) -> Vec<usize> {
    data::random_numbers(max)
}

#[wasm_bindgen(js_name = randomIndex)]
pub fn random_index(max: usize) -> usize {
    data::random_index(max)
}

#[wasm_bindgen]
pub fn average(samples: Vec<f64>) -> f64 {
    data::average(&samples)
}

#[wasm_bindgen(js_name = medianAverage)]
pub fn median_average(samples: Vec<f64>) -> f64 {
    data::median_average(&samples)
}

/// Deep copy through JSON; functions and `undefined` fields are dropped.
#[wasm_bindgen]
pub fn jclone(value: JsValue) -> Result<JsValue, JsError> {
    let value: Value = from_js(value)?;
    to_js(&data::clone_json(&value)?)
}

#[wasm_bindgen(js_name = jsonDiffers)]
pub fn json_differs(a: JsValue, b: JsValue) -> Result<bool, JsError> {
    let (a, b): (Value, Value) = (from_js(a)?, from_js(b)?);
    Ok(data::json_differs(&a, &b))
}

// =============================================================================
// Format and File
// =============================================================================

#[wasm_bindgen]
pub fn lz(value: JsValue, size: Option<usize>) -> String {
    let text = match value.as_f64() {
        Some(n) => format_number(n),
        None => value.as_string().unwrap_or_default(),
    };
    format::lz(text, size.unwrap_or(utkit_core::config::DEFAULT_PAD_WIDTH))
}

#[wasm_bindgen]
pub fn capitalize(s: &str) -> String {
    format::capitalize(s)
}

#[wasm_bindgen(js_name = randomInt)]
pub fn random_int(max: f64) -> f64 {
    format::random_int(max.max(0.0) as u64) as f64
}

#[wasm_bindgen]
pub fn id() -> String {
    format::id()
}

#[wasm_bindgen]
pub fn slugify(s: &str) -> Option<String> {
    format::slugify(s)
}

#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(ms: f64) -> Result<JsValue, JsError> {
    match format::format_date(ms as i64) {
        Some(date) => to_js(&date),
        None => Ok(JsValue::UNDEFINED),
    }
}

#[wasm_bindgen(js_name = playTime)]
pub fn play_time(ms: Option<f64>, fps: Option<u32>) -> Result<JsValue, JsError> {
    let fps = fps.unwrap_or(utkit_core::config::DEFAULT_FPS);
    to_js(&format::play_time(ms.unwrap_or(0.0), fps))
}

#[wasm_bindgen(js_name = formatFileSize)]
pub fn format_file_size(bytes: f64) -> String {
    format::format_file_size(bytes.max(0.0) as u64)
}

#[wasm_bindgen(js_name = parseJson)]
pub fn parse_json(s: &str) -> Result<JsValue, JsError> {
    to_js(&format::parse_json(s))
}

#[wasm_bindgen(js_name = getExtension)]
pub fn get_extension(filename: &str) -> String {
    file::get_extension(filename).to_string()
}

#[wasm_bindgen(js_name = removeExtension)]
pub fn remove_extension(filename: &str) -> String {
    file::remove_extension(filename).to_string()
}

#[wasm_bindgen(js_name = urlGetLast)]
pub fn url_get_last(url: &str, sep: Option<String>) -> String {
    file::url_get_last(url, sep.as_deref().unwrap_or("/")).to_string()
}

#[wasm_bindgen(js_name = isFileType)]
pub fn is_file_type(filename: &str, types: Vec<String>) -> bool {
    file::is_file_type(filename, &types)
}

#[wasm_bindgen(js_name = getMediaType)]
pub fn get_media_type(url: &str) -> String {
    file::get_media_type(url).to_string()
}

// =============================================================================
// Filter
// =============================================================================

#[wasm_bindgen(js_name = turboFilter)]
pub fn turbo_filter(
    data: JsValue,
    conditions: JsValue,
    ignore_case: Option<bool>,
) -> Result<JsValue, JsError> {
    let data: Vec<Value> = from_js(data)?;
    let conditions: Conditions = from_js(conditions)?;
    to_js(&filter::turbo_filter(&data, &conditions, ignore_case.unwrap_or(false)))
}

#[wasm_bindgen]
pub fn search(
    data: JsValue,
    props: Vec<String>,
    term: JsValue,
    ignore_case: Option<bool>,
    return_index_only: Option<bool>,
) -> Result<JsValue, JsError> {
    let data: Vec<Value> = from_js(data)?;
    let params = filter::SearchParams {
        data: &data,
        props,
        search: from_js(term)?,
        ignore_case: ignore_case.unwrap_or(false),
        return_index_only: return_index_only.unwrap_or(false),
    };
    match filter::search(&params) {
        filter::SearchResult::Items(items) => to_js(&items),
        filter::SearchResult::Indices(indices) => to_js(&indices),
    }
}

// =============================================================================
// Cookie
// =============================================================================

#[wasm_bindgen(js_name = getCookies)]
pub fn get_cookies() -> Result<JsValue, JsError> {
    to_js(&cookie::get_cookies()?)
}

#[wasm_bindgen(js_name = getCookie)]
pub fn get_cookie(name: &str) -> Result<String, JsError> {
    Ok(cookie::get_cookie(name)?)
}

#[wasm_bindgen(js_name = setCookie)]
pub fn set_cookie(
    name: &str,
    value: &str,
    hours: f64,
    path: Option<String>,
) -> Result<(), JsError> {
    Ok(cookie::set_cookie(name, value, hours, path.as_deref().unwrap_or(""))?)
}

#[wasm_bindgen(js_name = deleteCookie)]
pub fn delete_cookie(name: &str, path: Option<String>) -> Result<(), JsError> {
    Ok(cookie::delete_cookie(name, path.as_deref().unwrap_or(""))?)
}

#[wasm_bindgen(js_name = checkCookie)]
pub fn check_cookie(name: &str, value: Option<String>) -> Result<bool, JsError> {
    Ok(cookie::check_cookie(name, value.as_deref())?)
}

// =============================================================================
// CSS
// =============================================================================

/// `[r, g, b, a]`, or `false` when the string is not a supported color.
#[wasm_bindgen(js_name = parseCssColor)]
pub fn parse_css_color(color: &str) -> JsValue {
    match color::parse_css_color(color) {
        Some(color) => {
            let components: Array = color.to_array().into_iter().map(JsValue::from_f64).collect();
            components.into()
        }
        None => JsValue::FALSE,
    }
}

#[wasm_bindgen(js_name = cssColorString)]
pub fn css_color_string(components: Vec<f64>) -> String {
    color::css_color_string(&components)
}

#[wasm_bindgen(js_name = getCssVar)]
pub fn get_css_var(prop: &str, element: Option<Element>) -> Result<JsValue, JsError> {
    to_js(&css::get_css_var(prop, element.as_ref())?)
}

#[wasm_bindgen(js_name = getCssVars)]
pub fn get_css_vars() -> Result<JsValue, JsError> {
    to_js(&css::get_css_vars()?)
}

#[wasm_bindgen(js_name = getCssVarNames)]
pub fn get_css_var_names() -> Result<Vec<String>, JsError> {
    Ok(css::get_css_var_names()?)
}

#[wasm_bindgen(js_name = setCssVar)]
pub fn set_css_var(name: &str, value: &str, element: Option<HtmlElement>) -> Result<(), JsError> {
    Ok(css::set_css_var(name, value, element.as_ref())?)
}

/// Apply the OS color scheme; with `listen`, follow it for the page lifetime.
#[wasm_bindgen(js_name = setTheme)]
pub fn set_theme(target: JsValue, listen: Option<bool>) -> Result<(), JsError> {
    let target = if target.is_undefined() || target.is_null() {
        None
    } else {
        Some(JsTarget::from_js(&target)?)
    };
    let target = target.as_ref().map(JsTarget::as_target);
    if let Some(listener) = css::set_theme(target, listen.unwrap_or(false))? {
        listener.forget();
    }
    Ok(())
}

// =============================================================================
// DOM
// =============================================================================

#[wasm_bindgen]
pub fn el(selector: &str, context: Option<Element>) -> Result<Option<Element>, JsError> {
    Ok(match context {
        Some(context) => dom::el_in(&context, selector)?,
        None => dom::el(selector)?,
    })
}

#[wasm_bindgen]
pub fn els(selector: &str, context: Option<Element>) -> Result<Vec<Element>, JsError> {
    Ok(match context {
        Some(context) => dom::els_in(&context, selector)?,
        None => dom::els(selector)?,
    })
}

#[wasm_bindgen(js_name = addClass)]
pub fn add_class(target: JsValue, classes: &str) -> Result<(), JsError> {
    Ok(dom::add_class(JsTarget::from_js(&target)?.as_target(), classes)?)
}

#[wasm_bindgen(js_name = removeClass)]
pub fn remove_class(target: JsValue, classes: &str) -> Result<(), JsError> {
    Ok(dom::remove_class(JsTarget::from_js(&target)?.as_target(), classes)?)
}

#[wasm_bindgen(js_name = toggleClass)]
pub fn toggle_class(target: JsValue, class: &str) -> Result<bool, JsError> {
    Ok(dom::toggle_class(JsTarget::from_js(&target)?.as_target(), class)?)
}

#[wasm_bindgen(js_name = hasClass)]
pub fn has_class(target: JsValue, class: &str) -> Result<bool, JsError> {
    Ok(dom::has_class(JsTarget::from_js(&target)?.as_target(), class)?)
}

#[wasm_bindgen]
pub fn show(target: JsValue) -> Result<(), JsError> {
    Ok(dom::show(JsTarget::from_js(&target)?.as_target())?)
}

#[wasm_bindgen]
pub fn hide(target: JsValue) -> Result<(), JsError> {
    Ok(dom::hide(JsTarget::from_js(&target)?.as_target())?)
}

#[wasm_bindgen(js_name = killKids)]
pub fn kill_kids(target: JsValue) -> Result<(), JsError> {
    Ok(dom::kill_kids(JsTarget::from_js(&target)?.as_target())?)
}

#[wasm_bindgen(js_name = killMe)]
pub fn kill_me(target: JsValue) -> Result<(), JsError> {
    Ok(dom::kill_me(JsTarget::from_js(&target)?.as_target())?)
}

/// Set the `prop: value` pairs of `props`, or clear those properties.
#[wasm_bindgen]
pub fn css(target: JsValue, props: JsValue, remove: Option<bool>) -> Result<(), JsError> {
    let props: BTreeMap<String, String> = from_js(props)?;
    let target = JsTarget::from_js(&target)?;
    Ok(dom::css(target.as_target(), &props, remove.unwrap_or(false))?)
}

#[wasm_bindgen]
pub fn attributes(target: JsValue, attrs: JsValue) -> Result<(), JsError> {
    let attrs: BTreeMap<String, String> = from_js(attrs)?;
    let target = JsTarget::from_js(&target)?;
    Ok(dom::attributes(target.as_target(), &attrs)?)
}

/// Create an element from an options object.
///
/// Besides the serializable options, `inner` may be markup or a node,
/// `target` a selector or element to append to, and `events` an object of
/// handlers that stay attached for the element's lifetime.
#[wasm_bindgen(js_name = createElement)]
pub fn create_element(tag: &str, options: JsValue) -> Result<Element, JsError> {
    let mut parsed: ElementOptions = from_js_or_default(options.clone())?;
    if options.is_object() {
        let inner = get(&options, "inner");
        if let Some(html) = inner.as_string() {
            parsed = parsed.html(html);
        } else if let Some(node) = inner.dyn_ref::<Node>() {
            parsed = parsed.child(node.clone());
        }
        let target = get(&options, "target");
        if !target.is_undefined() && !target.is_null() {
            parsed = parsed.target(dom::resolve(JsTarget::from_js(&target)?.as_target())?);
        }
    }

    let element = dom::create_element(tag, parsed)?;
    if options.is_object() {
        let events = get(&options, "events");
        if events.is_object() {
            listeners_from_object(&element, &events)?.forget();
        }
    }
    Ok(element)
}

#[wasm_bindgen(js_name = htmlObject)]
pub fn html_object(markup: &str) -> Result<Option<Element>, JsError> {
    Ok(dom::html_object(markup)?)
}

/// Attach `{ event: handler }` pairs; the handle detaches them.
#[wasm_bindgen(js_name = addEvents)]
pub fn add_events(target: JsValue, events: JsValue) -> Result<EventHandle, JsError> {
    let element = dom::resolve(JsTarget::from_js(&target)?.as_target())?;
    Ok(EventHandle {
        listeners: listeners_from_object(&element, &events)?,
    })
}

/// `callback(hidden)` on every page visibility change.
#[wasm_bindgen]
pub fn visibility(callback: Function) -> Result<EventHandle, JsError> {
    let listeners = dom::visibility(move |hidden| {
        call_reporting(&callback, "visibility", &[&JsValue::from_bool(hidden)]);
    })?;
    Ok(EventHandle { listeners })
}

#[wasm_bindgen]
pub fn offset(target: JsValue) -> Result<JsValue, JsError> {
    to_js(&dom::offset(JsTarget::from_js(&target)?.as_target())?)
}

#[wasm_bindgen(js_name = hitObject)]
pub fn hit_object(target: JsValue, x: f64, y: f64) -> Result<bool, JsError> {
    Ok(dom::hit_object(JsTarget::from_js(&target)?.as_target(), x, y)?)
}

/// Whether `(x, y)` lies strictly inside `[x, y, width, height]`.
#[wasm_bindgen(js_name = hitRect)]
pub fn hit_rect(rect: Vec<f64>, x: f64, y: f64) -> Result<bool, JsError> {
    let [left, top, width, height] = rect[..] else {
        return Err(JsError::new("hitRect expects [x, y, width, height]"));
    };
    Ok(geometry::hit_rect(geometry::Rect::new(left, top, width, height), x, y))
}

/// Fit `[ow, oh]` into `[tw, th]`; `mode` is `fit`, `full` or `fill`.
#[wasm_bindgen(js_name = calcScale)]
pub fn calc_scale(
    ow: f64,
    oh: f64,
    tw: f64,
    th: f64,
    mode: Option<String>,
    center: Option<bool>,
) -> Result<JsValue, JsError> {
    let mode: ScaleMode = match mode {
        Some(mode) => mode.parse()?,
        None => ScaleMode::Contain,
    };
    to_js(&geometry::calc_scale(ow, oh, tw, th, mode, center.unwrap_or(false)))
}

#[wasm_bindgen(js_name = getComputedTranslateXY)]
pub fn get_computed_translate_xy(target: JsValue) -> Result<Vec<f64>, JsError> {
    Ok(dom::get_computed_translate_xy(JsTarget::from_js(&target)?.as_target())?.to_vec())
}

#[wasm_bindgen(js_name = locationHash)]
pub fn location_hash(hash: Option<String>) -> Result<JsValue, JsError> {
    to_js(&dom::location_hash(hash.as_deref())?)
}

#[wasm_bindgen(js_name = locationSearch)]
pub fn location_search(search: Option<String>) -> Result<JsValue, JsError> {
    to_js(&dom::location_search(search.as_deref())?)
}

#[wasm_bindgen(js_name = enterFullscreen)]
pub fn enter_fullscreen(target: JsValue) -> Result<(), JsError> {
    Ok(dom::enter_fullscreen(JsTarget::from_js(&target)?.as_target())?)
}

#[wasm_bindgen(js_name = exitFullscreen)]
pub fn exit_fullscreen() -> Result<(), JsError> {
    Ok(dom::exit_fullscreen()?)
}

#[wasm_bindgen(js_name = toggleFullscreen)]
pub fn toggle_fullscreen(target: JsValue) -> Result<bool, JsError> {
    Ok(dom::toggle_fullscreen(JsTarget::from_js(&target)?.as_target())?)
}

fn observer_options(value: &JsValue) -> ObserverOptions {
    let mut options = ObserverOptions::default();
    if !value.is_object() {
        return options;
    }
    options.root = get(value, "root").dyn_into::<Element>().ok();
    options.root_margin = get(value, "rootMargin").as_string();
    let threshold = get(value, "threshold");
    options.threshold = match threshold.as_f64() {
        Some(t) => vec![t],
        None => threshold
            .dyn_ref::<Array>()
            .map(|list| list.iter().filter_map(|t| t.as_f64()).collect())
            .unwrap_or_default(),
    };
    options
}

/// `callback(visible, entry)` whenever the element enters or leaves view.
#[wasm_bindgen(js_name = isVisibleObserver)]
pub fn is_visible_observer(
    target: JsValue,
    callback: Function,
    options: JsValue,
) -> Result<ObserverHandle, JsError> {
    let target = JsTarget::from_js(&target)?;
    let observer = dom::is_visible_observer(
        target.as_target(),
        move |visible, entry| {
            let entry: &JsValue = entry;
            call_reporting(&callback, "isVisibleObserver", &[&JsValue::from_bool(visible), entry]);
        },
        observer_options(&options),
    )?;
    Ok(ObserverHandle { observer })
}

#[wasm_bindgen(js_name = getImage)]
pub async fn get_image(src: String) -> Result<HtmlImageElement, JsError> {
    Ok(dom::get_image(&src).await?)
}

/// Number of `<img>` elements replaced by inline SVG.
#[wasm_bindgen(js_name = inlineSvg)]
pub async fn inline_svg(classes: Option<String>) -> Result<usize, JsError> {
    Ok(dom::inline_svg(classes.as_deref()).await?)
}

// =============================================================================
// Fetch
// =============================================================================

fn fetch_options(value: &JsValue) -> FetchOptions {
    let mut options = FetchOptions::default();
    if !value.is_object() {
        return options;
    }
    if let Some(method) = get(value, "method").as_string() {
        options = options.method(method);
    }
    if let Ok(kind) = serde_wasm_bindgen::from_value::<ResponseType>(get(value, "responseType")) {
        options = options.response_type(kind);
    }
    if let Some(credentials) = RequestCredentials::from_js_value(&get(value, "credentials")) {
        options = options.credentials(credentials);
    }
    if let Some(timeout) = get(value, "timeout").as_f64() {
        options = options.timeout_ms(timeout as i32);
    }
    if let Ok(callback) = get(value, "onProgress").dyn_into::<Function>() {
        options = options.on_progress(move |progress| {
            if let Ok(progress) = to_js(progress) {
                call_reporting(&callback, "onProgress", &[&progress]);
            }
        });
    }
    options
}

/// Plain objects become form fields; forms, blobs and strings pass through.
fn payload(value: JsValue) -> Payload {
    if value.is_undefined() || value.is_null() {
        return Payload::None;
    }
    if let Some(form) = value.dyn_ref::<FormData>() {
        return Payload::Form(form.clone());
    }
    if value.is_string() || value.is_instance_of::<Blob>() {
        return Payload::Raw(value);
    }
    match serde_wasm_bindgen::from_value::<Map<String, Value>>(value.clone()) {
        Ok(fields) => {
            Payload::fields(fields.iter().map(|(k, v)| (k.clone(), to_display_string(v))))
        }
        Err(_) => Payload::Raw(value),
    }
}

fn fetch_reply(result: FetchResult) -> JsValue {
    let body = match result {
        Ok(FetchBody::Json(value)) => to_js(&value),
        Ok(FetchBody::Text(text)) => Ok(JsValue::from_str(&text)),
        Ok(FetchBody::Blob(blob)) => Ok(blob.into()),
        Err(e) => {
            tracing::warn!("fetch failed: {e}");
            return error_reply(&e.to_string());
        }
    };
    body.unwrap_or_else(|_| error_reply("response could not be converted"))
}

/// Never rejects: failures resolve to `{ error }`.
///
/// Exported as `fetchUrl` so the generated loader keeps the global `fetch`.
#[wasm_bindgen(js_name = fetchUrl)]
pub async fn fetch_js(url: String, data: JsValue, options: JsValue) -> JsValue {
    fetch_reply(fetch::fetch(&url, payload(data), &fetch_options(&options)).await)
}

#[wasm_bindgen(js_name = readJson)]
pub async fn read_json(url: String, options: JsValue) -> JsValue {
    fetch_reply(fetch::read_json(&url, fetch_options(&options)).await)
}

// =============================================================================
// Env
// =============================================================================

#[wasm_bindgen(js_name = detectEnv)]
pub fn detect_env() -> Result<JsValue, JsError> {
    to_js(&env::detect_env()?)
}

#[wasm_bindgen(js_name = webpSupport)]
pub async fn webp_support() -> bool {
    env::webp_support().await
}

#[wasm_bindgen(js_name = avifSupport)]
pub async fn avif_support() -> bool {
    env::avif_support().await
}

// =============================================================================
// Helpers
// =============================================================================

/// Resolves once `{ url, type }` has loaded; rejects if it fails.
#[wasm_bindgen(js_name = addHeadImport)]
pub async fn add_head_import(import: JsValue) -> Result<(), JsError> {
    let import: HeadImport = from_js(import)?;
    Ok(helpers::add_head_import(&import).await?)
}

/// Settle every import: `[{ status, url, reason? }]`.
#[wasm_bindgen(js_name = addHeadImports)]
pub async fn add_head_imports(imports: JsValue) -> Result<JsValue, JsError> {
    #[derive(Serialize)]
    struct Settled<'a> {
        status: &'static str,
        url: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    }

    let imports: Vec<HeadImport> = from_js(imports)?;
    let results = helpers::add_head_imports(&imports).await;
    let settled: Vec<Settled<'_>> = imports
        .iter()
        .zip(results)
        .map(|(import, result)| match result {
            Ok(()) => Settled {
                status: "fulfilled",
                url: &import.url,
                reason: None,
            },
            Err(e) => Settled {
                status: "rejected",
                url: &import.url,
                reason: Some(e.to_string()),
            },
        })
        .collect();
    to_js(&settled)
}

#[wasm_bindgen(js_name = awaitMs)]
pub async fn await_ms(ms: u32) {
    helpers::await_ms(ms).await;
}

/// Resolves with the event, or with `"timeout"`.
#[wasm_bindgen(js_name = awaitEvent)]
pub async fn await_event(target: EventTarget, event: String, timeout: Option<i32>) -> JsValue {
    let timeout = timeout.unwrap_or(AWAIT_EVENT_TIMEOUT_MS);
    match helpers::await_event(&target, &event, timeout).await {
        AwaitOutcome::Event(event) => event.into(),
        AwaitOutcome::Timeout => JsValue::from_str("timeout"),
    }
}

#[wasm_bindgen(js_name = drawImageDummy)]
pub fn draw_image_dummy(options: JsValue) -> Result<HtmlImageElement, JsError> {
    let options: PlaceholderImage = from_js_or_default(options)?;
    Ok(helpers::draw_image_dummy(&options)?)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_throwing_callback_is_contained() {
        let throws = Function::new_no_args("throw new Error('boom')");
        assert!(call_reporting(&throws, "test", &[]).is_none());

        let add = Function::new_with_args("a, b", "return a + b");
        let two = JsValue::from_f64(2.0);
        let three = JsValue::from_f64(3.0);
        let sum = call_reporting(&add, "test", &[&two, &three]);
        assert_eq!(sum.and_then(|v| v.as_f64()), Some(5.0));
    }
}
