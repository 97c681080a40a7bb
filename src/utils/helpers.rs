//! Page helpers: head imports, placeholder images and async waits.

use std::future::{Future, poll_fn};
use std::pin::pin;
use std::task::Poll;

use gloo_timers::future::TimeoutFuture;
use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement,
    HtmlImageElement, HtmlLinkElement, HtmlScriptElement,
};

use crate::config::{
    PLACEHOLDER_BACKGROUND, PLACEHOLDER_FONT, PLACEHOLDER_TEXT_COLOR, PLACEHOLDER_TEXT_SIZE,
    PLACEHOLDER_TITLE, PLACEHOLDER_TITLE_COLOR, PLACEHOLDER_TITLE_SIZE,
};
use crate::core::error::{DomError, js_error_message};
use crate::models::{AwaitOutcome, HeadImport, ImportKind, PlaceholderImage};
use crate::utils::dom::{document, window};

// =============================================================================
// Deadlines
// =============================================================================

/// How a [`with_deadline`] wait ended.
#[derive(Debug)]
pub enum Deadline {
    /// The promise fulfilled first, possibly with `undefined`.
    Resolved(JsValue),
    /// The promise rejected first.
    Rejected(String),
    /// The timer fired before the promise settled.
    Expired,
}

/// Wait for `promise`, but no longer than `timeout_ms`.
///
/// The timer is a [`TimeoutFuture`] owned by this call, so it is cleared as
/// soon as the wait ends.
pub async fn with_deadline(promise: Promise, timeout_ms: u32) -> Deadline {
    let mut settled = pin!(JsFuture::from(promise));
    let mut timer = pin!(TimeoutFuture::new(timeout_ms));

    poll_fn(|cx| {
        if let Poll::Ready(result) = settled.as_mut().poll(cx) {
            return Poll::Ready(match result {
                Ok(value) => Deadline::Resolved(value),
                Err(e) => Deadline::Rejected(js_error_message(&e)),
            });
        }
        timer.as_mut().poll(cx).map(|()| Deadline::Expired)
    })
    .await
}

fn once() -> AddEventListenerOptions {
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    options
}

/// Promise resolving to `true` on the target's `load` event and `false`
/// on its `error` event.
pub(crate) fn load_promise(target: &EventTarget) -> Promise {
    Promise::new(&mut |resolve, _| {
        let on_load = resolve.bind1(&JsValue::NULL, &JsValue::TRUE);
        let on_error = resolve.bind1(&JsValue::NULL, &JsValue::FALSE);
        let options = once();
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            "load", on_load.unchecked_ref(), &options,
        );
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            "error", on_error.unchecked_ref(), &options,
        );
    })
}

/// Await a [`load_promise`]; `true` when the resource loaded.
pub(crate) async fn loaded(promise: Promise) -> bool {
    JsFuture::from(promise)
        .await
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

// =============================================================================
// Head Imports
// =============================================================================

/// Create the element for `import`, append it to `<head>` and return the
/// promise of its load.
fn inject(import: &HeadImport) -> Result<Promise, DomError> {
    let doc = document()?;
    let head = doc.head().ok_or(DomError::NoDocument)?;

    let element = match import.kind {
        ImportKind::Js | ImportKind::Esm => {
            let script = doc
                .create_element("script")?
                .dyn_into::<HtmlScriptElement>()
                .map_err(|_| DomError::WrongType("a script element"))?;
            script.set_type(if import.kind == ImportKind::Esm {
                "module"
            } else {
                "text/javascript"
            });
            script.set_src(&import.url);
            script.unchecked_into::<web_sys::Element>()
        }
        ImportKind::Css => {
            let link = doc
                .create_element("link")?
                .dyn_into::<HtmlLinkElement>()
                .map_err(|_| DomError::WrongType("a link element"))?;
            link.set_type("text/css");
            link.set_rel("stylesheet");
            link.set_href(&import.url);
            link.unchecked_into::<web_sys::Element>()
        }
    };

    let promise = load_promise(&element);
    head.append_child(&element)?;
    tracing::debug!(url = %import.url, "head import added");
    Ok(promise)
}

async fn settle(import: &HeadImport, promise: Promise) -> Result<(), DomError> {
    if loaded(promise).await {
        Ok(())
    } else {
        tracing::warn!(url = %import.url, "head import failed to load");
        Err(DomError::LoadFailed(import.url.clone()))
    }
}

/// Add a script or stylesheet to `<head>` and wait for it to load.
pub async fn add_head_import(import: &HeadImport) -> Result<(), DomError> {
    let promise = inject(import)?;
    settle(import, promise).await
}

/// Add several imports at once; every import settles independently.
pub async fn add_head_imports(imports: &[HeadImport]) -> Vec<Result<(), DomError>> {
    let pending: Vec<_> = imports.iter().map(|import| (import, inject(import))).collect();
    let mut results = Vec::with_capacity(pending.len());
    for (import, injected) in pending {
        results.push(match injected {
            Ok(promise) => settle(import, promise).await,
            Err(e) => Err(e),
        });
    }
    results
}

// =============================================================================
// Placeholder Image
// =============================================================================

/// Render a "missing asset" placeholder into an `<img>`.
pub fn draw_image_dummy(options: &PlaceholderImage) -> Result<HtmlImageElement, DomError> {
    let window = window().ok_or(DomError::NoWindow)?;
    let canvas = document()?
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| DomError::WrongType("a canvas element"))?;
    canvas.set_width(options.width);
    canvas.set_height(options.height);

    let ctx = canvas
        .get_context("2d")?
        .ok_or(DomError::WrongType("a 2d canvas"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| DomError::WrongType("a 2d canvas"))?;

    let dpr = window.device_pixel_ratio();
    let (width, height) = (f64::from(options.width), f64::from(options.height));

    ctx.begin_path();
    ctx.rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str(PLACEHOLDER_BACKGROUND);
    ctx.fill();

    ctx.set_text_align("center");
    ctx.set_fill_style_str(PLACEHOLDER_TITLE_COLOR);
    ctx.set_font(&format!("{}px {}", PLACEHOLDER_TITLE_SIZE * dpr, PLACEHOLDER_FONT));
    ctx.fill_text(PLACEHOLDER_TITLE, width / 2.0, height / 2.0 - 20.0)?;

    ctx.set_fill_style_str(PLACEHOLDER_TEXT_COLOR);
    ctx.set_font(&format!("{}px {}", PLACEHOLDER_TEXT_SIZE * dpr, PLACEHOLDER_FONT));
    ctx.fill_text(&options.text, width / 2.0, height / 2.0 + 20.0)?;

    let image = HtmlImageElement::new()?;
    image.set_src(&canvas.to_data_url()?);
    Ok(image)
}

// =============================================================================
// Waiting
// =============================================================================

/// Sleep for `ms` milliseconds.
pub async fn await_ms(ms: u32) {
    TimeoutFuture::new(ms).await;
}

/// Wait for `event` on `target`, giving up after `timeout_ms`.
///
/// The listener is removed whichever way the wait ends.
pub async fn await_event(target: &EventTarget, event: &str, timeout_ms: i32) -> AwaitOutcome {
    let mut listener = None;
    let promise = Promise::new(&mut |resolve, _| {
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            &resolve,
            &once(),
        );
        listener = Some(resolve);
    });

    let outcome = match with_deadline(promise, timeout_ms.max(0) as u32).await {
        Deadline::Resolved(value) => match value.dyn_into::<Event>() {
            Ok(event) => AwaitOutcome::Event(event),
            Err(value) => {
                tracing::warn!("await_event resolved with a non-event: {:?}", value);
                AwaitOutcome::Timeout
            }
        },
        Deadline::Expired => AwaitOutcome::Timeout,
        Deadline::Rejected(e) => {
            tracing::warn!("await_event failed: {e}");
            AwaitOutcome::Timeout
        }
    };

    if let Some(listener) = listener {
        let _ = target.remove_event_listener_with_callback(event, &listener);
    }
    outcome
}
