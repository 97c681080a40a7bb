//! Environment detection and image format probes.

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::{HtmlAudioElement, HtmlImageElement};

use utkit_core::env::{EnvProbe, Environment, IosCapabilities, detect};

use crate::config::{AVIF_PROBE, WEBP_PROBE, WEBP_PROBE_HEIGHT};
use crate::core::error::DomError;
use crate::utils::dom::{document, window};
use crate::utils::helpers::{load_promise, loaded};

fn has_truthy(target: &JsValue, name: &str) -> bool {
    Reflect::get(target, &JsValue::from_str(name)).is_ok_and(|v| v.is_truthy())
}

fn has_key(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

fn audio_volume_settable() -> bool {
    HtmlAudioElement::new().is_ok_and(|audio| {
        audio.set_volume(0.5);
        audio.volume() == 0.5
    })
}

/// Read an [`EnvProbe`] from the running page.
pub fn probe() -> Result<EnvProbe, DomError> {
    let window = window().ok_or(DomError::NoWindow)?;
    let document = document()?;
    let navigator = window.navigator();

    let history_push_state = window
        .history()
        .is_ok_and(|history| has_key(&history, "pushState"));

    Ok(EnvProbe {
        user_agent: navigator.user_agent()?,
        app_name: navigator.app_name(),
        platform: navigator.platform()?,
        max_touch_points: navigator.max_touch_points().max(0) as u32,
        has_touch_end: has_key(&document, "ontouchend"),
        audio_volume_settable: audio_volume_settable(),
        ios: IosCapabilities {
            indexed_db: has_truthy(&window, "indexedDB"),
            speech_synthesis: has_truthy(&window, "SpeechSynthesisUtterance"),
            webkit_audio_context: has_truthy(&window, "webkitAudioContext"),
            match_media: has_truthy(&window, "matchMedia"),
            push_state: history_push_state,
        },
    })
}

/// Detect the browser and platform of the running page.
pub fn detect_env() -> Result<Environment, DomError> {
    Ok(detect(&probe()?))
}

/// Whether the browser decodes lossy WebP.
pub async fn webp_support() -> bool {
    let Ok(image) = HtmlImageElement::new() else {
        return false;
    };
    let pending = load_promise(&image);
    image.set_src(WEBP_PROBE);
    loaded(pending).await && image.height() == WEBP_PROBE_HEIGHT
}

/// Whether the browser decodes AVIF.
pub async fn avif_support() -> bool {
    let Ok(image) = HtmlImageElement::new() else {
        return false;
    };
    let pending = load_promise(&image);
    image.set_src(AVIF_PROBE);
    loaded(pending).await
}
