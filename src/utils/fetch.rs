//! Network fetching with timeout, form encoding and progress reporting.
//!
//! [`fetch`] never panics and never leaves a failure unreported: every
//! problem, including timeouts and non-2xx statuses, comes back as a
//! [`FetchError`] value.

use gloo_net::http::{Method, Request, RequestBuilder, Response};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Blob, FormData, ReadableStreamDefaultReader};

use crate::config::CONTENT_LENGTH_HEADER;
use crate::core::error::{FetchError, js_error_message};
use crate::models::{FetchBody, FetchOptions, FetchResult, Payload, Progress, ResponseType};

fn network_error(err: gloo_net::Error) -> FetchError {
    match err {
        gloo_net::Error::JsError(e) if e.name == "AbortError" => FetchError::Timeout,
        gloo_net::Error::JsError(e) => FetchError::NetworkError(e.message),
        other => FetchError::NetworkError(other.to_string()),
    }
}

fn form_data(fields: &[(String, String)]) -> Result<FormData, FetchError> {
    let creation_failed = |e: JsValue| FetchError::RequestCreationFailed(js_error_message(&e));
    let form = FormData::new().map_err(creation_failed)?;
    for (key, value) in fields {
        form.append_with_str(key, value).map_err(creation_failed)?;
    }
    Ok(form)
}

/// Text entries of `form` as query pairs. File entries have no query form.
fn form_pairs(form: &FormData) -> Result<Vec<(String, String)>, FetchError> {
    let mut pairs = Vec::new();
    for entry in form.entries() {
        let entry: Array = entry
            .map_err(|e| FetchError::RequestCreationFailed(js_error_message(&e)))?
            .unchecked_into();
        let key = entry.get(0).as_string().unwrap_or_default();
        let Some(value) = entry.get(1).as_string() else {
            return Err(FetchError::RequestCreationFailed(format!(
                "form field '{key}' is not text and cannot be sent with GET"
            )));
        };
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Attach the payload: query string on `GET`, body otherwise.
fn build_request(
    builder: RequestBuilder,
    payload: Payload,
    is_get: bool,
) -> Result<Request, FetchError> {
    let with_query = |builder: RequestBuilder, pairs: &[(String, String)]| {
        builder
            .query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .build()
    };
    let built = match (payload, is_get) {
        (Payload::None, _) => builder.build(),
        (Payload::Fields(fields), true) => with_query(builder, &fields),
        (Payload::Form(form), true) => with_query(builder, &form_pairs(&form)?),
        (Payload::Raw(_), true) => {
            return Err(FetchError::RequestCreationFailed(
                "a GET request cannot carry a raw body".to_string(),
            ));
        }
        (Payload::Fields(fields), false) => builder.body(form_data(&fields)?),
        (Payload::Form(form), false) => builder.body(form),
        (Payload::Raw(raw), false) => builder.body(raw),
    };
    built.map_err(|e| FetchError::RequestCreationFailed(e.to_string()))
}

/// Fetch `url`, decoding the body according to `options.response_type`.
///
/// The request is aborted after `options.timeout_ms`. With
/// `options.on_progress` set, the body is streamed and the callback runs
/// after every chunk and once more with `complete: true`.
pub async fn fetch(url: &str, payload: Payload, options: &FetchOptions) -> FetchResult {
    let method = Method::from_bytes(options.method.to_uppercase().as_bytes())
        .map_err(|e| FetchError::RequestCreationFailed(e.to_string()))?;
    let controller = AbortController::new()
        .map_err(|e| FetchError::RequestCreationFailed(js_error_message(&e)))?;

    let builder = RequestBuilder::new(url)
        .method(method)
        .credentials(options.credentials)
        .abort_signal(Some(&controller.signal()));
    let request = build_request(builder, payload, options.is_get())?;

    let timeout = {
        let controller = controller.clone();
        Timeout::new(options.timeout_ms.max(0) as u32, move || controller.abort())
    };
    let sent = request.send().await;
    // Dropping the handle clears the timer.
    drop(timeout);

    let response = sent.map_err(network_error)?;
    if !response.ok() {
        return Err(FetchError::HttpError {
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    match &options.on_progress {
        Some(callback) if response.body().is_some() => {
            read_with_progress(response, callback.as_ref(), options.response_type).await
        }
        _ => read_body(response, options.response_type).await,
    }
}

/// `GET` a JSON document.
pub async fn read_json(url: &str, options: FetchOptions) -> FetchResult {
    let options = options.method("GET").response_type(ResponseType::Json);
    fetch(url, Payload::None, &options).await
}

fn parse_json(bytes: &[u8]) -> FetchResult {
    serde_json::from_slice(bytes)
        .map(FetchBody::Json)
        .map_err(|e| FetchError::JsonParseError(e.to_string()))
}

async fn read_body(response: Response, response_type: ResponseType) -> FetchResult {
    let read_failed = |e: gloo_net::Error| FetchError::ResponseReadFailed(e.to_string());
    match response_type {
        ResponseType::Json => {
            let text = response.text().await.map_err(read_failed)?;
            parse_json(text.as_bytes())
        }
        ResponseType::Text => Ok(FetchBody::Text(response.text().await.map_err(read_failed)?)),
        ResponseType::Blob => {
            let promise = web_sys::Response::from(response)
                .blob()
                .map_err(|e| FetchError::ResponseReadFailed(js_error_message(&e)))?;
            let blob = JsFuture::from(promise)
                .await
                .map_err(|e| FetchError::ResponseReadFailed(js_error_message(&e)))?;
            blob.dyn_into::<Blob>()
                .map(FetchBody::Blob)
                .map_err(|_| FetchError::ResponseReadFailed("body is not a blob".to_string()))
        }
    }
}

/// Stream the body chunk by chunk, reporting progress, then decode it.
async fn read_with_progress(
    response: Response,
    on_progress: &dyn Fn(&Progress),
    response_type: ResponseType,
) -> FetchResult {
    let read_failed = |e: JsValue| FetchError::ResponseReadFailed(js_error_message(&e));

    let total = response
        .headers()
        .get(CONTENT_LENGTH_HEADER)
        .and_then(|len| len.trim().parse::<f64>().ok())
        .unwrap_or(0.0);

    let Some(stream) = response.body() else {
        return read_body(response, response_type).await;
    };
    let reader = stream
        .get_reader()
        .dyn_into::<ReadableStreamDefaultReader>()
        .map_err(|reader| read_failed(reader.into()))?;

    let mut chunks: Vec<Uint8Array> = Vec::new();
    let mut loaded = 0.0;
    loop {
        let step = JsFuture::from(reader.read()).await.map_err(read_failed)?;
        let done = Reflect::get(&step, &JsValue::from_str("done"))
            .map_err(read_failed)?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value = Reflect::get(&step, &JsValue::from_str("value")).map_err(read_failed)?;
        let chunk = Uint8Array::new(&value);
        loaded += f64::from(chunk.length());
        chunks.push(chunk);
        on_progress(&Progress::new(loaded, total, false));
    }
    on_progress(&Progress::new(loaded, total, true));

    match response_type {
        ResponseType::Blob => {
            let parts: Array = chunks.iter().collect();
            Blob::new_with_u8_array_sequence(&parts)
                .map(FetchBody::Blob)
                .map_err(read_failed)
        }
        ResponseType::Text | ResponseType::Json => {
            let mut bytes = Vec::with_capacity(loaded as usize);
            for chunk in &chunks {
                bytes.extend(chunk.to_vec());
            }
            if response_type == ResponseType::Json {
                parse_json(&bytes)
            } else {
                Ok(FetchBody::Text(String::from_utf8_lossy(&bytes).into_owned()))
            }
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_get_form_goes_to_query() {
        let form = FormData::new().unwrap();
        form.append_with_str("q", "rust wasm").unwrap();
        form.append_with_str("page", "2").unwrap();

        let request = build_request(
            RequestBuilder::new("https://example.test/search"),
            Payload::Form(form),
            true,
        )
        .unwrap();
        assert!(request.url().ends_with("/search?q=rust+wasm&page=2"));
    }

    #[wasm_bindgen_test]
    fn test_get_file_field_is_rejected() {
        let form = FormData::new().unwrap();
        let blob = Blob::new().unwrap();
        form.append_with_blob("upload", &blob).unwrap();

        let result = build_request(
            RequestBuilder::new("https://example.test/"),
            Payload::Form(form),
            true,
        );
        assert!(matches!(result, Err(FetchError::RequestCreationFailed(_))));
    }

    #[wasm_bindgen_test]
    async fn test_get_raw_body_is_rejected() {
        let result = fetch(
            "https://example.test/",
            Payload::Raw(JsValue::from_str("a=1")),
            &FetchOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(FetchError::RequestCreationFailed(_))));
    }
}
