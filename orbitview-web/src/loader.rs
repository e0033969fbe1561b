//! Streaming asset fetch with progress reporting
//!
//! The fetch is expressed as an awaitable operation: the progress callback
//! fires zero or more times while chunks arrive, then the future resolves to
//! exactly one terminal outcome (the bytes, or the fetch error).

use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStreamDefaultReader, Response};

pub async fn fetch_bytes<F>(url: &str, mut on_progress: F) -> Result<Vec<u8>, JsValue>
where
    F: FnMut(u64, Option<u64>),
{
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "HTTP {} while fetching {}",
            response.status(),
            url
        )));
    }
    let total = response
        .headers()
        .get("Content-Length")
        .ok()
        .flatten()
        .and_then(|v| v.parse::<u64>().ok());

    let Some(body) = response.body() else {
        // No streaming body available: read it in one go
        let buffer = JsFuture::from(response.array_buffer()?).await?;
        let bytes = Uint8Array::new(&buffer).to_vec();
        on_progress(bytes.len() as u64, total);
        return Ok(bytes);
    };

    let reader: ReadableStreamDefaultReader = body.get_reader().dyn_into()?;
    let mut bytes = Vec::new();
    loop {
        let chunk = JsFuture::from(reader.read()).await?;
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value: Uint8Array = Reflect::get(&chunk, &JsValue::from_str("value"))?.dyn_into()?;
        bytes.extend_from_slice(&value.to_vec());
        on_progress(bytes.len() as u64, total);
    }
    Ok(bytes)
}
