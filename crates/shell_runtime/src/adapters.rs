//! Browser-backed implementations of the `shell_host` service contracts.
//!
//! Each adapter is intentionally small and synchronous at the browser API
//! boundary, while implementing the async host traits for compatibility with
//! higher-level abstractions. On non-wasm targets every adapter degrades to
//! its no-op behavior so the runtime crate stays testable off-browser.

use desktop_core::genie::CapturedBitmap;
use desktop_core::geometry::Rect;
use shell_host::{CaptureFuture, CaptureService, RecordStore, RecordStoreFuture, SoundService};

#[derive(Debug, Clone, Copy, Default)]
/// Record store backed by `window.localStorage`.
pub struct LocalRecordStore;

impl LocalRecordStore {
    /// Loads a raw JSON string for a record key.
    pub fn load_json(self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = web_sys::window()?.local_storage().ok().flatten()?;
            storage.get_item(key).ok().flatten()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    /// Saves a raw JSON string for a record key.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the write fails.
    pub fn save_json(self, key: &str, raw_json: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| "localStorage unavailable".to_string())?;
            storage
                .set_item(key, raw_json)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Ok(())
        }
    }

}

impl RecordStore for LocalRecordStore {
    fn load_record<'a>(
        &'a self,
        key: &'a str,
    ) -> RecordStoreFuture<'a, Result<Option<String>, String>> {
        let store = *self;
        Box::pin(async move { Ok(store.load_json(key)) })
    }

    fn save_record<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> RecordStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.save_json(key, raw_json) })
    }

}

#[derive(Debug, Clone, Copy, Default)]
/// Interface sound playback through `HtmlAudioElement`.
///
/// Sound files are served from `/sounds/<name>.mp3`. Playback failures
/// (missing file, autoplay policy) are swallowed: sounds are decoration.
pub struct AudioSoundService;

impl SoundService for AudioSoundService {
    fn play(&self, name: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Ok(audio) =
                web_sys::HtmlAudioElement::new_with_src(&format!("/sounds/{name}.mp3"))
            {
                let _ = audio.play();
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = name;
        }
    }
}

/// Name of the optional page-global rasterizer hook.
///
/// The shell cannot rasterize arbitrary DOM itself, so the hosting page may
/// install `window.__shell_capture_window(dom_id) -> Promise<string>`
/// returning an encoded data URL. Without the hook every capture fails and
/// the genie animation falls back to immediate commits.
pub const CAPTURE_HOOK_NAME: &str = "__shell_capture_window";

#[derive(Debug, Clone, Copy, Default)]
/// Window capture through the page-global rasterizer hook.
pub struct DomCaptureService;

impl CaptureService for DomCaptureService {
    fn capture_window<'a>(&'a self, dom_id: &'a str, bounds: Rect) -> CaptureFuture<'a> {
        Box::pin(async move { capture_via_hook(dom_id, bounds).await })
    }
}

#[cfg(target_arch = "wasm32")]
async fn capture_via_hook(dom_id: &str, bounds: Rect) -> Result<CapturedBitmap, String> {
    use wasm_bindgen::{JsCast, JsValue};

    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let hook = js_sys::Reflect::get(&window, &JsValue::from_str(CAPTURE_HOOK_NAME))
        .map_err(|e| format!("capture hook lookup failed: {e:?}"))?;
    let hook: js_sys::Function = hook
        .dyn_into()
        .map_err(|_| "capture hook not installed".to_string())?;
    let promise = hook
        .call1(&JsValue::NULL, &JsValue::from_str(dom_id))
        .map_err(|e| format!("capture hook call failed: {e:?}"))?;
    let promise: js_sys::Promise = promise
        .dyn_into()
        .map_err(|_| "capture hook did not return a promise".to_string())?;
    let value = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| format!("capture failed: {e:?}"))?;
    let data_url = value
        .as_string()
        .ok_or_else(|| "capture did not yield a data url".to_string())?;
    if data_url.is_empty() {
        return Err("capture yielded an empty data url".to_string());
    }
    Ok(CapturedBitmap {
        width: bounds.w,
        height: bounds.h,
        data_url,
    })
}

#[cfg(not(target_arch = "wasm32"))]
async fn capture_via_hook(_dom_id: &str, _bounds: Rect) -> Result<CapturedBitmap, String> {
    Err("window capture unavailable".to_string())
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn local_record_store_degrades_to_noop_off_browser() {
        let store = LocalRecordStore;
        let store_obj: &dyn RecordStore = &store;
        assert_eq!(block_on(store_obj.load_record("k")).expect("load"), None);
        block_on(store_obj.save_record("k", "{}")).expect("save");
    }

    #[test]
    fn dom_capture_errors_off_browser() {
        let service = DomCaptureService;
        let service_obj: &dyn CaptureService = &service;
        assert!(block_on(service_obj.capture_window("w", Rect::new(0, 0, 10, 10))).is_err());
    }
}
