use opx_core::{DeviceProfile, QualitySettings};
use wasm_bindgen::JsValue;
use web_sys as web;

use crate::constants::MOBILE_BREAKPOINT_PX;
use crate::input;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Size the canvas backing store to its CSS box at the device pixel ratio,
/// clamped to what the quality tier allows.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, quality: &QualitySettings) {
    if let Some(w) = web::window() {
        let dpr = quality.clamp_dpr(w.device_pixel_ratio());
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

#[inline]
pub fn viewport_size(window: &web::Window) -> (f64, f64) {
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (read(window.inner_width()), read(window.inner_height()))
}

/// Current scroll offset and scrollable extent, both in CSS px.
pub fn scroll_metrics(window: &web::Window) -> (f64, f64) {
    let offset = window.scroll_y().unwrap_or(0.0);
    let (_, viewport_h) = viewport_size(window);
    let doc_h = window
        .document()
        .and_then(|d| d.document_element())
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    (offset, input::scroll_extent(doc_h, viewport_h))
}

pub fn is_mobile(window: &web::Window) -> bool {
    let ua = window.navigator().user_agent().unwrap_or_default();
    let (width, _) = viewport_size(window);
    input::is_mobile(&ua, width, MOBILE_BREAKPOINT_PX)
}

pub fn prefers_reduced_motion(window: &web::Window, query: &str) -> bool {
    matches!(window.match_media(query), Ok(Some(mql)) if mql.matches())
}

/// Hardware hints for tier detection. Fields the browser does not expose
/// stay empty.
pub fn device_profile(
    window: &web::Window,
    gpu_name: Option<&str>,
    mobile: bool,
) -> DeviceProfile {
    let navigator = window.navigator();
    let nav: &JsValue = navigator.as_ref();
    let prop = |target: &JsValue, key: &str| js_sys::Reflect::get(target, &JsValue::from_str(key)).ok();
    let device_memory_gb = prop(nav, "deviceMemory").and_then(|v| v.as_f64());
    let fast_connection = prop(nav, "connection")
        .filter(|c| c.is_object())
        .and_then(|c| prop(&c, "effectiveType"))
        .and_then(|t| t.as_string())
        .is_some_and(|t| t == "4g");
    let cores = navigator.hardware_concurrency();
    DeviceProfile {
        gpu_name: gpu_name.filter(|n| !n.is_empty()).map(str::to_owned),
        device_memory_gb,
        hardware_concurrency: (cores.is_finite() && cores > 0.0).then_some(cores as u32),
        fast_connection,
        mobile,
    }
}
