#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use opx_core::{
    shared_scroll, PerformanceMonitor, QualitySettings, Scene, SceneParams, ScrollSampler,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

use constants::{CANVAS_ID, REDUCED_MOTION_QUERY};

fn scene_params(window: &web::Window) -> SceneParams {
    let query = window.location().search().unwrap_or_default();
    let (params, errors) = SceneParams::from_query(&query);
    for e in errors {
        log::warn!("[scroll] ignoring query parameter: {e}");
    }
    params
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing canvas #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let params = scene_params(&window);
    let mobile = dom::is_mobile(&window);
    let gpu = frame::init_gpu(&canvas).await;
    let adapter = gpu.as_ref().map(|g| g.adapter_name());
    let detected = dom::device_profile(&window, adapter, mobile).tier();
    let quality = QualitySettings::select(params.quality, detected, mobile);
    log::info!(
        "[quality] {} tier{}, {} particles{}",
        quality.tier,
        if params.quality.is_some() { " (forced)" } else { "" },
        quality.particle_budget,
        if mobile { ", mobile" } else { "" }
    );
    dom::sync_canvas_backing_size(&canvas, &quality);

    let (writer, reader) = shared_scroll();
    let sampler = ScrollSampler::new(writer);
    let (w, h) = (canvas.width().max(1), canvas.height().max(1));
    let scene = Scene::new(
        params.clone(),
        quality,
        reader,
        w as f32 / h as f32,
        mobile,
    )?;
    let overlay = overlay::Overlay::build(&document, scene.text().panels())?;

    let reduced = dom::prefers_reduced_motion(&window, REDUCED_MOTION_QUERY);
    let page = Rc::new(RefCell::new(events::PageInput::new(reduced)));
    let mut listeners = events::Listeners::default();
    events::wire_pointer(&mut listeners, &window, page.clone());
    events::wire_resize(&mut listeners, &window, page.clone());
    events::wire_reduced_motion(&mut listeners, &window, page.clone());

    let mut loader = assets::AssetLoader::new();
    if params.load_assets {
        loader.spawn_all();
    } else {
        log::info!("[assets] loading disabled, using fallbacks");
    }

    let now = Instant::now();
    let ctx = frame::FrameContext {
        scene,
        sampler,
        monitor: PerformanceMonitor::default(),
        page,
        inbox: loader.inbox(),
        overlay,
        canvas,
        gpu,
        mobile,
        quality_locked: params.quality.is_some(),
        started: now,
        last_instant: now,
        low_fps_windows: 0,
    };
    let frame_loop = frame::start_loop(Rc::new(RefCell::new(ctx)));

    events::wire_teardown(&window, move || {
        frame_loop.cancel();
        let removed = listeners.len();
        drop(listeners);
        loader.abort();
        log::info!("[teardown] frame loop stopped, {removed} listeners removed");
    });
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("OPX scroll scene starting");
    spawn_local(async {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}
