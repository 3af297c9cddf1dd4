use std::cell::{Cell, RefCell};
use std::rc::Rc;

use instant::Instant;
use opx_core::{FrameInput, PerformanceMonitor, QualitySettings, Scene, ScrollSampler};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::assets::AssetInbox;
use crate::constants::{MAX_FRAME_DT_SEC, QUALITY_DOWNGRADE_STREAK};
use crate::dom;
use crate::events::PageInput;
use crate::overlay::Overlay;
use crate::render;

pub struct FrameContext<'a> {
    pub scene: Scene,
    pub sampler: ScrollSampler,
    pub monitor: PerformanceMonitor,
    pub page: Rc<RefCell<PageInput>>,
    pub inbox: AssetInbox,
    pub overlay: Overlay,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub mobile: bool,
    /// Tier forced from the query string; adaptive quality stays off.
    pub quality_locked: bool,
    pub started: Instant,
    pub last_instant: Instant,
    pub low_fps_windows: u32,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_instant = now;
        let elapsed = (now - self.started).as_secs_f64();

        for (id, result) in self.inbox.borrow_mut().drain(..) {
            self.scene.resolve_asset(id, result);
        }
        self.adapt_quality(elapsed * 1000.0);

        let Some(window) = web::window() else {
            return;
        };
        let (offset, extent) = dom::scroll_metrics(&window);
        self.sampler.sample(offset, extent, elapsed);

        let input = {
            let mut page = self.page.borrow_mut();
            if std::mem::take(&mut page.resized) {
                dom::sync_canvas_backing_size(&self.canvas, self.scene.quality());
            }
            FrameInput {
                scroll: self.scene.scroll(),
                elapsed_sec: elapsed as f32,
                pointer_ndc: page.pointer.latest(),
                pointer_moves: page.pointer.take_moves(),
                aspect: self.canvas.width().max(1) as f32 / self.canvas.height().max(1) as f32,
                mobile: self.mobile,
                reduced_motion: page.reduced_motion,
                ..FrameInput::default()
            }
        };

        let out = self.scene.update(&input);
        self.overlay.apply(&out.text);
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(dt_sec, &out) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    /// Step the tier down after a run of slow one-second windows.
    fn adapt_quality(&mut self, now_ms: f64) {
        if self.monitor.update(now_ms).is_none() || self.quality_locked {
            return;
        }
        if !self.monitor.is_low_performance() {
            self.low_fps_windows = 0;
            return;
        }
        self.low_fps_windows += 1;
        let tier = self.scene.quality().tier;
        let lower = tier.step_down();
        if self.low_fps_windows < QUALITY_DOWNGRADE_STREAK || lower == tier {
            return;
        }
        log::info!("[quality] {} fps, leaving {} tier", self.monitor.fps(), tier);
        self.low_fps_windows = 0;
        self.scene.set_quality(QualitySettings::for_device(lower, self.mobile));
        dom::sync_canvas_backing_size(&self.canvas, self.scene.quality());
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// A running `requestAnimationFrame` loop.
pub struct FrameLoop {
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    /// Cancel the pending frame and release the callback.
    pub fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        self.tick.borrow_mut().take();
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, handle: &Cell<Option<i32>>) {
    let id = match (web::window(), tick.borrow().as_ref()) {
        (Some(w), Some(cb)) => w.request_animation_frame(cb.as_ref().unchecked_ref()).ok(),
        _ => None,
    };
    handle.set(id);
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) -> FrameLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let handle_clone = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone, &handle_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &handle);
    FrameLoop { tick, handle }
}
