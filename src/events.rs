use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{POINTER_QUEUE_MAX, REDUCED_MOTION_QUERY};
use crate::dom;
use crate::input::{self, PointerQueue, TeardownGate};

/// Page input written by listeners and read once per frame.
#[derive(Debug)]
pub struct PageInput {
    pub pointer: PointerQueue,
    pub reduced_motion: bool,
    /// Set by `resize`; the frame loop resizes the canvas and clears it.
    pub resized: bool,
}

impl PageInput {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            pointer: PointerQueue::with_capacity(POINTER_QUEUE_MAX),
            reduced_motion,
            resized: true,
        }
    }
}

type Callback = Closure<dyn FnMut(web::Event)>;

/// Event listeners that stay registered for as long as this value lives.
/// Dropping it removes every one of them.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(web::EventTarget, &'static str, Callback)>,
}

impl Listeners {
    pub fn add(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(true);
        _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &opts,
        );
        self.entries.push((target.clone(), kind, closure));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (target, kind, closure) in self.entries.drain(..) {
            _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

pub fn wire_pointer(listeners: &mut Listeners, window: &web::Window, page: Rc<RefCell<PageInput>>) {
    let win = window.clone();
    listeners.add(window, "pointermove", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
            return;
        };
        let (w, h) = dom::viewport_size(&win);
        let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
        if let Some(ndc) = input::client_to_ndc(client, Vec2::new(w as f32, h as f32)) {
            page.borrow_mut().pointer.push(ndc);
        }
    });
}

pub fn wire_resize(listeners: &mut Listeners, window: &web::Window, page: Rc<RefCell<PageInput>>) {
    listeners.add(window, "resize", move |_| {
        page.borrow_mut().resized = true;
    });
}

/// Track the OS reduced-motion preference while the page is open.
pub fn wire_reduced_motion(
    listeners: &mut Listeners,
    window: &web::Window,
    page: Rc<RefCell<PageInput>>,
) {
    let Ok(Some(mql)) = window.match_media(REDUCED_MOTION_QUERY) else {
        return;
    };
    listeners.add(&mql, "change", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::MediaQueryListEvent>() {
            let reduce = ev.matches();
            log::info!("[scroll] reduced motion {}", if reduce { "on" } else { "off" });
            page.borrow_mut().reduced_motion = reduce;
        }
    });
}

/// Run `teardown` once when the page is hidden for good. Hides into the
/// back/forward cache leave the scene running so a restored page resumes.
pub fn wire_teardown(window: &web::Window, teardown: impl FnOnce() + 'static) {
    let mut gate = TeardownGate::default();
    let mut teardown = Some(teardown);
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let persisted = ev
            .dyn_ref::<web::PageTransitionEvent>()
            .is_some_and(|ev| ev.persisted());
        if persisted {
            log::info!("[teardown] page cached, keeping scene");
        }
        if gate.on_pagehide(persisted) {
            if let Some(f) = teardown.take() {
                f();
            }
        }
    }) as Box<dyn FnMut(web::Event)>);
    _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    closure.forget();
}
