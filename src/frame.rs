use crate::bridge::Shared;
use mascot_core::{FrameHandle, FrameScheduler, FrameTrack, Mascot};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameSlot = RefCell<Option<Closure<dyn FnMut()>>>;

/// One `requestAnimationFrame` callback per track, installed after the
/// mascot they drive has been created.
#[derive(Default)]
pub struct FrameCallbacks {
    render: FrameSlot,
    animation: FrameSlot,
}

impl FrameCallbacks {
    fn slot(&self, track: FrameTrack) -> &FrameSlot {
        match track {
            FrameTrack::Render => &self.render,
            FrameTrack::Animation => &self.animation,
        }
    }
}

pub struct RafScheduler {
    callbacks: Rc<FrameCallbacks>,
}

impl RafScheduler {
    pub fn new(callbacks: Rc<FrameCallbacks>) -> Self {
        Self { callbacks }
    }
}

impl FrameScheduler for RafScheduler {
    fn schedule(&mut self, track: FrameTrack) -> Option<FrameHandle> {
        let window = web::window()?;
        let slot = self.callbacks.slot(track).borrow();
        let Some(tick) = slot.as_ref() else {
            log::warn!("[frame] {:?} callback not installed yet", track);
            return None;
        };
        match window.request_animation_frame(tick.as_ref().unchecked_ref()) {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::error!("[frame] requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(handle.0);
        }
    }
}

pub fn install(callbacks: &FrameCallbacks, shared: &Rc<Shared>) {
    *callbacks.render.borrow_mut() = Some(tick(Rc::downgrade(shared), Mascot::update_and_draw));
    *callbacks.animation.borrow_mut() =
        Some(tick(Rc::downgrade(shared), Mascot::advance_animation));
}

fn tick(shared: Weak<Shared>, step: fn(&mut Mascot)) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        if let Err(e) = shared.with(step) {
            log::error!("[frame] skipped: {:?}", e);
        }
    }) as Box<dyn FnMut()>)
}
