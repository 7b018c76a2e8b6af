use crate::bridge::Shared;
use crate::input;
use mascot_core::Mascot;
use std::rc::Weak;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Handler = Closure<dyn FnMut(web::Event)>;

/// Mouse and touch listeners on the mascot's canvas. Removed on drop.
pub struct PointerListeners {
    canvas: web::HtmlCanvasElement,
    handlers: Vec<(&'static str, Handler)>,
}

impl PointerListeners {
    pub fn attach(canvas: &web::HtmlCanvasElement, shared: Weak<Shared>) -> Self {
        let mut listeners = Self {
            canvas: canvas.clone(),
            handlers: Vec::new(),
        };

        listeners.wire("mouseenter", false, &shared, |m, _, _| m.pointer_enter());
        listeners.wire("mouseleave", false, &shared, |m, _, _| m.pointer_leave());
        listeners.wire("mousemove", false, &shared, |m, ev, canvas| {
            if let Some(ev) = ev.dyn_ref::<web::MouseEvent>() {
                m.pointer_move(input::mouse_canvas_px(ev, canvas));
            }
        });
        listeners.wire("touchstart", true, &shared, |m, ev, canvas| {
            if let Some(pos) = ev
                .dyn_ref::<web::TouchEvent>()
                .and_then(|t| input::touch_canvas_px(t, canvas))
            {
                m.touch_start(pos);
            }
            ev.prevent_default();
        });
        listeners.wire("touchmove", true, &shared, |m, ev, canvas| {
            if let Some(pos) = ev
                .dyn_ref::<web::TouchEvent>()
                .and_then(|t| input::touch_canvas_px(t, canvas))
            {
                m.touch_move(pos);
            }
            ev.prevent_default();
        });
        listeners
    }

    /// `active` listeners are registered with `passive: false` so they may
    /// call `preventDefault`.
    fn wire<F>(&mut self, name: &'static str, active: bool, shared: &Weak<Shared>, mut f: F)
    where
        F: FnMut(&mut Mascot, &web::Event, &web::HtmlCanvasElement) + 'static,
    {
        let shared = shared.clone();
        let canvas = self.canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            _ = shared.with(|m| f(m, &ev, &canvas));
        }) as Box<dyn FnMut(_)>);

        let result = if active {
            let opts = web::AddEventListenerOptions::new();
            opts.set_passive(false);
            self.canvas
                .add_event_listener_with_callback_and_add_event_listener_options(
                    name,
                    closure.as_ref().unchecked_ref(),
                    &opts,
                )
        } else {
            self.canvas
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        };
        if let Err(e) = result {
            log::warn!("[pointer] could not listen for {}: {:?}", name, e);
            return;
        }
        self.handlers.push((name, closure));
    }

    pub fn detach(&mut self) {
        for (name, closure) in self.handlers.drain(..) {
            _ = self
                .canvas
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for PointerListeners {
    fn drop(&mut self) {
        self.detach();
    }
}
