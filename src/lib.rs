#![cfg(target_arch = "wasm32")]
mod bridge;
mod canvas;
mod dom;
mod events;
mod frame;
mod input;
mod listeners;
mod outbox;

use bridge::Shared;
use js_sys::{Function, Promise};
use listeners::Registrations;
use mascot_core::{EventKind, Host, InstantClock, ListenerId, Mascot, MascotError, RunOutcome};
use outbox::Outbox;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("osmos-mascot loaded");
    Ok(())
}

fn to_js(err: MascotError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

struct Inner {
    shared: Rc<Shared>,
    pointer: RefCell<Option<events::PointerListeners>>,
    listeners: RefCell<Registrations<Function, (EventKind, ListenerId)>>,
}

/// Script handle to one mascot. Clones share the same mascot, which lets
/// `registerAnimation` return the instance for chaining:
///
/// ```js
/// mascot
///   .registerAnimation("nod", (duration) => nod(canvas, duration))
///   .registerAnimation("spin", async (duration, { turns }) => spin(turns));
/// ```
#[wasm_bindgen]
#[derive(Clone)]
pub struct OsmosMascot {
    inner: Rc<Inner>,
}

impl OsmosMascot {
    fn shared(&self) -> &Shared {
        &self.inner.shared
    }
}

#[wasm_bindgen]
impl OsmosMascot {
    /// `config` is optional; see `MascotConfig` for the recognised keys.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OsmosMascot, JsValue> {
        let (config, element) = dom::parse_config(&config).map_err(to_js)?;
        let canvas = match element {
            Some(canvas) => canvas,
            None => dom::find_canvas(&config.canvas_id).map_err(|e| {
                log::error!("{}", e);
                to_js(e)
            })?,
        };
        let context = canvas::context_2d(&canvas).map_err(to_js)?;

        let callbacks = Rc::new(frame::FrameCallbacks::default());
        let host = Host {
            canvas: Box::new(canvas::HtmlCanvas::new(canvas.clone())),
            context: Box::new(canvas::Canvas2d::new(context)),
            scheduler: Box::new(frame::RafScheduler::new(callbacks.clone())),
            clock: Box::new(InstantClock::default()),
            theme: Box::new(dom::CssTheme::from_body()),
        };
        let shared = Shared::new(Mascot::new(config, host), Rc::new(Outbox::default()));
        frame::install(&callbacks, &shared);
        let pointer = events::PointerListeners::attach(&canvas, Rc::downgrade(&shared));

        Ok(OsmosMascot {
            inner: Rc::new(Inner {
                shared,
                pointer: RefCell::new(Some(pointer)),
                listeners: RefCell::new(Registrations::default()),
            }),
        })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        self.shared().with(|m| m.start())
    }

    /// Resolves immediately; the loop is already halted when this returns.
    pub fn stop(&self) -> Result<Promise, JsValue> {
        self.shared().with(|m| m.stop())?;
        Ok(Promise::resolve(&JsValue::UNDEFINED))
    }

    pub fn destroy(&self) -> Result<(), JsValue> {
        self.shared().with(|m| m.destroy())?;
        // dropping detaches
        self.inner.pointer.borrow_mut().take();
        let mut listeners = self.inner.listeners.borrow_mut();
        if !listeners.is_empty() {
            log::debug!("[events] dropping {} script listeners", listeners.len());
            listeners.clear();
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&self, state: String) -> Result<(), JsValue> {
        self.shared().with(|m| m.set_state(state))
    }

    /// Re-measure the canvas, e.g. after a layout change.
    pub fn resize(&self) -> Result<(), JsValue> {
        self.shared().with(|m| m.resize())
    }

    #[wasm_bindgen(js_name = refreshColors)]
    pub fn refresh_colors(&self) -> Result<(), JsValue> {
        self.shared().with(|m| m.refresh_colors())
    }

    /// Resolves when the animation ends or is cancelled, rejects if it fails.
    /// Requests dropped because another animation is running (or the name is
    /// unknown) resolve immediately.
    #[wasm_bindgen(js_name = runAnimation)]
    pub fn run_animation(&self, name: String, params: JsValue) -> Result<Promise, JsValue> {
        let params = bridge::js_to_json(&params);
        let (promise, on_done) = bridge::completion(&self.shared().outbox);
        match self.shared().with(|m| m.run_animation(&name, params, on_done))? {
            RunOutcome::Started => Ok(promise),
            RunOutcome::Busy | RunOutcome::Unknown => Ok(Promise::resolve(&JsValue::UNDEFINED)),
        }
    }

    /// `routine(duration, params)` may return a promise; the animation lasts
    /// until it settles. The routine is called after `runAnimation` has
    /// updated the mascot, so it may read and drive the instance. Returns the
    /// instance for chaining.
    #[wasm_bindgen(js_name = registerAnimation)]
    pub fn register_animation(
        &self,
        name: String,
        routine: Function,
    ) -> Result<OsmosMascot, JsValue> {
        let outbox = self.shared().outbox.clone();
        self.shared().with(|m| {
            m.register_animation(&name, bridge::script_factory(routine, outbox));
        })?;
        Ok(self.clone())
    }

    /// Any event name is accepted; names the mascot never emits never fire.
    pub fn on(&self, event: String, callback: Function) -> Result<(), JsValue> {
        let id = match event.parse::<EventKind>() {
            Ok(kind) => {
                let outbox = self.shared().outbox.clone();
                let target = callback.clone();
                let id = self.shared().with(|m| {
                    m.on(kind, move |ev| {
                        bridge::call_later(&outbox, target.clone(), bridge::payload_to_js(ev));
                        Ok(())
                    })
                })?;
                Some((kind, id))
            }
            Err(_) => {
                log::debug!("[events] '{}' is never emitted", event);
                None
            }
        };
        self.inner.listeners.borrow_mut().add(&event, callback, id);
        Ok(())
    }

    /// Removes the earliest registration of `callback` for `event`.
    pub fn off(&self, event: String, callback: Function) -> Result<(), JsValue> {
        let removed = self
            .inner
            .listeners
            .borrow_mut()
            .remove_first(&event, &callback);
        if let Some(Some((kind, id))) = removed {
            self.shared().with(|m| m.off(kind, id))?;
        }
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.shared()
            .peek(|m| m.state().to_string())
            .unwrap_or_default()
    }

    #[wasm_bindgen(getter, js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.shared().peek(Mascot::is_animating).unwrap_or(true)
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.shared().peek(Mascot::is_running).unwrap_or(true)
    }
}
