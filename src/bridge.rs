//! Glue between the core controller and script callers.
//!
//! Script code never runs while the controller is borrowed: listeners,
//! completion handlers and animation routines queue into an [`Outbox`] that is
//! flushed once the borrow is released, so they may call back into the mascot.

use crate::dom::describe;
use crate::outbox::Outbox;
use js_sys::{Function, Promise, JSON};
use mascot_core::{
    Animation, AnimationOutcome, AnimationParams, ExternalAnimation, Mascot, MascotEvent,
    Settlement,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Queue `callback(arg)` on `outbox`.
pub fn call_later(outbox: &Outbox, callback: Function, arg: JsValue) {
    outbox.defer(move || {
        if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
            log::error!("[events] script callback failed: {}", describe(&e));
        }
    });
}

pub struct Shared {
    mascot: RefCell<Mascot>,
    pub outbox: Rc<Outbox>,
}

impl Shared {
    pub fn new(mascot: Mascot, outbox: Rc<Outbox>) -> Rc<Self> {
        Rc::new(Self {
            mascot: RefCell::new(mascot),
            outbox,
        })
    }

    /// Run `f` against the mascot, then deliver whatever it queued.
    pub fn with<R>(&self, f: impl FnOnce(&mut Mascot) -> R) -> Result<R, JsValue> {
        let out = {
            let mut mascot = self.mascot.try_borrow_mut().map_err(|_| busy_error())?;
            f(&mut mascot)
        };
        if !self.outbox.is_empty() {
            self.outbox.flush();
        }
        Ok(out)
    }

    pub fn peek<R>(&self, f: impl FnOnce(&Mascot) -> R) -> Option<R> {
        self.mascot.try_borrow().ok().map(|m| f(&m))
    }
}

fn busy_error() -> JsValue {
    js_sys::Error::new("OsmosMascot: re-entrant call while the mascot is busy").into()
}

pub fn json_to_js(value: &serde_json::Value) -> JsValue {
    JSON::parse(&value.to_string()).unwrap_or(JsValue::UNDEFINED)
}

/// Missing params become `{}`.
pub fn js_to_json(value: &JsValue) -> AnimationParams {
    if value.is_undefined() || value.is_null() {
        return serde_json::json!({});
    }
    let text = match JSON::stringify(value) {
        Ok(s) => String::from(s),
        Err(e) => {
            log::warn!("[animation] params not serialisable: {}", describe(&e));
            return serde_json::json!({});
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("[animation] params not serialisable: {}", e);
        serde_json::json!({})
    })
}

pub fn payload_to_js(event: &MascotEvent) -> JsValue {
    event
        .payload()
        .map_or(JsValue::UNDEFINED, |p| json_to_js(&p))
}

/// A promise plus the completion callback that settles it through `outbox`.
/// Completed and cancelled runs resolve; failed runs reject.
pub fn completion(outbox: &Rc<Outbox>) -> (Promise, impl FnOnce(AnimationOutcome) + 'static) {
    let mut slots = None;
    let promise = Promise::new(&mut |resolve, reject| slots = Some((resolve, reject)));
    let outbox = outbox.clone();
    let on_done = move |outcome: AnimationOutcome| {
        let Some((resolve, reject)) = slots else {
            return;
        };
        match outcome {
            AnimationOutcome::Completed | AnimationOutcome::Cancelled => {
                call_later(&outbox, resolve, JsValue::UNDEFINED)
            }
            AnimationOutcome::Failed(msg) => {
                call_later(&outbox, reject, js_sys::Error::new(&msg).into())
            }
        }
    };
    (promise, on_done)
}

/// Factory for a script routine `fn(duration, params) -> Promise | undefined`.
///
/// The routine itself is deferred to `outbox`, so it runs once the call that
/// started the animation has released the mascot and may use it freely.
pub fn script_factory(
    routine: Function,
    outbox: Rc<Outbox>,
) -> impl Fn(f64, &AnimationParams) -> anyhow::Result<Box<dyn Animation>> + 'static {
    move |duration: f64, params: &AnimationParams| {
        let settlement = Settlement::default();
        let handle = settlement.clone();
        let routine = routine.clone();
        let args = (JsValue::from_f64(duration), json_to_js(params));
        outbox.defer(move || launch(&routine, args, handle));
        Ok(Box::new(ExternalAnimation::new(settlement)) as Box<dyn Animation>)
    }
}

/// A routine returning `undefined` is done at once; anything else is treated
/// as a promise and awaited.
fn launch(routine: &Function, (duration, params): (JsValue, JsValue), settlement: Settlement) {
    if settlement.is_cancelled() {
        return;
    }
    let ret = match routine.call2(&JsValue::NULL, &duration, &params) {
        Ok(ret) => ret,
        Err(e) => {
            settlement.reject(describe(&e));
            return;
        }
    };
    if ret.is_undefined() {
        settlement.resolve();
        return;
    }
    let promise = Promise::resolve(&ret);
    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => settlement.resolve(),
            Err(e) => settlement.reject(describe(&e)),
        }
    });
}
