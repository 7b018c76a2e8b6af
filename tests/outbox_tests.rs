// Host-side tests for the deferred-work queue.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod outbox {
    include!("../src/outbox.rs");
}

use outbox::Outbox;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Widget {
    state: String,
    log: Vec<String>,
}

/// Mirrors the web handle: borrow, run, release, then flush.
fn with(widget: &RefCell<Widget>, outbox: &Outbox, f: impl FnOnce(&mut Widget)) {
    {
        let mut w = widget.borrow_mut();
        f(&mut w);
    }
    outbox.flush();
}

#[test]
fn deferred_work_sees_the_released_value() {
    let widget = Rc::new(RefCell::new(Widget {
        state: "idle".into(),
        ..Default::default()
    }));
    let outbox = Rc::new(Outbox::default());

    let (w, o) = (widget.clone(), outbox.clone());
    with(&widget, &outbox, move |inner| {
        inner.log.push("run".into());
        // queued while borrowed; runs only after release
        let w2 = w.clone();
        o.defer(move || {
            let seen = w2.try_borrow().map(|w| w.state.clone());
            assert_eq!(seen.as_deref().ok(), Some("idle"));
            w2.borrow_mut().state = "connecting".into();
        });
        assert!(w.try_borrow().is_err());
    });

    assert!(outbox.is_empty());
    assert_eq!(widget.borrow().state, "connecting");
    assert_eq!(widget.borrow().log, vec!["run"]);
}

#[test]
fn flush_runs_jobs_in_order_including_ones_queued_while_flushing() {
    let outbox = Rc::new(Outbox::default());
    let order = Rc::new(RefCell::new(Vec::new()));
    for n in 0..3 {
        let order = order.clone();
        let inner = outbox.clone();
        outbox.defer(move || {
            order.borrow_mut().push(n);
            if n == 0 {
                let order = order.clone();
                inner.defer(move || order.borrow_mut().push(10));
            }
        });
    }
    assert!(!outbox.is_empty());
    outbox.flush();
    assert_eq!(*order.borrow(), vec![0, 1, 2, 10]);
    assert!(outbox.is_empty());
}

#[test]
fn nested_flush_keeps_the_queue_consistent() {
    let outbox = Rc::new(Outbox::default());
    let order = Rc::new(RefCell::new(Vec::new()));
    {
        let (order, inner) = (order.clone(), outbox.clone());
        outbox.defer(move || {
            order.borrow_mut().push("a");
            // a job that calls back into the handle flushes again
            inner.flush();
        });
    }
    {
        let order = order.clone();
        outbox.defer(move || order.borrow_mut().push("b"));
    }
    outbox.flush();
    assert_eq!(*order.borrow(), vec!["a", "b"]);
}
