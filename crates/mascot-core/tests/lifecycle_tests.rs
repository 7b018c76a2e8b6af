mod common;

use common::{event_log, rig};
use mascot_core::{EventEmitter, EventKind, FrameTrack, MascotEvent, MascotState};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn init_is_observable_through_preregistered_listeners() {
    let seen = Rc::new(RefCell::new(None));
    let mut events = EventEmitter::new();
    {
        let seen = seen.clone();
        events.on(EventKind::Init, move |ev| {
            *seen.borrow_mut() = ev.payload();
            Ok(())
        });
    }
    let _r = rig().size(240.0, 120.0).events(events).build();
    let payload = seen.borrow().clone().expect("init emitted");
    assert_eq!(payload["mascot"]["width"], json!(240.0));
    assert_eq!(payload["mascot"]["height"], json!(120.0));
    assert_eq!(payload["mascot"]["radius"], json!(10.0));
}

#[test]
fn start_and_stop_emit_and_toggle_visibility() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut r = rig().build();
    r.mascot.on(EventKind::Start, event_log(&log));
    r.mascot.on(EventKind::Stop, event_log(&log));

    r.mascot.start();
    r.mascot.start();
    assert_eq!(*log.borrow(), vec!["start"], "second start is a no-op");

    r.mascot.stop();
    assert!(!r.mascot.is_running());
    assert!(!r.canvas.borrow().visible);
    assert_eq!(*log.borrow(), vec!["start", "stop"]);
}

#[test]
fn stop_freezes_the_scene() {
    let mut r = rig().build();
    r.mascot.set_state("connecting");
    r.mascot.start();
    r.frames(20);
    r.mascot.stop();

    let particles = r.mascot.particle_count();
    let gaze = r.mascot.gaze_position();
    let time = r.mascot.anim_time();
    assert!(!r.frame(), "no frame left pending");
    assert_eq!(r.mascot.particle_count(), particles);
    assert_eq!(r.mascot.gaze_position(), gaze);
    assert_eq!(r.mascot.anim_time(), time);

    r.mascot.start();
    assert!(r.mascot.is_running());
    assert!(r.frame());
}

#[test]
fn set_state_emits_only_on_change() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let mut r = rig().build();
    {
        let changes = changes.clone();
        r.mascot.on(EventKind::StateChange, move |ev| {
            changes.borrow_mut().push(ev.payload().expect("payload"));
            Ok(())
        });
    }

    r.mascot.set_state("idle");
    assert!(changes.borrow().is_empty());

    r.mascot.set_state("connecting");
    r.mascot.set_state(MascotState::Connecting);
    r.mascot.set_state("listening");
    assert_eq!(r.mascot.state(), &MascotState::Custom("listening".into()));
    assert_eq!(
        *changes.borrow(),
        vec![
            json!({"oldState": "idle", "newState": "connecting"}),
            json!({"oldState": "connecting", "newState": "listening"}),
        ]
    );
}

#[test]
fn custom_state_has_no_special_visuals() {
    let mut r = rig().build();
    r.mascot.set_state("listening");
    r.mascot.start();
    r.frames(40);
    assert_eq!(r.mascot.speech_rings().total_spawned(), 0);
    // neither idle spawning nor connecting spawning applies
    assert_eq!(r.mascot.particle_count(), 0);
}

#[test]
fn failing_listener_does_not_block_others() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut r = rig().build();
    r.mascot
        .on(EventKind::Start, |_| anyhow::bail!("listener exploded"));
    r.mascot.on(EventKind::Start, event_log(&log));
    r.mascot.start();
    assert_eq!(*log.borrow(), vec!["start"]);
    assert!(r.mascot.is_running());
}

#[test]
fn off_unregisters() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut r = rig().build();
    let id = r.mascot.on(EventKind::Stop, event_log(&log));
    assert!(r.mascot.off(EventKind::Stop, id));
    assert!(!r.mascot.off(EventKind::Stop, id));
    r.mascot.start();
    r.mascot.stop();
    assert!(log.borrow().is_empty());
}

#[test]
fn destroy_releases_everything() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut r = rig().build();
    for kind in EventKind::ALL {
        r.mascot.on(kind, event_log(&log));
    }
    r.mascot.start();
    r.frames(3);
    r.mascot.destroy();
    assert_eq!(*log.borrow(), vec!["start", "stop"]);
    assert!(!r.mascot.is_running());
    assert!(r.frames.borrow().pending.is_empty());

    // inert afterwards
    r.mascot.start();
    r.mascot.set_state("connecting");
    r.mascot.destroy();
    assert!(!r.mascot.is_running());
    assert!(!r.frame());
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn theme_values_fill_in_missing_overrides() {
    let r = rig()
        .config(|c| {
            c.colors = Some(mascot_core::ColorOverrides {
                core: Some("#000000".into()),
                ..Default::default()
            })
        })
        .theme(|property: &str| match property {
            "--accent-primary" => Some(" #ff0000 ".to_string()),
            "--core-glow-contrast-color" => Some("#ffffff".to_string()),
            "--accent-secondary-rgb" => Some("   ".to_string()),
            _ => None,
        })
        .build();
    let colors = r.mascot.colors();
    assert_eq!(colors.primary, "#ff0000");
    assert_eq!(colors.core, "#000000");
    assert_eq!(colors.secondary_rgb, "129, 140, 248");
}

#[test]
fn event_payload_shapes() {
    assert_eq!(MascotEvent::Start.payload(), None);
    let ev = MascotEvent::AnimationStart {
        kind: "wobble".into(),
        duration: 500.0,
    };
    assert_eq!(ev.payload(), Some(json!({"type": "wobble", "duration": 500.0})));
}

#[test]
fn dropping_a_running_mascot_cancels_its_frames() {
    let mut r = rig().build();
    r.mascot.start();
    r.frames(2);
    r.mascot.run_animation("wobble", json!({}), |_| {});
    assert!(r.frames.borrow().has_pending(FrameTrack::Render));
    assert!(r.frames.borrow().has_pending(FrameTrack::Animation));

    let frames = r.frames.clone();
    drop(r.mascot);
    assert!(frames.borrow().pending.is_empty());
    assert_eq!(frames.borrow().cancelled.len(), 2);
}
