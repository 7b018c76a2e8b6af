//! Lifecycle notifications.
//!
//! A small publish/subscribe registry. Listeners run synchronously in
//! registration order. A listener that returns an error is logged and the
//! remaining listeners still run.

use crate::{MascotError, MascotState};
use fnv::FnvHashMap;
use glam::DVec2;
use serde_json::{json, Value};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Init,
    Start,
    Stop,
    Destroy,
    StateChange,
    AnimationStart,
    AnimationEnd,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::Init,
        EventKind::Start,
        EventKind::Stop,
        EventKind::Destroy,
        EventKind::StateChange,
        EventKind::AnimationStart,
        EventKind::AnimationEnd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Init => "init",
            EventKind::Start => "start",
            EventKind::Stop => "stop",
            EventKind::Destroy => "destroy",
            EventKind::StateChange => "state:change",
            EventKind::AnimationStart => "animation:start",
            EventKind::AnimationEnd => "animation:end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = MascotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| MascotError::UnknownEvent(s.to_string()))
    }
}

/// Geometry snapshot handed to `init` listeners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MascotSnapshot {
    pub size: DVec2,
    pub center: DVec2,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MascotEvent {
    Init(MascotSnapshot),
    Start,
    Stop,
    Destroy,
    StateChange {
        old_state: MascotState,
        new_state: MascotState,
    },
    AnimationStart {
        kind: String,
        duration: f64,
    },
    AnimationEnd {
        kind: String,
        duration: f64,
    },
}

impl MascotEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MascotEvent::Init(_) => EventKind::Init,
            MascotEvent::Start => EventKind::Start,
            MascotEvent::Stop => EventKind::Stop,
            MascotEvent::Destroy => EventKind::Destroy,
            MascotEvent::StateChange { .. } => EventKind::StateChange,
            MascotEvent::AnimationStart { .. } => EventKind::AnimationStart,
            MascotEvent::AnimationEnd { .. } => EventKind::AnimationEnd,
        }
    }

    /// JSON payload as seen by script listeners; `None` for payload-free events.
    pub fn payload(&self) -> Option<Value> {
        match self {
            MascotEvent::Init(s) => Some(json!({
                "mascot": {
                    "width": s.size.x,
                    "height": s.size.y,
                    "centerX": s.center.x,
                    "centerY": s.center.y,
                    "radius": s.radius,
                }
            })),
            MascotEvent::Start | MascotEvent::Stop | MascotEvent::Destroy => None,
            MascotEvent::StateChange {
                old_state,
                new_state,
            } => Some(json!({
                "oldState": old_state.as_str(),
                "newState": new_state.as_str(),
            })),
            MascotEvent::AnimationStart { kind, duration }
            | MascotEvent::AnimationEnd { kind, duration } => Some(json!({
                "type": kind,
                "duration": duration,
            })),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&MascotEvent) -> anyhow::Result<()>>;

#[derive(Default)]
pub struct EventEmitter {
    listeners: FnvHashMap<EventKind, SmallVec<[(ListenerId, Listener); 2]>>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `kind`. Registering the same closure twice
    /// yields two independent registrations.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&MascotEvent) -> anyhow::Result<()> + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a registration. Returns whether anything was removed.
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        match list.iter().position(|(lid, _)| *lid == id) {
            Some(idx) => {
                drop(list.remove(idx));
                true
            }
            None => false,
        }
    }

    pub fn emit(&mut self, event: &MascotEvent) {
        let kind = event.kind();
        let Some(list) = self.listeners.get_mut(&kind) else {
            return;
        };
        for (id, listener) in list.iter_mut() {
            if let Err(e) = listener(event) {
                log::error!("[events] listener {:?} for '{}' failed: {:#}", id, kind, e);
            }
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, |l| l.len())
    }
}
