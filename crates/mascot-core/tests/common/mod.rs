#![allow(dead_code)]

use glam::DVec2;
use mascot_core::{
    CanvasElement, Clock, DrawContext, ElementTransform, EventEmitter, FrameHandle,
    FrameScheduler, FrameTrack, Host, Mascot, MascotConfig, NoTheme, ThemeProvider,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const FRAME_MS: f64 = 16.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
pub struct RecordingContext {
    pub ops: Rc<RefCell<Vec<String>>>,
}

impl RecordingContext {
    fn push(&self, op: String) {
        self.ops.borrow_mut().push(op);
    }
}

impl DrawContext for RecordingContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(format!("clear_rect {} {} {} {}", x, y, width, height));
    }
    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(format!("alpha {:.3}", alpha));
    }
    fn fill_circle(&mut self, _center: DVec2, _radius: f64, fill: &str) {
        self.push(format!("fill_circle {}", fill));
    }
    fn fill_radial_glow(
        &mut self,
        _center: DVec2,
        _inner: f64,
        _outer: f64,
        inner_color: &str,
        _outer_color: &str,
    ) {
        self.push(format!("glow {}", inner_color));
    }
    fn stroke_closed_path(&mut self, points: &[DVec2], _stroke: &str, _line_width: f64) {
        self.push(format!("stroke {}", points.len()));
    }
    fn set_shadow(&mut self, color: &str, blur: f64) {
        self.push(format!("shadow {} {}", color, blur));
    }
    fn save(&mut self) {
        self.push("save".into());
    }
    fn restore(&mut self) {
        self.push("restore".into());
    }
    fn translate(&mut self, _x: f64, _y: f64) {
        self.push("translate".into());
    }
    fn rotate(&mut self, _radians: f64) {
        self.push("rotate".into());
    }
    fn scale(&mut self, x: f64, y: f64) {
        self.push(format!("scale {} {}", x, y));
    }
}

#[derive(Debug)]
pub struct CanvasState {
    pub client: DVec2,
    pub dpr: f64,
    pub backing: (u32, u32),
    pub visible: bool,
    pub transforms: Vec<Option<ElementTransform>>,
}

pub struct FakeCanvas(pub Rc<RefCell<CanvasState>>);

impl CanvasElement for FakeCanvas {
    fn client_size(&self) -> DVec2 {
        self.0.borrow().client
    }
    fn device_pixel_ratio(&self) -> f64 {
        self.0.borrow().dpr
    }
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().backing = (width, height);
    }
    fn set_visible(&mut self, visible: bool) {
        self.0.borrow_mut().visible = visible;
    }
    fn set_transform(&mut self, transform: Option<ElementTransform>) {
        self.0.borrow_mut().transforms.push(transform);
    }
}

#[derive(Debug, Default)]
pub struct Frames {
    next: i32,
    pub pending: Vec<(FrameHandle, FrameTrack)>,
    pub cancelled: Vec<FrameHandle>,
}

impl Frames {
    pub fn has_pending(&self, track: FrameTrack) -> bool {
        self.pending.iter().any(|(_, t)| *t == track)
    }

    fn take(&mut self, track: FrameTrack) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(_, t)| *t != track);
        self.pending.len() != before
    }
}

/// Frames only fire when a test pumps them.
pub struct ManualScheduler(pub Rc<RefCell<Frames>>);

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self, track: FrameTrack) -> Option<FrameHandle> {
        let mut frames = self.0.borrow_mut();
        frames.next += 1;
        let handle = FrameHandle(frames.next);
        frames.pending.push((handle, track));
        Some(handle)
    }

    fn cancel(&mut self, handle: FrameHandle) {
        let mut frames = self.0.borrow_mut();
        frames.pending.retain(|(h, _)| *h != handle);
        frames.cancelled.push(handle);
    }
}

pub struct ManualClock(pub Rc<Cell<f64>>);

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

pub struct Rig {
    pub mascot: Mascot,
    pub ops: Rc<RefCell<Vec<String>>>,
    pub canvas: Rc<RefCell<CanvasState>>,
    pub frames: Rc<RefCell<Frames>>,
    pub clock: Rc<Cell<f64>>,
}

pub struct RigBuilder {
    config: MascotConfig,
    size: DVec2,
    dpr: f64,
    theme: Box<dyn ThemeProvider>,
    events: EventEmitter,
}

impl RigBuilder {
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = DVec2::new(width, height);
        self
    }

    pub fn dpr(mut self, dpr: f64) -> Self {
        self.dpr = dpr;
        self
    }

    pub fn config(mut self, f: impl FnOnce(&mut MascotConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn theme(mut self, theme: impl ThemeProvider + 'static) -> Self {
        self.theme = Box::new(theme);
        self
    }

    pub fn events(mut self, events: EventEmitter) -> Self {
        self.events = events;
        self
    }

    pub fn build(self) -> Rig {
        init_logging();
        let ops = Rc::new(RefCell::new(Vec::new()));
        let canvas = Rc::new(RefCell::new(CanvasState {
            client: self.size,
            dpr: self.dpr,
            backing: (0, 0),
            visible: false,
            transforms: Vec::new(),
        }));
        let frames = Rc::new(RefCell::new(Frames::default()));
        let clock = Rc::new(Cell::new(1_000.0));
        let host = Host {
            canvas: Box::new(FakeCanvas(canvas.clone())),
            context: Box::new(RecordingContext { ops: ops.clone() }),
            scheduler: Box::new(ManualScheduler(frames.clone())),
            clock: Box::new(ManualClock(clock.clone())),
            theme: self.theme,
        };
        let mascot = Mascot::with_events(self.config, host, self.events);
        Rig {
            mascot,
            ops,
            canvas,
            frames,
            clock,
        }
    }
}

pub fn rig() -> RigBuilder {
    RigBuilder {
        config: MascotConfig {
            seed: Some(7),
            ..Default::default()
        },
        size: DVec2::new(300.0, 300.0),
        dpr: 1.0,
        theme: Box::new(NoTheme),
        events: EventEmitter::new(),
    }
}

impl Rig {
    pub fn advance(&self, ms: f64) {
        self.clock.set(self.clock.get() + ms);
    }

    /// Fire the pending render frame, if any. Returns whether one fired.
    pub fn frame(&mut self) -> bool {
        self.advance(FRAME_MS);
        let fired = self.frames.borrow_mut().take(FrameTrack::Render);
        if fired {
            self.mascot.update_and_draw();
        }
        fired
    }

    pub fn frames(&mut self, n: usize) {
        for _ in 0..n {
            assert!(self.frame(), "render loop stopped");
        }
    }

    /// Fire the pending animation frame after `ms`, if any.
    pub fn animation_frame(&mut self, ms: f64) -> bool {
        self.advance(ms);
        let fired = self.frames.borrow_mut().take(FrameTrack::Animation);
        if fired {
            self.mascot.advance_animation();
        }
        fired
    }

    pub fn last_transform(&self) -> Option<Option<ElementTransform>> {
        self.canvas.borrow().transforms.last().copied()
    }
}

/// Listener that appends each event's name to a shared log.
pub fn event_log(
    log: &Rc<RefCell<Vec<String>>>,
) -> impl FnMut(&mascot_core::MascotEvent) -> anyhow::Result<()> {
    let log = log.clone();
    move |ev| {
        log.borrow_mut().push(ev.kind().to_string());
        Ok(())
    }
}
