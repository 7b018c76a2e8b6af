//! The mascot controller: owns all per-frame state and drives the render loop
//! and the active one-shot animation through the host's frame scheduler.

use crate::constants::*;
use crate::{
    cycle_progress, draw_glow, Animation, AnimationContext, AnimationParams, AnimationRegistry,
    CanvasElement, Clock, CorePose, DrawContext, Emission, EventEmitter, EventKind, FrameHandle,
    FrameScheduler, FrameTrack, Gaze, ListenerId, MascotConfig, MascotEvent, MascotSnapshot,
    MascotState, ParticleField, Pointer, PoseInputs, Progress, SpeechRings, ThemeColors,
    ThemeProvider,
};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Everything the controller needs from its environment.
pub struct Host {
    pub canvas: Box<dyn CanvasElement>,
    pub context: Box<dyn DrawContext>,
    pub scheduler: Box<dyn FrameScheduler>,
    pub clock: Box<dyn Clock>,
    pub theme: Box<dyn ThemeProvider>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnimationOutcome {
    Completed,
    Failed(String),
    /// Cut short by `stop` or `destroy`.
    Cancelled,
}

/// Immediate answer to a `run_animation` request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The routine ran (or is running); the completion callback will fire.
    Started,
    /// Another one-shot animation is active; request dropped.
    Busy,
    /// No animation registered under that name; request dropped.
    Unknown,
}

pub type CompletionFn = Box<dyn FnOnce(AnimationOutcome)>;

struct ActiveAnimation {
    name: String,
    duration: f64,
    routine: Box<dyn Animation>,
    started_ms: f64,
    on_done: Option<CompletionFn>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Blink {
    active: bool,
    started_ms: f64,
    next_ms: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct Twitch {
    active: bool,
    started_ms: f64,
    next_ms: f64,
}

pub struct Mascot {
    config: MascotConfig,
    canvas: Option<Box<dyn CanvasElement>>,
    context: Option<Box<dyn DrawContext>>,
    scheduler: Box<dyn FrameScheduler>,
    clock: Box<dyn Clock>,
    theme: Box<dyn ThemeProvider>,
    rng: StdRng,
    events: EventEmitter,
    animations: AnimationRegistry,
    colors: ThemeColors,

    state: MascotState,
    size: DVec2,
    backing: DVec2,
    center: DVec2,
    radius: f64,
    pointer: Pointer,
    gaze: Gaze,
    particles: ParticleField,
    rings: SpeechRings,

    anim_time: f64,
    last_frame_ms: Option<f64>,
    blink: Blink,
    twitch: Twitch,

    render_frame: Option<FrameHandle>,
    animation_frame: Option<FrameHandle>,
    active: Option<ActiveAnimation>,
}

impl Mascot {
    pub fn new(config: MascotConfig, host: Host) -> Self {
        Self::with_events(config, host, EventEmitter::new())
    }

    /// Like [`Mascot::new`], with listeners registered up front so they can
    /// observe `init`.
    pub fn with_events(config: MascotConfig, host: Host, events: EventEmitter) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let first_blink = FIRST_BLINK_MIN_MS + rng.gen::<f64>() * BLINK_INTERVAL_SPAN_MS;
        let mut mascot = Self {
            config,
            canvas: Some(host.canvas),
            context: Some(host.context),
            scheduler: host.scheduler,
            clock: host.clock,
            theme: host.theme,
            rng,
            events,
            animations: AnimationRegistry::with_builtins(),
            colors: ThemeColors::default(),
            state: MascotState::Idle,
            size: DVec2::ZERO,
            backing: DVec2::ZERO,
            center: DVec2::ZERO,
            radius: DEFAULT_RADIUS,
            pointer: Pointer::default(),
            gaze: Gaze::default(),
            particles: ParticleField::default(),
            rings: SpeechRings::default(),
            anim_time: 0.0,
            last_frame_ms: None,
            blink: Blink {
                next_ms: first_blink,
                ..Default::default()
            },
            twitch: Twitch::default(),
            render_frame: None,
            animation_frame: None,
            active: None,
        };
        mascot.refresh_colors();
        mascot.resize();
        log::info!(
            "[mascot] init {}x{} radius={:.1}",
            mascot.size.x,
            mascot.size.y,
            mascot.radius
        );
        let snapshot = mascot.snapshot();
        mascot.events.emit(&MascotEvent::Init(snapshot));
        mascot
    }

    // --- theming & sizing ---

    pub fn refresh_colors(&mut self) {
        self.colors = ThemeColors::resolve(self.config.colors.as_ref(), self.theme.as_ref());
    }

    /// Match the backing store to the displayed size and recentre everything.
    pub fn resize(&mut self) {
        let Some(canvas) = self.canvas.as_deref_mut() else {
            return;
        };
        let client = canvas.client_size();
        let mut dpr = canvas.device_pixel_ratio();
        if dpr.is_nan() || dpr <= 0.0 {
            dpr = 1.0;
        }
        let backing = client * dpr;
        canvas.set_backing_size(backing.x.max(0.0) as u32, backing.y.max(0.0) as u32);
        if let Some(ctx) = self.context.as_deref_mut() {
            ctx.scale(dpr, dpr);
        }
        self.size = client;
        self.backing = backing;
        self.center = client / 2.0;
        self.radius = client.x.min(client.y) / RADIUS_DIVISOR;
        self.gaze.position = self.center;
        self.pointer.position = self.center;
    }

    // --- lifecycle ---

    pub fn start(&mut self) {
        if self.render_frame.is_some() {
            return;
        }
        self.refresh_colors();
        self.resize();
        if let Some(canvas) = self.canvas.as_deref_mut() {
            canvas.set_visible(true);
        }
        self.update_and_draw();
        log::info!("[mascot] started");
        self.events.emit(&MascotEvent::Start);
    }

    /// Cancel pending frames on both tracks, hide the canvas and emit `stop`.
    /// An in-flight one-shot animation completes as cancelled.
    pub fn stop(&mut self) {
        if let Some(handle) = self.render_frame.take() {
            self.scheduler.cancel(handle);
        }
        self.cancel_animation();
        if let Some(canvas) = self.canvas.as_deref_mut() {
            canvas.set_visible(false);
        }
        log::info!("[mascot] stopped");
        self.events.emit(&MascotEvent::Stop);
    }

    /// Stop, release the canvas and drop every listener. The instance is inert
    /// afterwards.
    pub fn destroy(&mut self) {
        self.stop();
        self.canvas = None;
        self.context = None;
        self.events.clear();
        self.events.emit(&MascotEvent::Destroy);
        log::info!("[mascot] destroyed");
    }

    pub fn set_state(&mut self, state: impl Into<MascotState>) {
        let new_state = state.into();
        if new_state == self.state {
            return;
        }
        let old_state = std::mem::replace(&mut self.state, new_state.clone());
        log::debug!("[mascot] state {} -> {}", old_state, new_state);
        self.events.emit(&MascotEvent::StateChange {
            old_state,
            new_state,
        });
    }

    // --- events ---

    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&MascotEvent) -> anyhow::Result<()> + 'static,
    {
        self.events.on(kind, listener)
    }

    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.events.off(kind, id)
    }

    // --- pointer input ---

    pub fn pointer_enter(&mut self) {
        self.pointer.active = true;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.active = false;
        self.gaze.locked = false;
    }

    pub fn pointer_move(&mut self, position: DVec2) {
        self.pointer.position = position;
    }

    pub fn touch_start(&mut self, position: DVec2) {
        self.pointer.active = true;
        self.pointer.position = position;
    }

    pub fn touch_move(&mut self, position: DVec2) {
        if self.pointer.active {
            self.pointer.position = position;
        }
    }

    // --- render loop ---

    /// One frame: advance physics, draw, and schedule the next frame.
    pub fn update_and_draw(&mut self) {
        self.render_frame = None;
        let Some(mut ctx) = self.context.take() else {
            return;
        };
        let now = self.clock.now_ms();
        self.advance_clock(now);
        self.update_twitch(now);

        let connecting = self.state.is_connecting();
        if connecting {
            self.gaze.jitter(CONNECTING_JITTER, &mut self.rng);
        }
        if connecting || (self.state.is_idle() && self.rng.gen::<f64>() < IDLE_SPAWN_PROBABILITY) {
            let emission = Emission::single(&self.colors.primary, connecting);
            self.particles.emit(&mut self.rng, self.center, &emission);
        }

        ctx.clear_rect(0.0, 0.0, self.backing.x, self.backing.y);

        self.update_blink(now);
        self.gaze.track(&self.pointer, self.radius, self.size.x);
        self.gaze.follow(self.center, self.anim_time);
        self.gaze
            .clamp_to(self.size, self.radius * GAZE_MARGIN_RADII);

        self.particles.step(self.gaze.position, connecting, &mut self.rng);
        self.particles.draw(ctx.as_mut());

        let breath = cycle_progress(self.anim_time, self.config.idle_breath_cycle);
        draw_glow(
            ctx.as_mut(),
            self.gaze.position,
            &self.state,
            self.radius,
            breath,
            &self.colors,
        );

        if self.rings.update(
            self.state.is_speaking(),
            self.anim_time,
            self.radius,
            &mut self.rng,
        ) {
            self.rings
                .draw(ctx.as_mut(), self.gaze.position, self.anim_time, &self.colors);
        }

        let pose = CorePose::compute(&PoseInputs {
            state: &self.state,
            gaze: &self.gaze,
            radius: self.radius,
            breath,
            anim_time: self.anim_time,
            now_ms: now,
            blink_elapsed_ms: self.blink.active.then(|| now - self.blink.started_ms),
        });
        pose.draw(ctx.as_mut(), &self.colors);

        self.context = Some(ctx);
        self.render_frame = self.scheduler.schedule(FrameTrack::Render);
        if self.render_frame.is_none() {
            log::warn!("[mascot] could not schedule next frame; loop halted");
        }
    }

    fn advance_clock(&mut self, now: f64) {
        let step = match (self.config.frame_rate_independent, self.last_frame_ms) {
            (true, Some(last)) => {
                let elapsed = (now - last).clamp(0.0, MAX_MEASURED_FRAME_MS);
                ANIM_TIME_STEP * elapsed / NOMINAL_FRAME_MS
            }
            _ => ANIM_TIME_STEP,
        };
        self.anim_time += step;
        self.last_frame_ms = Some(now);
    }

    fn update_twitch(&mut self, now: f64) {
        if self.config.enable_twitching
            && self.state.is_idle()
            && now > self.twitch.next_ms
            && !self.twitch.active
        {
            self.twitch.active = true;
            self.twitch.started_ms = now;
            self.twitch.next_ms =
                now + TWITCH_INTERVAL_MIN_MS + self.rng.gen::<f64>() * TWITCH_INTERVAL_SPAN_MS;
        }
        if self.twitch.active {
            if now - self.twitch.started_ms > TWITCH_DURATION_MS {
                self.twitch.active = false;
            } else {
                self.gaze.jitter(TWITCH_JITTER, &mut self.rng);
            }
        }
    }

    fn update_blink(&mut self, now: f64) {
        if now > self.blink.next_ms && !self.blink.active {
            self.blink.active = true;
            self.blink.started_ms = now;
            self.blink.next_ms = now
                + BLINK_DURATION_MS
                + BLINK_INTERVAL_MIN_MS
                + self.rng.gen::<f64>() * BLINK_INTERVAL_SPAN_MS;
        }
        if self.blink.active && now > self.blink.started_ms + BLINK_DURATION_MS {
            self.blink.active = false;
        }
    }

    // --- one-shot animations ---

    pub fn register_animation<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn(f64, &AnimationParams) -> anyhow::Result<Box<dyn Animation>> + 'static,
    {
        self.animations.register(name, factory);
        self
    }

    /// Play `name` exclusively. Dropped while another animation runs or when
    /// `name` is unknown; otherwise `on_done` fires exactly once when the run
    /// ends, however it ends.
    pub fn run_animation<F>(&mut self, name: &str, params: AnimationParams, on_done: F) -> RunOutcome
    where
        F: FnOnce(AnimationOutcome) + 'static,
    {
        if self.active.is_some() {
            log::debug!("[mascot] animation '{}' dropped: another is running", name);
            return RunOutcome::Busy;
        }
        let Some(factory) = self.animations.get(name) else {
            log::warn!("OsmosMascot: Animation '{}' not found.", name);
            return RunOutcome::Unknown;
        };
        let duration = self.config.animation_duration;
        let routine = match factory(duration, &params) {
            Ok(r) => r,
            Err(e) => {
                log::error!("[mascot] animation '{}' failed to build: {:#}", name, e);
                on_done(AnimationOutcome::Failed(e.to_string()));
                return RunOutcome::Started;
            }
        };
        self.active = Some(ActiveAnimation {
            name: name.to_string(),
            duration,
            routine,
            started_ms: self.clock.now_ms(),
            on_done: Some(Box::new(on_done)),
        });
        self.events.emit(&MascotEvent::AnimationStart {
            kind: name.to_string(),
            duration,
        });
        self.drive_animation(None);
        RunOutcome::Started
    }

    /// Animation-track frame callback.
    pub fn advance_animation(&mut self) {
        self.animation_frame = None;
        if self.active.is_some() {
            let now = self.clock.now_ms();
            self.drive_animation(Some(now));
        }
    }

    /// `None` runs `begin`; `Some(now)` runs one `step`.
    fn drive_animation(&mut self, now: Option<f64>) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let result = {
            let mut cx = self.animation_context();
            match now {
                None => active.routine.begin(&mut cx),
                Some(now) => active.routine.step(&mut cx, now - active.started_ms),
            }
        };
        match result {
            Ok(Progress::Running) => {
                self.active = Some(active);
                self.animation_frame = self.scheduler.schedule(FrameTrack::Animation);
                if self.animation_frame.is_none() {
                    log::warn!("[mascot] could not schedule animation frame");
                    self.cancel_animation();
                }
            }
            Ok(Progress::Done) => {
                self.events.emit(&MascotEvent::AnimationEnd {
                    kind: active.name.clone(),
                    duration: active.duration,
                });
                self.finish(active, AnimationOutcome::Completed);
            }
            Err(e) => {
                log::error!("[mascot] animation '{}' failed: {:#}", active.name, e);
                active.routine.cancel(&mut self.animation_context());
                self.finish(active, AnimationOutcome::Failed(e.to_string()));
            }
        }
    }

    fn cancel_animation(&mut self) {
        if let Some(handle) = self.animation_frame.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(mut active) = self.active.take() {
            log::debug!("[mascot] animation '{}' cancelled", active.name);
            active.routine.cancel(&mut self.animation_context());
            self.finish(active, AnimationOutcome::Cancelled);
        }
    }

    fn finish(&mut self, mut active: ActiveAnimation, outcome: AnimationOutcome) {
        debug_assert!(self.active.is_none());
        if let Some(done) = active.on_done.take() {
            done(outcome);
        }
    }

    fn animation_context(&mut self) -> AnimationContext<'_> {
        AnimationContext {
            rng: &mut self.rng,
            particles: &mut self.particles,
            element: self
                .canvas
                .as_deref_mut()
                .map(|c| c as &mut dyn CanvasElement),
            colors: &self.colors,
            center: self.center,
            state: &self.state,
        }
    }

    // --- accessors ---

    pub fn snapshot(&self) -> MascotSnapshot {
        MascotSnapshot {
            size: self.size,
            center: self.center,
            radius: self.radius,
        }
    }

    pub fn config(&self) -> &MascotConfig {
        &self.config
    }

    pub fn state(&self) -> &MascotState {
        &self.state
    }

    pub fn colors(&self) -> &ThemeColors {
        &self.colors
    }

    pub fn is_running(&self) -> bool {
        self.render_frame.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_gaze_locked(&self) -> bool {
        self.gaze.locked
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.active
    }

    pub fn is_twitching(&self) -> bool {
        self.twitch.active
    }

    pub fn gaze_position(&self) -> DVec2 {
        self.gaze.position
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn speech_ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn gaze(&self) -> &Gaze {
        &self.gaze
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn speech_rings(&self) -> &SpeechRings {
        &self.rings
    }

    pub fn anim_time(&self) -> f64 {
        self.anim_time
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn animations(&self) -> &AnimationRegistry {
        &self.animations
    }
}

/// Pending frames point back into the owner of this mascot; never let one
/// fire after it is gone.
impl Drop for Mascot {
    fn drop(&mut self) {
        for handle in [self.render_frame.take(), self.animation_frame.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
    }
}
