//! One-shot animations.
//!
//! An animation is a small routine driven one display frame at a time: the
//! controller calls [`Animation::begin`] once, then [`Animation::step`] on
//! every animation frame until it reports [`Progress::Done`]. Routines are
//! created per run by a factory registered under a name.

use crate::constants::*;
use crate::{CanvasElement, ElementTransform, Emission, MascotState, ParticleField, ThemeColors};
use fnv::FnvHashMap;
use glam::DVec2;
use rand::rngs::StdRng;
use rand::Rng;
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

pub const THINKING: &str = "thinking";
pub const SPARKLE: &str = "sparkle";
pub const WOBBLE: &str = "wobble";

/// Caller-supplied parameters, passed through untouched to the routine.
pub type AnimationParams = serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Running,
    Done,
}

/// What a routine may touch while it runs.
pub struct AnimationContext<'a> {
    pub rng: &'a mut StdRng,
    pub particles: &'a mut ParticleField,
    pub element: Option<&'a mut dyn CanvasElement>,
    pub colors: &'a ThemeColors,
    pub center: DVec2,
    pub state: &'a MascotState,
}

impl AnimationContext<'_> {
    pub fn set_transform(&mut self, transform: Option<ElementTransform>) {
        if let Some(el) = self.element.as_deref_mut() {
            el.set_transform(transform);
        }
    }

    pub fn emit_particles(&mut self, emission: &Emission) {
        self.particles.emit(&mut *self.rng, self.center, emission);
    }
}

pub trait Animation {
    fn begin(&mut self, _cx: &mut AnimationContext<'_>) -> anyhow::Result<Progress> {
        Ok(Progress::Running)
    }

    /// `elapsed_ms` is measured from `begin`.
    fn step(&mut self, cx: &mut AnimationContext<'_>, elapsed_ms: f64) -> anyhow::Result<Progress>;

    /// Undo any visible side effect when the run is cut short or fails.
    fn cancel(&mut self, cx: &mut AnimationContext<'_>) {
        cx.set_transform(None);
    }
}

/// Builds a fresh routine for one run from `(duration_ms, params)`.
pub type AnimationFactory =
    Rc<dyn Fn(f64, &AnimationParams) -> anyhow::Result<Box<dyn Animation>>>;

#[derive(Clone, Default)]
pub struct AnimationRegistry {
    entries: FnvHashMap<String, AnimationFactory>,
}

impl AnimationRegistry {
    pub fn with_builtins() -> Self {
        let mut reg = Self::default();
        reg.register(THINKING, |duration, _| Ok(Box::new(Thinking::new(duration))))
            .register(SPARKLE, |_, _| Ok(Box::new(Sparkle)))
            .register(WOBBLE, |duration, _| Ok(Box::new(Wobble { duration })));
        reg
    }

    /// Add or replace the factory for `name`.
    pub fn register<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn(f64, &AnimationParams) -> anyhow::Result<Box<dyn Animation>> + 'static,
    {
        self.entries.insert(name.to_string(), Rc::new(factory));
        self
    }

    pub fn get(&self, name: &str) -> Option<AnimationFactory> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[inline]
fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// Swell and spin: scale arcs up to a random peak and back while the element
/// eases out (cubic) into a random rotation.
#[derive(Clone, Debug)]
pub struct Thinking {
    duration: f64,
    peak_scale: f64,
    rotation_deg: f64,
}

impl Thinking {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            peak_scale: THINKING_SCALE_MIN,
            rotation_deg: THINKING_ROTATION_MIN_DEG,
        }
    }

    pub fn transform_at(&self, p: f64) -> ElementTransform {
        ElementTransform::scale_rotate(
            1.0 + (self.peak_scale - 1.0) * (p * PI).sin(),
            self.rotation_deg * ease_out_cubic(p),
        )
    }
}

#[inline]
fn ease_out_cubic(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}

impl Animation for Thinking {
    fn begin(&mut self, cx: &mut AnimationContext<'_>) -> anyhow::Result<Progress> {
        self.peak_scale = THINKING_SCALE_MIN + cx.rng.gen::<f64>() * THINKING_SCALE_SPAN;
        let sign = if cx.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.rotation_deg =
            sign * (THINKING_ROTATION_MIN_DEG + cx.rng.gen::<f64>() * THINKING_ROTATION_SPAN_DEG);
        Ok(Progress::Running)
    }

    fn step(&mut self, cx: &mut AnimationContext<'_>, elapsed_ms: f64) -> anyhow::Result<Progress> {
        let p = progress(elapsed_ms, self.duration);
        if p < 1.0 {
            cx.set_transform(Some(self.transform_at(p)));
            Ok(Progress::Running)
        } else {
            cx.set_transform(None);
            Ok(Progress::Done)
        }
    }
}

/// Instant particle burst; finishes in `begin`.
#[derive(Clone, Copy, Debug)]
pub struct Sparkle;

impl Animation for Sparkle {
    fn begin(&mut self, cx: &mut AnimationContext<'_>) -> anyhow::Result<Progress> {
        let count = (SPARKLE_COUNT_MIN + cx.rng.gen::<f64>() * SPARKLE_COUNT_SPAN).ceil() as usize;
        let speed_multiplier = SPARKLE_SPEED_MIN + cx.rng.gen::<f64>() * SPARKLE_SPEED_SPAN;
        let life_decay = SPARKLE_DECAY_MIN + cx.rng.gen::<f64>() * SPARKLE_DECAY_SPAN;
        let color = if cx.rng.gen_bool(SPARKLE_SECONDARY_CHANCE) {
            cx.colors.secondary_rgba(SPARKLE_SECONDARY_ALPHA)
        } else {
            cx.colors.primary.clone()
        };
        let emission = Emission {
            count,
            speed_multiplier,
            life_decay,
            color,
            connecting: cx.state.is_connecting(),
        };
        cx.emit_particles(&emission);
        Ok(Progress::Done)
    }

    fn step(&mut self, _cx: &mut AnimationContext<'_>, _elapsed_ms: f64) -> anyhow::Result<Progress> {
        Ok(Progress::Done)
    }
}

/// Two full side-to-side rocks of the element.
#[derive(Clone, Copy, Debug)]
pub struct Wobble {
    pub duration: f64,
}

impl Wobble {
    pub fn angle_at(p: f64) -> f64 {
        WOBBLE_AMPLITUDE_DEG * (p * PI * 2.0 * WOBBLE_OSCILLATIONS).sin()
    }
}

impl Animation for Wobble {
    fn step(&mut self, cx: &mut AnimationContext<'_>, elapsed_ms: f64) -> anyhow::Result<Progress> {
        let p = progress(elapsed_ms, self.duration);
        if p < 1.0 {
            cx.set_transform(Some(ElementTransform::rotate(Self::angle_at(p))));
            Ok(Progress::Running)
        } else {
            cx.set_transform(None);
            Ok(Progress::Done)
        }
    }
}

#[derive(Debug, Default)]
struct SettleState {
    outcome: Option<Result<(), String>>,
    cancelled: bool,
}

/// Completion slot shared between an [`ExternalAnimation`] and the work it
/// stands for. The first `resolve`/`reject` wins; later ones are ignored, as
/// is anything after the run was cancelled.
#[derive(Clone, Debug, Default)]
pub struct Settlement(Rc<RefCell<SettleState>>);

impl Settlement {
    pub fn resolve(&self) {
        self.settle(Ok(()));
    }

    pub fn reject(&self, reason: impl Into<String>) {
        self.settle(Err(reason.into()));
    }

    /// Set once the controller abandoned the run (stop, destroy, failure).
    pub fn is_cancelled(&self) -> bool {
        self.0.borrow().cancelled
    }

    fn settle(&self, outcome: Result<(), String>) {
        let mut state = self.0.borrow_mut();
        if state.outcome.is_none() && !state.cancelled {
            state.outcome = Some(outcome);
        }
    }

    fn take(&self) -> Option<Result<(), String>> {
        self.0.borrow_mut().outcome.take()
    }
}

/// A run whose work happens outside the controller, e.g. a script routine
/// started after the current call returns. Polled once per animation frame
/// until its [`Settlement`] is resolved or rejected.
pub struct ExternalAnimation {
    settlement: Settlement,
}

impl ExternalAnimation {
    pub fn new(settlement: Settlement) -> Self {
        Self { settlement }
    }
}

impl Animation for ExternalAnimation {
    fn step(&mut self, _cx: &mut AnimationContext<'_>, _elapsed_ms: f64) -> anyhow::Result<Progress> {
        match self.settlement.take() {
            None => Ok(Progress::Running),
            Some(Ok(())) => Ok(Progress::Done),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
        }
    }

    fn cancel(&mut self, cx: &mut AnimationContext<'_>) {
        self.settlement.0.borrow_mut().cancelled = true;
        cx.set_transform(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Element {
        transforms: Vec<Option<ElementTransform>>,
    }

    impl CanvasElement for Element {
        fn client_size(&self) -> DVec2 {
            DVec2::new(300.0, 300.0)
        }
        fn device_pixel_ratio(&self) -> f64 {
            1.0
        }
        fn set_backing_size(&mut self, _width: u32, _height: u32) {}
        fn set_visible(&mut self, _visible: bool) {}
        fn set_transform(&mut self, transform: Option<ElementTransform>) {
            self.transforms.push(transform);
        }
    }

    struct Parts {
        rng: StdRng,
        particles: ParticleField,
        element: Element,
        colors: ThemeColors,
        state: MascotState,
    }

    impl Parts {
        fn new() -> Self {
            Self {
                rng: StdRng::seed_from_u64(99),
                particles: ParticleField::default(),
                element: Element::default(),
                colors: ThemeColors::default(),
                state: MascotState::Idle,
            }
        }

        fn cx(&mut self) -> AnimationContext<'_> {
            AnimationContext {
                rng: &mut self.rng,
                particles: &mut self.particles,
                element: Some(&mut self.element),
                colors: &self.colors,
                center: DVec2::new(150.0, 150.0),
                state: &self.state,
            }
        }
    }

    #[test]
    fn builtins_are_registered() {
        let reg = AnimationRegistry::with_builtins();
        for name in [THINKING, SPARKLE, WOBBLE] {
            assert!(reg.contains(name));
        }
        assert!(!reg.contains("dance"));
    }

    #[test]
    fn sparkle_bursts_and_finishes_immediately() {
        let mut parts = Parts::new();
        let mut sparkle = Sparkle;
        let done = sparkle.begin(&mut parts.cx()).unwrap();
        assert_eq!(done, Progress::Done);
        assert!((15..=50).contains(&parts.particles.len()));
        assert!(parts.element.transforms.is_empty());
    }

    #[test]
    fn thinking_peaks_mid_way_and_resets() {
        let mut parts = Parts::new();
        let mut thinking = Thinking::new(500.0);
        thinking.begin(&mut parts.cx()).unwrap();
        assert!((1.15..=1.35).contains(&thinking.peak_scale));
        assert!((270.0..=450.0).contains(&thinking.rotation_deg.abs()));

        let mid = thinking.transform_at(0.5);
        assert!((mid.scale.unwrap() - thinking.peak_scale).abs() < 1e-12);
        assert!((mid.rotate_deg - thinking.rotation_deg * 0.875).abs() < 1e-9);
        let end = thinking.transform_at(1.0);
        assert!((end.rotate_deg - thinking.rotation_deg).abs() < 1e-9);

        assert_eq!(
            thinking.step(&mut parts.cx(), 250.0).unwrap(),
            Progress::Running
        );
        assert_eq!(thinking.step(&mut parts.cx(), 600.0).unwrap(), Progress::Done);
        assert_eq!(parts.element.transforms.last(), Some(&None));
    }

    #[test]
    fn wobble_swings_twice_within_twenty_degrees() {
        let mut crossings = 0;
        let mut prev = Wobble::angle_at(0.001);
        for i in 2..1000 {
            let a = Wobble::angle_at(i as f64 / 1000.0);
            assert!(a.abs() <= 20.0 + 1e-9);
            if a.signum() != prev.signum() {
                crossings += 1;
            }
            prev = a;
        }
        assert_eq!(crossings, 3);

        let mut parts = Parts::new();
        let mut wobble = Wobble { duration: 400.0 };
        assert_eq!(wobble.step(&mut parts.cx(), 100.0).unwrap(), Progress::Running);
        assert_eq!(wobble.step(&mut parts.cx(), 400.0).unwrap(), Progress::Done);
        assert_eq!(parts.element.transforms.last(), Some(&None));
    }

    #[test]
    fn register_replaces_and_chains() {
        let mut reg = AnimationRegistry::default();
        reg.register("a", |_, _| Ok(Box::new(Sparkle)))
            .register("b", |_, _| anyhow::bail!("not today"));
        assert!(reg.contains("a"));
        let factory = reg.get("b").unwrap();
        assert!(factory(100.0, &AnimationParams::Null).is_err());
    }
}
