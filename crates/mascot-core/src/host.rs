//! Seams between the controller and its environment.
//!
//! These traits intentionally avoid referencing platform-specific APIs. The
//! web front end implements them over `web-sys`; tests implement them with
//! recording fakes.

use glam::DVec2;
use instant::Instant;
use std::fmt;

/// The subset of a 2D drawing context the mascot draws with.
pub trait DrawContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &str);
    /// Fill a disc of radius `outer` with a radial gradient running from
    /// `inner_color` at `inner` to `outer_color` at `outer`.
    fn fill_radial_glow(
        &mut self,
        center: DVec2,
        inner: f64,
        outer: f64,
        inner_color: &str,
        outer_color: &str,
    );
    fn stroke_closed_path(&mut self, points: &[DVec2], stroke: &str, line_width: f64);
    fn set_shadow(&mut self, color: &str, blur: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, x: f64, y: f64);
}

/// The element the mascot draws into, as opposed to its drawing context.
pub trait CanvasElement {
    /// Displayed size in CSS pixels.
    fn client_size(&self) -> DVec2;
    fn device_pixel_ratio(&self) -> f64;
    fn set_backing_size(&mut self, width: u32, height: u32);
    fn set_visible(&mut self, visible: bool);
    /// Element-level transform; `None` clears it.
    fn set_transform(&mut self, transform: Option<ElementTransform>);
}

/// CSS transform applied to the canvas element by one-shot animations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementTransform {
    pub scale: Option<f64>,
    pub rotate_deg: f64,
}

impl ElementTransform {
    pub fn rotate(deg: f64) -> Self {
        Self {
            scale: None,
            rotate_deg: deg,
        }
    }

    pub fn scale_rotate(scale: f64, deg: f64) -> Self {
        Self {
            scale: Some(scale),
            rotate_deg: deg,
        }
    }
}

impl fmt::Display for ElementTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.scale {
            write!(f, "scale({}) ", s)?;
        }
        write!(f, "rotate({}deg)", self.rotate_deg)
    }
}

/// Which self-rescheduling loop a frame request belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameTrack {
    /// The main update-and-draw loop.
    Render,
    /// The active one-shot animation.
    Animation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// "Call me back on the next display refresh."
///
/// When the frame fires, the host calls [`crate::Mascot::update_and_draw`]
/// for [`FrameTrack::Render`] or [`crate::Mascot::advance_animation`] for
/// [`FrameTrack::Animation`].
pub trait FrameScheduler {
    /// Returns `None` when the host could not schedule the frame.
    fn schedule(&mut self, track: FrameTrack) -> Option<FrameHandle>;
    fn cancel(&mut self, handle: FrameHandle);
}

/// Monotonic milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    origin: Instant,
}

impl Default for InstantClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
