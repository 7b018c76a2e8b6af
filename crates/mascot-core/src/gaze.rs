//! Pointer tracking and the eased gaze point.

use crate::constants::*;
use glam::DVec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    /// Canvas-local CSS pixels.
    pub position: DVec2,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gaze {
    pub position: DVec2,
    pub look_target: DVec2,
    /// How strongly the core leans toward a nearby, unlocked pointer, in [0, 1].
    pub intensity: f64,
    pub locked: bool,
}

/// True exactly when the pointer is active and strictly inside `radius` of `gaze`.
#[inline]
pub fn is_gaze_locked(pointer: &Pointer, gaze: DVec2, radius: f64) -> bool {
    pointer.active && pointer.position.distance(gaze) < radius
}

/// Proximity weight: 1 at the core's rim, 0 half a canvas width beyond it.
#[inline]
pub fn proximity_intensity(distance: f64, radius: f64, canvas_width: f64) -> f64 {
    let reach = canvas_width / 2.0;
    if reach <= 0.0 {
        return 0.0;
    }
    (1.0 - (distance - radius) / reach).max(0.0)
}

impl Gaze {
    pub fn jitter(&mut self, amount: f64, rng: &mut impl Rng) {
        self.position.x += (rng.gen::<f64>() - 0.5) * amount;
        self.position.y += (rng.gen::<f64>() - 0.5) * amount;
    }

    /// Update lock, intensity and look target from the pointer.
    pub fn track(&mut self, pointer: &Pointer, radius: f64, canvas_width: f64) {
        let distance = pointer.position.distance(self.position);
        self.locked = is_gaze_locked(pointer, self.position, radius);

        let mut target_intensity = 0.0;
        if pointer.active && !self.locked {
            target_intensity = proximity_intensity(distance, radius, canvas_width);
            self.look_target = pointer.position;
        }
        self.intensity += (target_intensity - self.intensity) * GAZE_INTENSITY_BLEND;
    }

    /// Ease toward the look target (partially, from `center`) and add idle drift.
    pub fn follow(&mut self, center: DVec2, anim_time: f64) {
        let target = center + (self.look_target - center) * GAZE_REACH;
        self.position += (target - self.position) * GAZE_FOLLOW_BLEND;
        self.position += DVec2::new(
            (anim_time * IDLE_DRIFT_FREQ_X).sin(),
            (anim_time * IDLE_DRIFT_FREQ_Y).cos(),
        ) * IDLE_DRIFT_AMOUNT;
    }

    /// Keep the gaze `margin` away from every edge of a `size` canvas.
    pub fn clamp_to(&mut self, size: DVec2, margin: f64) {
        self.position.x = self.position.x.min(size.x - margin).max(margin);
        self.position.y = self.position.y.min(size.y - margin).max(margin);
    }
}
