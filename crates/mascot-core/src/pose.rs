//! Per-frame shape of the glow and the core.

use crate::constants::*;
use crate::{DrawContext, Gaze, MascotState, ThemeColors};
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Position within a cycle of `cycle_ms`, in [0, 1).
#[inline]
pub fn cycle_progress(anim_time: f64, cycle_ms: f64) -> f64 {
    if cycle_ms <= 0.0 {
        return 0.0;
    }
    (anim_time * 1000.0).rem_euclid(cycle_ms) / cycle_ms
}

/// Radius before breathing/pulsing: larger while connecting.
#[inline]
pub fn base_radius(state: &MascotState, radius: f64) -> f64 {
    if state.is_connecting() {
        radius * CONNECTING_RADIUS_SCALE
    } else {
        radius
    }
}

/// Inner and outer radius of the breathing outer glow.
pub fn glow_radii(state: &MascotState, radius: f64, breath: f64) -> (f64, f64) {
    let inner = base_radius(state, radius);
    let outer = inner * GLOW_OUTER_SCALE * (1.0 - (breath * TAU).sin() * GLOW_BREATH_AMOUNT);
    (inner, outer)
}

pub fn draw_glow(
    ctx: &mut dyn DrawContext,
    center: DVec2,
    state: &MascotState,
    radius: f64,
    breath: f64,
    colors: &ThemeColors,
) {
    let (inner, outer) = glow_radii(state, radius, breath);
    ctx.fill_radial_glow(
        center,
        inner,
        outer,
        &colors.primary_rgba(GLOW_INNER_ALPHA),
        &colors.primary_rgba(0.0),
    );
}

pub struct PoseInputs<'a> {
    pub state: &'a MascotState,
    pub gaze: &'a Gaze,
    pub radius: f64,
    pub breath: f64,
    pub anim_time: f64,
    pub now_ms: f64,
    /// Milliseconds since the current blink began, if blinking.
    pub blink_elapsed_ms: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorePose {
    pub center: DVec2,
    pub rotation: f64,
    pub scale: DVec2,
    /// Drawn radius in the local (scaled) frame.
    pub size: f64,
    pub alpha: f64,
}

impl CorePose {
    pub fn compute(i: &PoseInputs<'_>) -> Self {
        let gaze = i.gaze;
        let mut radius = base_radius(i.state, i.radius);
        if i.state.is_idle() && !gaze.locked {
            radius *= 1.0 + (i.breath * TAU).sin() * CORE_BREATH_AMOUNT;
        }
        if gaze.locked {
            let pulse = cycle_progress(i.anim_time, CORE_LOCK_PULSE_MS);
            radius *= 1.0 + (pulse * TAU).sin() * CORE_LOCK_PULSE_AMOUNT;
        }

        let mut rotation = 0.0;
        if gaze.intensity > CORE_ROTATE_THRESHOLD && !gaze.locked {
            let d = gaze.look_target - gaze.position;
            rotation = d.y.atan2(d.x) + FRAC_PI_2;
        }

        let scale = match i.blink_elapsed_ms {
            Some(elapsed) => {
                let progress = (elapsed / BLINK_DURATION_MS).min(1.0);
                let eased = (progress * PI).sin();
                DVec2::new(1.0 + eased * CORE_BLINK_STRETCH_X, 1.0 - eased)
            }
            None => DVec2::new(
                1.0 + CORE_STRETCH_X * gaze.intensity,
                1.0 - CORE_SQUASH_Y * gaze.intensity,
            ),
        };

        let size = if i.state.is_speaking() {
            radius * (CORE_TALK_BASE + (i.anim_time * CORE_TALK_FREQ).sin() * CORE_TALK_AMOUNT)
        } else {
            radius
        };

        Self {
            center: gaze.position,
            rotation,
            scale,
            size,
            alpha: CORE_ALPHA_BASE + (i.now_ms / CORE_ALPHA_PERIOD_MS).sin() * CORE_ALPHA_AMOUNT,
        }
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, colors: &ThemeColors) {
        ctx.save();
        ctx.translate(self.center.x, self.center.y);
        ctx.rotate(self.rotation);
        ctx.scale(self.scale.x, self.scale.y);
        ctx.set_shadow(&colors.core, CORE_SHADOW_BLUR);
        ctx.set_global_alpha(self.alpha);
        ctx.fill_circle(DVec2::ZERO, self.size, &colors.core);
        ctx.set_global_alpha(1.0);
        ctx.restore();
        ctx.set_shadow(&colors.core, 0.0);
    }
}
