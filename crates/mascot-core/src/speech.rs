//! Expanding wavy rings drawn while the mascot "speaks".

use crate::constants::*;
use crate::{DrawContext, ThemeColors};
use glam::DVec2;
use rand::Rng;
use std::f64::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeechRing {
    pub radius: f64,
    pub life: f64,
    /// Random phase so neighbouring rings ripple out of step.
    pub phase: f64,
}

impl SpeechRing {
    /// Closed outline around `center`, sampled every `RING_ANGLE_STEP` radians.
    pub fn outline(&self, center: DVec2, anim_time: f64) -> Vec<DVec2> {
        let depth = self.radius / RING_WAVE_DEPTH_DIVISOR;
        let steps = (TAU / RING_ANGLE_STEP).ceil() as usize;
        (0..steps)
            .map(|i| {
                let angle = i as f64 * RING_ANGLE_STEP;
                let r = self.radius
                    + (angle * RING_WAVE_LOBES + anim_time * RING_WAVE_SPEED + self.phase).sin()
                        * depth;
                center + DVec2::new(angle.cos(), angle.sin()) * r
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SpeechRings {
    rings: Vec<SpeechRing>,
    last_spawn: f64,
    spawned: u64,
}

impl SpeechRings {
    /// Spawn (while speaking), grow and age rings. Returns whether anything is
    /// left to draw this frame.
    pub fn update(
        &mut self,
        speaking: bool,
        anim_time: f64,
        base_radius: f64,
        rng: &mut impl Rng,
    ) -> bool {
        if !speaking && self.rings.is_empty() {
            return false;
        }
        if speaking && anim_time > self.last_spawn + RING_SPAWN_INTERVAL {
            self.rings.push(SpeechRing {
                radius: base_radius,
                life: 1.0,
                phase: rng.gen::<f64>() * RING_PHASE_MAX,
            });
            self.last_spawn = anim_time;
            self.spawned += 1;
        }
        self.rings.retain_mut(|ring| {
            ring.radius += RING_GROWTH;
            ring.life -= RING_LIFE_DECAY;
            ring.life > 0.0
        });
        true
    }

    pub fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        center: DVec2,
        anim_time: f64,
        colors: &ThemeColors,
    ) {
        if self.rings.is_empty() {
            return;
        }
        let stroke = colors.primary_rgba(RING_STROKE_ALPHA);
        for ring in &self.rings {
            ctx.set_global_alpha(ring.life);
            ctx.stroke_closed_path(&ring.outline(center, anim_time), &stroke, RING_LINE_WIDTH);
        }
        ctx.set_global_alpha(1.0);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Rings created since construction, including expired ones.
    #[inline]
    pub fn total_spawned(&self) -> u64 {
        self.spawned
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeechRing> {
        self.rings.iter()
    }
}
