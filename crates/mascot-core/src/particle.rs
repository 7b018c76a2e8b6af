//! Particle field orbiting the gaze point.

use crate::constants::*;
use crate::DrawContext;
use glam::DVec2;
use rand::Rng;
use std::f64::consts::TAU;

/// A single particle with physics and rendering state.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    /// 1.0 at birth, removed at or below 0.
    pub life: f64,
    pub life_decay: f64,
    pub size: f64,
    pub color: String,
}

/// Knobs for a spawn burst.
#[derive(Clone, Debug, PartialEq)]
pub struct Emission {
    pub count: usize,
    pub speed_multiplier: f64,
    pub life_decay: f64,
    pub color: String,
    /// Faster, smaller-at-minimum particles while connecting.
    pub connecting: bool,
}

impl Emission {
    pub fn single(color: &str, connecting: bool) -> Self {
        Self {
            count: 1,
            speed_multiplier: 1.0,
            life_decay: PARTICLE_LIFE_DECAY,
            color: color.to_string(),
            connecting,
        }
    }
}

impl Particle {
    pub fn spawn(rng: &mut impl Rng, origin: DVec2, emission: &Emission) -> Self {
        let angle = rng.gen::<f64>() * TAU;
        let (speed_min, speed_span) = if emission.connecting {
            PARTICLE_SPEED_CONNECTING
        } else {
            PARTICLE_SPEED_IDLE
        };
        let (size_min, size_span) = if emission.connecting {
            PARTICLE_SIZE_CONNECTING
        } else {
            PARTICLE_SIZE_IDLE
        };
        let speed = (speed_min + rng.gen::<f64>() * speed_span) * emission.speed_multiplier;
        Self {
            position: origin,
            velocity: DVec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            life_decay: emission.life_decay,
            size: size_min + rng.gen::<f64>() * size_span,
            color: emission.color.clone(),
        }
    }

    /// Advance one frame. Returns false once expired.
    pub fn tick(&mut self, attractor: DVec2, pull: f64, chaos: f64, rng: &mut impl Rng) -> bool {
        self.velocity *= PARTICLE_DRAG;
        let jitter = DVec2::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5) * chaos;
        self.velocity += (attractor - self.position) * pull + jitter;
        self.position += self.velocity;
        self.life -= self.life_decay;
        self.life > 0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn emit(&mut self, rng: &mut impl Rng, origin: DVec2, emission: &Emission) {
        self.particles.reserve(emission.count);
        for _ in 0..emission.count {
            self.particles.push(Particle::spawn(rng, origin, emission));
        }
    }

    /// Physics for every particle; expired ones are dropped.
    pub fn step(&mut self, attractor: DVec2, connecting: bool, rng: &mut impl Rng) {
        let (pull, chaos) = if connecting {
            (PARTICLE_PULL_CONNECTING, PARTICLE_CHAOS_CONNECTING)
        } else {
            (PARTICLE_PULL_IDLE, PARTICLE_CHAOS_IDLE)
        };
        self.particles
            .retain_mut(|p| p.tick(attractor, pull, chaos, &mut *rng));
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        for p in &self.particles {
            ctx.set_global_alpha(p.life);
            ctx.fill_circle(p.position, p.size, &p.color);
        }
        ctx.set_global_alpha(1.0);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
