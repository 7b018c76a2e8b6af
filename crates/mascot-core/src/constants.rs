// Shared tuning constants for the mascot loop. Times are milliseconds unless
// noted; "t" is the internal animation clock advanced once per frame.

// Animation clock
pub const ANIM_TIME_STEP: f64 = 0.015; // per frame
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
pub const MAX_MEASURED_FRAME_MS: f64 = 100.0; // clamp for frame-rate independent mode

// Geometry
pub const DEFAULT_RADIUS: f64 = 10.0;
pub const RADIUS_DIVISOR: f64 = 12.0; // radius = min(w, h) / 12
pub const GAZE_MARGIN_RADII: f64 = 1.5;
pub const CONNECTING_RADIUS_SCALE: f64 = 1.5;

// Twitch
pub const TWITCH_DURATION_MS: f64 = 100.0;
pub const TWITCH_INTERVAL_MIN_MS: f64 = 3000.0;
pub const TWITCH_INTERVAL_SPAN_MS: f64 = 5000.0;
pub const TWITCH_JITTER: f64 = 0.5;
pub const CONNECTING_JITTER: f64 = 0.5;

// Blink
pub const BLINK_DURATION_MS: f64 = 150.0;
pub const FIRST_BLINK_MIN_MS: f64 = 2000.0;
pub const BLINK_INTERVAL_MIN_MS: f64 = 2000.0;
pub const BLINK_INTERVAL_SPAN_MS: f64 = 4000.0;

// Gaze
pub const GAZE_INTENSITY_BLEND: f64 = 0.1;
pub const GAZE_REACH: f64 = 0.15; // fraction of the way from centre to look target
pub const GAZE_FOLLOW_BLEND: f64 = 0.05;
pub const IDLE_DRIFT_AMOUNT: f64 = 0.1;
pub const IDLE_DRIFT_FREQ_X: f64 = 0.5;
pub const IDLE_DRIFT_FREQ_Y: f64 = 0.7;

// Particles
pub const IDLE_SPAWN_PROBABILITY: f64 = 0.10;
pub const PARTICLE_DRAG: f64 = 0.95; // velocity multiplier per frame
pub const PARTICLE_PULL_IDLE: f64 = 0.005;
pub const PARTICLE_PULL_CONNECTING: f64 = 0.008;
pub const PARTICLE_CHAOS_IDLE: f64 = 0.6;
pub const PARTICLE_CHAOS_CONNECTING: f64 = 1.0;
pub const PARTICLE_LIFE_DECAY: f64 = 0.012;
pub const PARTICLE_SPEED_IDLE: (f64, f64) = (0.5, 1.5); // (min, span)
pub const PARTICLE_SPEED_CONNECTING: (f64, f64) = (2.0, 5.0);
pub const PARTICLE_SIZE_IDLE: (f64, f64) = (4.0, 6.0);
pub const PARTICLE_SIZE_CONNECTING: (f64, f64) = (3.0, 7.5);

// Glow
pub const GLOW_OUTER_SCALE: f64 = 2.5;
pub const GLOW_BREATH_AMOUNT: f64 = 0.1;
pub const GLOW_INNER_ALPHA: f64 = 0.5;

// Speech rings
pub const RING_SPAWN_INTERVAL: f64 = 0.2; // animation-time units
pub const RING_GROWTH: f64 = 1.5;
pub const RING_LIFE_DECAY: f64 = 0.02;
pub const RING_PHASE_MAX: f64 = 10.0;
pub const RING_ANGLE_STEP: f64 = 0.1;
pub const RING_WAVE_LOBES: f64 = 10.0;
pub const RING_WAVE_SPEED: f64 = 5.0;
pub const RING_WAVE_DEPTH_DIVISOR: f64 = 20.0;
pub const RING_STROKE_ALPHA: f64 = 0.7;
pub const RING_LINE_WIDTH: f64 = 2.0;

// Core
pub const CORE_BREATH_AMOUNT: f64 = 0.05;
pub const CORE_LOCK_PULSE_MS: f64 = 1500.0;
pub const CORE_LOCK_PULSE_AMOUNT: f64 = 0.1;
pub const CORE_ROTATE_THRESHOLD: f64 = 0.05; // minimum gaze intensity before orienting
pub const CORE_STRETCH_X: f64 = 0.3;
pub const CORE_SQUASH_Y: f64 = 0.5;
pub const CORE_BLINK_STRETCH_X: f64 = 0.1;
pub const CORE_TALK_FREQ: f64 = 10.0;
pub const CORE_TALK_BASE: f64 = 0.8;
pub const CORE_TALK_AMOUNT: f64 = 0.2;
pub const CORE_ALPHA_BASE: f64 = 0.9;
pub const CORE_ALPHA_AMOUNT: f64 = 0.1;
pub const CORE_ALPHA_PERIOD_MS: f64 = 400.0;
pub const CORE_SHADOW_BLUR: f64 = 15.0;

// One-shot animations
pub const THINKING_SCALE_MIN: f64 = 1.15;
pub const THINKING_SCALE_SPAN: f64 = 0.2;
pub const THINKING_ROTATION_MIN_DEG: f64 = 270.0;
pub const THINKING_ROTATION_SPAN_DEG: f64 = 180.0;
pub const SPARKLE_COUNT_MIN: f64 = 15.0;
pub const SPARKLE_COUNT_SPAN: f64 = 35.0;
pub const SPARKLE_SPEED_MIN: f64 = 1.5;
pub const SPARKLE_SPEED_SPAN: f64 = 2.0;
pub const SPARKLE_DECAY_MIN: f64 = 0.01;
pub const SPARKLE_DECAY_SPAN: f64 = 0.015;
pub const SPARKLE_SECONDARY_CHANCE: f64 = 0.2;
pub const SPARKLE_SECONDARY_ALPHA: f64 = 0.9;
pub const WOBBLE_AMPLITUDE_DEG: f64 = 20.0;
pub const WOBBLE_OSCILLATIONS: f64 = 2.0;
