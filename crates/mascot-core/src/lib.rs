pub mod animation;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod gaze;
pub mod host;
pub mod mascot;
pub mod particle;
pub mod pose;
pub mod speech;
pub mod state;
pub mod theme;

pub use animation::*;
pub use config::*;
pub use emitter::*;
pub use error::*;
pub use gaze::*;
pub use host::*;
pub use mascot::*;
pub use particle::*;
pub use pose::*;
pub use speech::*;
pub use state::*;
pub use theme::*;
