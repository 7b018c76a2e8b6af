use crate::MascotError;
use serde::{Deserialize, Serialize};

/// Explicit colour overrides. Any field left out (or blank) is resolved via the
/// theme provider, see [`crate::ThemeColors::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorOverrides {
    pub primary: Option<String>,
    #[serde(rename = "primaryRGB")]
    pub primary_rgb: Option<String>,
    #[serde(rename = "secondaryRGB")]
    pub secondary_rgb: Option<String>,
    pub core: Option<String>,
    #[serde(rename = "ambientGlowRGB")]
    pub ambient_glow_rgb: Option<String>,
}

/// Construction options, deserialised from a camelCase JS object.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MascotConfig {
    pub canvas_id: String,
    pub colors: Option<ColorOverrides>,
    pub enable_twitching: bool,
    /// Idle breathing period in milliseconds.
    pub idle_breath_cycle: f64,
    /// Duration handed to one-shot animations, in milliseconds.
    pub animation_duration: f64,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    /// Advance the animation clock by measured frame time instead of a fixed
    /// step per frame.
    pub frame_rate_independent: bool,
}

impl Default for MascotConfig {
    fn default() -> Self {
        Self {
            canvas_id: "my-mascot".to_string(),
            colors: None,
            enable_twitching: true,
            idle_breath_cycle: 4000.0,
            animation_duration: 500.0,
            seed: None,
            frame_rate_independent: false,
        }
    }
}

impl MascotConfig {
    pub fn from_json(json: &str) -> Result<Self, MascotError> {
        serde_json::from_str(json).map_err(|e| MascotError::Config(e.to_string()))
    }
}
