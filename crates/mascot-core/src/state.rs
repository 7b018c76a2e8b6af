//! Behaviour modes of the mascot.
//!
//! Three modes drive the built-in visuals. Any other name is carried verbatim
//! as [`MascotState::Custom`]; the loop treats it like a quiet idle without
//! particles or twitching.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MascotState {
    #[default]
    Idle,
    Connecting,
    EmulatingSpeech,
    Custom(String),
}

impl MascotState {
    pub fn as_str(&self) -> &str {
        match self {
            MascotState::Idle => "idle",
            MascotState::Connecting => "connecting",
            MascotState::EmulatingSpeech => "emulatingSpeech",
            MascotState::Custom(name) => name,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, MascotState::Idle)
    }

    #[inline]
    pub fn is_connecting(&self) -> bool {
        matches!(self, MascotState::Connecting)
    }

    #[inline]
    pub fn is_speaking(&self) -> bool {
        matches!(self, MascotState::EmulatingSpeech)
    }
}

impl fmt::Display for MascotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MascotState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "idle" => MascotState::Idle,
            "connecting" => MascotState::Connecting,
            "emulatingSpeech" => MascotState::EmulatingSpeech,
            other => MascotState::Custom(other.to_string()),
        })
    }
}

impl From<&str> for MascotState {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(state) => state,
            Err(never) => match never {},
        }
    }
}

impl From<String> for MascotState {
    fn from(s: String) -> Self {
        MascotState::from(s.as_str())
    }
}
