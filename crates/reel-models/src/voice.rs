//! Narration voices.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Narration accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Accent {
    Uk,
    Us,
}

impl Accent {
    pub const ALL: [Accent; 2] = [Accent::Uk, Accent::Us];

    /// BCP-47 language code for the accent.
    pub fn language_code(&self) -> &'static str {
        match self {
            Accent::Uk => "en-GB",
            Accent::Us => "en-US",
        }
    }
}

/// Voice gender as understood by the speech service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Neutral => "NEUTRAL",
        }
    }
}

/// Accent and gender pair used for one segment's narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Voice {
    pub accent: Accent,
    pub gender: Gender,
}

impl Voice {
    pub fn new(accent: Accent, gender: Gender) -> Self {
        Self { accent, gender }
    }

    /// WaveNet voice name for this accent/gender.
    ///
    /// The UK catalogue has no neutral voice, so `en-GB-Wavenet-C` stands in.
    pub fn wavenet_name(&self) -> &'static str {
        match (self.accent, self.gender) {
            (Accent::Us, Gender::Male) => "en-US-Wavenet-D",
            (Accent::Us, Gender::Female) => "en-US-Wavenet-F",
            (Accent::Us, Gender::Neutral) => "en-US-Wavenet-C",
            (Accent::Uk, Gender::Male) => "en-GB-Wavenet-B",
            (Accent::Uk, Gender::Female) => "en-GB-Wavenet-D",
            (Accent::Uk, Gender::Neutral) => "en-GB-Wavenet-C",
        }
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(Accent::Uk, Gender::Female)
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wavenet_name())
    }
}
