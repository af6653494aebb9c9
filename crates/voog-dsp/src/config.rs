use serde::{Deserialize, Serialize};

use crate::error::{check_sample_rate, Result};

pub const DEFAULT_CUTOFF_HZ: f64 = 8_000.0;
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Persisted per-voice filter settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Base cutoff in Hz.
    pub cutoff: f64,
    /// Normalized resonance, nominally 0..1. Not clamped.
    pub resonance: f64,
    /// Envelope modulation depth in semitones.
    pub env_amount: f64,
    /// 0 = no tracking, 1 = cutoff follows the keyboard one semitone per note.
    pub key_tracking: f64,
    pub sample_rate: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF_HZ,
            resonance: 0.0,
            env_amount: 0.0,
            key_tracking: 0.0,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl FilterSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        check_sample_rate(settings.sample_rate)?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
