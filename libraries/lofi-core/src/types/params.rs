/// Processing parameters for the slowed + reverb pipeline
use crate::error::{LofiError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Room reverb settings
///
/// All four values are nominally in [0.0, 1.0]. Only finiteness is enforced;
/// out-of-range values are handed to the filter unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbParams {
    /// Decay time of the tail (larger = longer)
    pub room_size: f32,
    /// High-frequency absorption inside the feedback loop (larger = darker)
    pub damping: f32,
    /// Linear gain of the reverberated signal
    pub wet_level: f32,
    /// Linear gain of the untouched signal
    pub dry_level: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room_size: 0.75,
            damping: 0.5,
            wet_level: 0.08,
            dry_level: 0.2,
        }
    }
}

impl ReverbParams {
    /// Dry signal only (the filter still runs but contributes nothing)
    pub fn dry() -> Self {
        Self {
            wet_level: 0.0,
            dry_level: 1.0,
            ..Self::default()
        }
    }

    /// Reject NaN and infinite values
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("room_size", self.room_size),
            ("damping", self.damping),
            ("wet_level", self.wet_level),
            ("dry_level", self.dry_level),
        ] {
            ensure_finite(name, f64::from(value))?;
        }
        Ok(())
    }
}

/// Full parameter set of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// See [`ReverbParams::room_size`]
    pub room_size: f32,
    /// See [`ReverbParams::damping`]
    pub damping: f32,
    /// See [`ReverbParams::wet_level`]
    pub wet_level: f32,
    /// See [`ReverbParams::dry_level`]
    pub dry_level: f32,
    /// Left-channel delay in milliseconds
    pub delay_ms: f64,
    /// Fraction of the sample rate removed to slow the track down
    pub slow_factor: f64,
}

impl Default for PipelineParams {
    fn default() -> Self {
        let reverb = ReverbParams::default();
        Self {
            room_size: reverb.room_size,
            damping: reverb.damping,
            wet_level: reverb.wet_level,
            dry_level: reverb.dry_level,
            delay_ms: 2.0,
            slow_factor: 0.08,
        }
    }
}

impl PipelineParams {
    /// Reverb portion of the parameter set
    pub fn reverb(&self) -> ReverbParams {
        ReverbParams {
            room_size: self.room_size,
            damping: self.damping,
            wet_level: self.wet_level,
            dry_level: self.dry_level,
        }
    }

    /// Replace the reverb portion of the parameter set
    #[must_use]
    pub fn with_reverb(mut self, reverb: ReverbParams) -> Self {
        self.room_size = reverb.room_size;
        self.damping = reverb.damping;
        self.wet_level = reverb.wet_level;
        self.dry_level = reverb.dry_level;
        self
    }

    /// Validate everything that can be checked before any audio is decoded.
    ///
    /// The output rate itself can only be checked once the source rate is
    /// known, but a slow factor of 1.0 or more can never leave a positive
    /// rate, so it is rejected here.
    pub fn validate(&self) -> Result<()> {
        self.reverb().validate()?;

        ensure_finite("delay_ms", self.delay_ms)?;
        if self.delay_ms < 0.0 {
            return Err(LofiError::invalid_parameter(format!(
                "delay_ms must not be negative (got {})",
                self.delay_ms
            )));
        }

        ensure_finite("slow_factor", self.slow_factor)?;
        if !(0.0..1.0).contains(&self.slow_factor) {
            return Err(LofiError::invalid_parameter(format!(
                "slow_factor must be in [0.0, 1.0) (got {})",
                self.slow_factor
            )));
        }

        Ok(())
    }
}

/// An auxiliary track mixed under the primary one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    /// Source file of the effect
    pub path: PathBuf,
    /// Linear gain applied to every sample of the prepared effect
    pub volume: f32,
}

impl EffectSpec {
    /// Create a new effect spec
    pub fn new(path: impl Into<PathBuf>, volume: f32) -> Self {
        Self {
            path: path.into(),
            volume,
        }
    }

    /// A zero-volume effect contributes nothing and can be skipped
    pub fn is_silent(&self) -> bool {
        self.volume == 0.0
    }

    /// Volume must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        ensure_finite("volume", f64::from(self.volume))?;
        if self.volume < 0.0 {
            return Err(LofiError::invalid_parameter(format!(
                "volume of {} must not be negative (got {})",
                self.path.display(),
                self.volume
            )));
        }
        Ok(())
    }
}

fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LofiError::invalid_parameter(format!(
            "{name} must be finite (got {value})"
        )))
    }
}
