// ABOUTME: Session tuning configuration for pose-sample collection and rep detection
// ABOUTME: Loads empirical thresholds from PIERRE_FORM_* environment variables with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::error::ConfigError;
use pierre_core::constants::env_config::{FORM_ENV_PREFIX, THRESHOLD_ENV_PREFIX};
use pierre_core::constants::form_analysis as defaults;
use pierre_core::models::ExerciseKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Tuning values for one form-analysis session
///
/// Every field defaults to the constants in `pierre_core::constants::form_analysis`.
/// The values are hand-tuned; they are kept configurable so they can be
/// re-tuned per deployment without a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum buffered samples (oldest evicted beyond this)
    pub buffer_capacity: usize,
    /// Maximum vertical-position readings kept by the rep detector
    pub movement_history_capacity: usize,
    /// History points required before rep logic runs
    pub min_history_points: usize,
    /// Trailing points used for the movement range
    pub range_window: usize,
    /// Minimum milliseconds between counted reps
    pub rep_debounce_ms: u64,
    /// Fraction of the movement threshold above the mean that enters the down phase
    pub down_band_factor: f32,
    /// Fraction of the movement threshold below the mean that completes a rep
    pub up_band_factor: f32,
    /// Below this many frames the data is insufficient
    pub insufficient_frames: usize,
    /// Minimum frames for an analysis
    pub min_frames: usize,
    /// Frames separating moderate from good quality
    pub moderate_frames: usize,
    /// Frames that auto-complete the session
    pub auto_complete_frames: usize,
    /// Reps required for full sufficiency
    pub min_reps: u32,
    /// Reps that auto-complete a dynamic exercise
    pub auto_complete_reps: u32,
    /// Consecutive invalid frames that end collection when enough data exists
    pub max_consecutive_invalid_frames: u32,
    /// Accepted samples between passive estimates (0 disables them)
    pub passive_analysis_interval: u64,
    /// Countdown length in seconds
    pub countdown_seconds: u32,
    /// Per-exercise movement thresholds replacing the built-in table
    #[serde(default)]
    pub movement_threshold_overrides: BTreeMap<ExerciseKind, f32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: defaults::SAMPLE_BUFFER_CAPACITY,
            movement_history_capacity: defaults::MOVEMENT_HISTORY_CAPACITY,
            min_history_points: defaults::MIN_HISTORY_POINTS,
            range_window: defaults::RANGE_WINDOW,
            rep_debounce_ms: defaults::REP_DEBOUNCE_MS,
            down_band_factor: defaults::DOWN_BAND_FACTOR,
            up_band_factor: defaults::UP_BAND_FACTOR,
            insufficient_frames: defaults::INSUFFICIENT_FRAMES,
            min_frames: defaults::MIN_FRAMES,
            moderate_frames: defaults::MODERATE_FRAMES,
            auto_complete_frames: defaults::AUTO_COMPLETE_FRAMES,
            min_reps: defaults::MIN_REPS,
            auto_complete_reps: defaults::AUTO_COMPLETE_REPS,
            max_consecutive_invalid_frames: defaults::MAX_CONSECUTIVE_INVALID_FRAMES,
            passive_analysis_interval: defaults::PASSIVE_ANALYSIS_INTERVAL,
            countdown_seconds: defaults::COUNTDOWN_SECONDS,
            movement_threshold_overrides: BTreeMap::new(),
        }
    }
}

impl SessionConfig {
    /// Load session configuration from environment
    ///
    /// Unset variables keep their defaults. Recognized variables are
    /// `PIERRE_FORM_<FIELD>` in upper snake case (e.g. `PIERRE_FORM_MIN_FRAMES`)
    /// and `PIERRE_FORM_THRESHOLD_<EXERCISE>` (e.g. `PIERRE_FORM_THRESHOLD_SQUAT`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if a variable is set to an unparseable value,
    /// or any error from [`SessionConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = Self::default();

        let mut movement_threshold_overrides = BTreeMap::new();
        for kind in ExerciseKind::ALL {
            let key = format!("{THRESHOLD_ENV_PREFIX}{}", kind.as_str().to_uppercase());
            if let Some(threshold) = env_parse::<f32>(&key)? {
                movement_threshold_overrides.insert(kind, threshold);
            }
        }

        let config = Self {
            buffer_capacity: env_field("BUFFER_CAPACITY", base.buffer_capacity)?,
            movement_history_capacity: env_field(
                "MOVEMENT_HISTORY_CAPACITY",
                base.movement_history_capacity,
            )?,
            min_history_points: env_field("MIN_HISTORY_POINTS", base.min_history_points)?,
            range_window: env_field("RANGE_WINDOW", base.range_window)?,
            rep_debounce_ms: env_field("REP_DEBOUNCE_MS", base.rep_debounce_ms)?,
            down_band_factor: env_field("DOWN_BAND_FACTOR", base.down_band_factor)?,
            up_band_factor: env_field("UP_BAND_FACTOR", base.up_band_factor)?,
            insufficient_frames: env_field("INSUFFICIENT_FRAMES", base.insufficient_frames)?,
            min_frames: env_field("MIN_FRAMES", base.min_frames)?,
            moderate_frames: env_field("MODERATE_FRAMES", base.moderate_frames)?,
            auto_complete_frames: env_field("AUTO_COMPLETE_FRAMES", base.auto_complete_frames)?,
            min_reps: env_field("MIN_REPS", base.min_reps)?,
            auto_complete_reps: env_field("AUTO_COMPLETE_REPS", base.auto_complete_reps)?,
            max_consecutive_invalid_frames: env_field(
                "MAX_CONSECUTIVE_INVALID_FRAMES",
                base.max_consecutive_invalid_frames,
            )?,
            passive_analysis_interval: env_field(
                "PASSIVE_ANALYSIS_INTERVAL",
                base.passive_analysis_interval,
            )?,
            countdown_seconds: env_field("COUNTDOWN_SECONDS", base.countdown_seconds)?,
            movement_threshold_overrides,
        };

        config.validate()?;
        debug!(config = ?config, "Loaded session configuration from environment");
        Ok(config)
    }

    /// Check that limits are positive and correctly ordered
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValueOutOfRange` for zero capacities, band factors
    /// outside `(0, 1]` or non-positive thresholds, and `ConfigError::InvalidRange`
    /// when ordered limits are out of order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange("buffer_capacity must be > 0"));
        }
        if self.movement_history_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "movement_history_capacity must be > 0",
            ));
        }
        if self.range_window == 0 {
            return Err(ConfigError::ValueOutOfRange("range_window must be > 0"));
        }
        if self.min_history_points > self.movement_history_capacity {
            return Err(ConfigError::InvalidRange(
                "min_history_points must not exceed movement_history_capacity",
            ));
        }
        if self.range_window > self.movement_history_capacity {
            return Err(ConfigError::InvalidRange(
                "range_window must not exceed movement_history_capacity",
            ));
        }
        if !(self.insufficient_frames <= self.min_frames
            && self.min_frames <= self.moderate_frames
            && self.moderate_frames <= self.auto_complete_frames
            && self.auto_complete_frames <= self.buffer_capacity)
        {
            return Err(ConfigError::InvalidRange(
                "frame limits must satisfy insufficient <= min <= moderate <= auto_complete <= buffer_capacity",
            ));
        }
        if self.min_reps == 0 || self.min_reps > self.auto_complete_reps {
            return Err(ConfigError::InvalidRange(
                "rep limits must satisfy 1 <= min_reps <= auto_complete_reps",
            ));
        }
        if !(self.down_band_factor > 0.0 && self.down_band_factor <= 1.0) {
            return Err(ConfigError::ValueOutOfRange(
                "down_band_factor must be in (0, 1]",
            ));
        }
        if !(self.up_band_factor > 0.0 && self.up_band_factor <= 1.0) {
            return Err(ConfigError::ValueOutOfRange("up_band_factor must be in (0, 1]"));
        }
        if self
            .movement_threshold_overrides
            .values()
            .any(|threshold| !(threshold.is_finite() && *threshold > 0.0))
        {
            return Err(ConfigError::ValueOutOfRange(
                "movement thresholds must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Builder-style helper replacing the movement threshold of one exercise
    #[must_use]
    pub fn with_threshold_override(mut self, kind: ExerciseKind, threshold: f32) -> Self {
        self.movement_threshold_overrides.insert(kind, threshold);
        self
    }
}

/// Read `PIERRE_FORM_<suffix>`, falling back to `default` when unset
fn env_field<T: FromStr>(suffix: &str, default: T) -> Result<T, ConfigError> {
    Ok(env_parse(&format!("{FORM_ENV_PREFIX}{suffix}"))?.unwrap_or(default))
}

/// Parse an environment variable; `Ok(None)` when it is unset
fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse {
                key: key.to_owned(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
