// ABOUTME: Repetition detector tracking a vertical motion signal per exercise
// ABOUTME: Two-state hysteresis around the history mean with a debounce between counted reps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Rep Detector
//!
//! Each sample is reduced to one scalar: the mean `y` of the exercise's
//! tracked joint pair (hips for squats, shoulders for presses and pulls,
//! wrists for overhead work). Image `y` grows downward, so descending into
//! a rep raises the signal.
//!
//! The detector enters the *down* phase when the current value rises above
//! `mean + down_band_factor * threshold` and counts a rep when it falls back
//! below `mean - up_band_factor * threshold`, provided `rep_debounce_ms`
//! have passed since the previous rep. The mean is taken over the whole
//! movement history. Partial reps and tempo are not detected.

use super::exercise_profile::ExerciseProfile;
use super::sample_buffer::BoundedBuffer;
use crate::config::SessionConfig;
use pierre_core::models::{ExerciseKind, PoseSample};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Counts up/down cycles of the tracked joint pair
#[derive(Debug, Clone)]
pub struct RepDetector {
    history: BoundedBuffer<f32>,
    rep_count: u32,
    in_down_phase: bool,
    last_rep_timestamp_ms: Option<u64>,
    is_moving: bool,
    min_history_points: usize,
    range_window: usize,
    rep_debounce_ms: u64,
    down_band_factor: f32,
    up_band_factor: f32,
    threshold_overrides: BTreeMap<ExerciseKind, f32>,
}

impl Default for RepDetector {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl RepDetector {
    /// Create a detector using the session tuning values
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            history: BoundedBuffer::new(config.movement_history_capacity),
            rep_count: 0,
            in_down_phase: false,
            last_rep_timestamp_ms: None,
            is_moving: false,
            min_history_points: config.min_history_points,
            range_window: config.range_window,
            rep_debounce_ms: config.rep_debounce_ms,
            down_band_factor: config.down_band_factor,
            up_band_factor: config.up_band_factor,
            threshold_overrides: config.movement_threshold_overrides.clone(),
        }
    }

    /// Movement threshold in effect for an exercise
    #[must_use]
    pub fn movement_threshold(&self, kind: ExerciseKind) -> f32 {
        self.threshold_overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| ExerciseProfile::for_kind(kind).movement_threshold)
    }

    /// Feed one sample and return the current rep count
    ///
    /// Static exercises return immediately. Samples missing either joint of
    /// the tracked pair are skipped without touching any state.
    pub fn observe(&mut self, sample: &PoseSample, kind: ExerciseKind) -> u32 {
        let Some((first, second)) = ExerciseProfile::for_kind(kind).tracked_pair else {
            return self.rep_count;
        };
        let Some(position) = sample.average_y(first, second) else {
            trace!(exercise = %kind, "Tracked joints missing, skipping rep observation");
            return self.rep_count;
        };

        self.history.push(position);
        if self.history.len() < self.min_history_points {
            return self.rep_count;
        }

        let threshold = self.movement_threshold(kind);
        // Range is telemetry only; transitions are decided against the mean below
        self.is_moving = self
            .history
            .trailing_range(self.range_window)
            .is_some_and(|range| range > threshold);

        let Some(average) = self.history.mean() else {
            return self.rep_count;
        };

        if position > self.down_band_factor.mul_add(threshold, average) && !self.in_down_phase {
            self.in_down_phase = true;
            trace!(exercise = %kind, position, average, "Entered down phase");
        } else if position < (-self.up_band_factor).mul_add(threshold, average)
            && self.in_down_phase
            && self.debounce_elapsed(sample.timestamp_ms())
        {
            self.rep_count += 1;
            self.in_down_phase = false;
            self.last_rep_timestamp_ms = Some(sample.timestamp_ms());
            debug!(
                exercise = %kind,
                reps = self.rep_count,
                timestamp_ms = sample.timestamp_ms(),
                "Rep detected"
            );
        }

        self.rep_count
    }

    fn debounce_elapsed(&self, now_ms: u64) -> bool {
        self.last_rep_timestamp_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.rep_debounce_ms)
    }

    /// Reps counted since the last reset
    #[must_use]
    pub const fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Whether a descent was seen and the rep is not yet complete
    #[must_use]
    pub const fn in_down_phase(&self) -> bool {
        self.in_down_phase
    }

    /// Whether the recent range exceeds the movement threshold
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Timestamp of the last counted rep
    #[must_use]
    pub const fn last_rep_timestamp_ms(&self) -> Option<u64> {
        self.last_rep_timestamp_ms
    }

    /// Number of readings in the movement history
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Clear history, count and phase
    pub fn reset(&mut self) {
        self.history.clear();
        self.rep_count = 0;
        self.in_down_phase = false;
        self.last_rep_timestamp_ms = None;
        self.is_moving = false;
    }
}
