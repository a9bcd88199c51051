// ABOUTME: Data-quality grading and sufficiency rules for collected exercise data
// ABOUTME: Pure functions of buffered frame count, rep count, exercise kind, and session mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::SessionConfig;
use pierre_core::models::{ExerciseKind, SessionMode};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Ordered sufficiency grade of the collected data
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    /// Barely any frames
    #[default]
    Insufficient,
    /// Too few frames or no reps yet
    Low,
    /// Usable but thin
    Moderate,
    /// Enough for a reliable analysis
    Good,
    /// Collection can stop
    Excellent,
}

impl QualityGrade {
    /// Short label for display
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Insufficient => "insufficient",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl Display for QualityGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether reps matter for this exercise in this mode
///
/// Running and static holds are judged on frame count alone.
#[must_use]
pub const fn counts_reps(kind: ExerciseKind, mode: SessionMode) -> bool {
    mode.is_gym() && !kind.is_static()
}

/// Grades collected data and decides sufficiency and auto-completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityClassifier {
    insufficient_frames: usize,
    min_frames: usize,
    moderate_frames: usize,
    auto_complete_frames: usize,
    min_reps: u32,
    auto_complete_reps: u32,
}

impl Default for QualityClassifier {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl QualityClassifier {
    /// Create a classifier from the session tuning values
    #[must_use]
    pub const fn new(config: &SessionConfig) -> Self {
        Self {
            insufficient_frames: config.insufficient_frames,
            min_frames: config.min_frames,
            moderate_frames: config.moderate_frames,
            auto_complete_frames: config.auto_complete_frames,
            min_reps: config.min_reps,
            auto_complete_reps: config.auto_complete_reps,
        }
    }

    /// Grade the data collected so far
    #[must_use]
    pub const fn classify(
        &self,
        buffer_size: usize,
        rep_count: u32,
        kind: ExerciseKind,
        mode: SessionMode,
    ) -> QualityGrade {
        let reps_matter = counts_reps(kind, mode);

        if buffer_size < self.insufficient_frames {
            QualityGrade::Insufficient
        } else if buffer_size < self.min_frames || (reps_matter && rep_count < 1) {
            QualityGrade::Low
        } else if (reps_matter && rep_count < self.min_reps) || buffer_size < self.moderate_frames
        {
            QualityGrade::Moderate
        } else if (reps_matter && rep_count < self.auto_complete_reps)
            || buffer_size < self.auto_complete_frames
        {
            QualityGrade::Good
        } else {
            QualityGrade::Excellent
        }
    }

    /// Enough data for a full analysis
    ///
    /// Frame minimum always applies; dynamic gym exercises also need `min_reps`.
    #[must_use]
    pub const fn is_sufficient(
        &self,
        buffer_size: usize,
        rep_count: u32,
        kind: ExerciseKind,
        mode: SessionMode,
    ) -> bool {
        buffer_size >= self.min_frames && (!counts_reps(kind, mode) || rep_count >= self.min_reps)
    }

    /// Collection should stop on its own
    ///
    /// Frame-only sessions stop at `auto_complete_frames`; dynamic gym
    /// exercises stop at `auto_complete_reps`, or at `min_reps` once the
    /// frame limit is reached.
    #[must_use]
    pub const fn should_auto_complete(
        &self,
        buffer_size: usize,
        rep_count: u32,
        kind: ExerciseKind,
        mode: SessionMode,
    ) -> bool {
        if counts_reps(kind, mode) {
            rep_count >= self.auto_complete_reps
                || (rep_count >= self.min_reps && buffer_size >= self.auto_complete_frames)
        } else {
            buffer_size >= self.auto_complete_frames
        }
    }

    /// Minimum buffered frames for any analysis
    #[must_use]
    pub const fn min_frames(&self) -> usize {
        self.min_frames
    }

    /// Reps required for full sufficiency
    #[must_use]
    pub const fn min_reps(&self) -> u32 {
        self.min_reps
    }
}
