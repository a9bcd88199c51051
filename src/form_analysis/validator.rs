// ABOUTME: Sample validator deciding whether a pose sample has enough joints for an exercise
// ABOUTME: Pure predicate over the exercise profile table, no side effects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::exercise_profile::{ExerciseProfile, BASE_REQUIRED_LANDMARKS};
use pierre_core::models::{ExerciseKind, Landmark, PoseSample, SessionMode};

/// Why a sample was accepted or rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleVerdict {
    /// All required joints are present
    Valid,
    /// A shoulder or hip is missing
    MissingBaseLandmark(Landmark),
    /// Neither side of an exercise-specific joint pair is present
    MissingLimb(Landmark, Landmark),
}

impl SampleVerdict {
    /// Whether the sample can be buffered
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Judges whether a single pose sample is usable for the selected exercise
pub struct SampleValidator;

impl SampleValidator {
    /// Check a sample and explain the outcome
    ///
    /// Requires both shoulders and both hips. In gym mode at least one side
    /// of each limb pair listed in the exercise profile must also be present;
    /// running samples only need the base joints.
    #[must_use]
    pub fn check(sample: &PoseSample, kind: ExerciseKind, mode: SessionMode) -> SampleVerdict {
        if let Some(missing) = BASE_REQUIRED_LANDMARKS
            .iter()
            .find(|landmark| !sample.contains(**landmark))
        {
            return SampleVerdict::MissingBaseLandmark(*missing);
        }
        if !mode.is_gym() {
            return SampleVerdict::Valid;
        }

        ExerciseProfile::for_kind(kind)
            .either_side
            .iter()
            .find(|(left, right)| !sample.contains_either(*left, *right))
            .map_or(SampleVerdict::Valid, |(left, right)| {
                SampleVerdict::MissingLimb(*left, *right)
            })
    }

    /// Whether a sample has sufficient landmarks for the exercise and mode
    #[must_use]
    pub fn is_valid(sample: &PoseSample, kind: ExerciseKind, mode: SessionMode) -> bool {
        Self::check(sample, kind, mode).is_valid()
    }
}
