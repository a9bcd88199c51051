// ABOUTME: Per-exercise lookup table for landmark requirements, tracked joints, and thresholds
// ABOUTME: Drives the sample validator and rep detector from data instead of branching logic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::constants::form_analysis::movement_thresholds;
use pierre_core::models::{ExerciseKind, Landmark};

/// Joints every usable sample must contain, regardless of exercise
pub const BASE_REQUIRED_LANDMARKS: [Landmark; 4] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftHip,
    Landmark::RightHip,
];

const UPPER_LIMBS: &[(Landmark, Landmark)] = &[
    (Landmark::LeftElbow, Landmark::RightElbow),
    (Landmark::LeftWrist, Landmark::RightWrist),
];

const LOWER_LIMBS: &[(Landmark, Landmark)] = &[
    (Landmark::LeftKnee, Landmark::RightKnee),
    (Landmark::LeftAnkle, Landmark::RightAnkle),
];

const HIPS: (Landmark, Landmark) = (Landmark::LeftHip, Landmark::RightHip);
const SHOULDERS: (Landmark, Landmark) = (Landmark::LeftShoulder, Landmark::RightShoulder);
const WRISTS: (Landmark, Landmark) = (Landmark::LeftWrist, Landmark::RightWrist);

/// Static description of how one exercise is validated and tracked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseProfile {
    /// Exercise this profile describes
    pub kind: ExerciseKind,
    /// Extra mirrored joint pairs of which at least one side must be present
    pub either_side: &'static [(Landmark, Landmark)],
    /// Joint pair whose mean height is the rep signal; `None` exactly when
    /// [`ExerciseKind::is_static`] holds
    pub tracked_pair: Option<(Landmark, Landmark)>,
    /// Peak-to-peak travel that counts as real movement
    pub movement_threshold: f32,
}

const SQUAT: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::Squat,
    either_side: LOWER_LIMBS,
    tracked_pair: Some(HIPS),
    movement_threshold: movement_thresholds::SQUAT,
};

const PUSH_UP: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::PushUp,
    either_side: UPPER_LIMBS,
    tracked_pair: Some(SHOULDERS),
    movement_threshold: movement_thresholds::PUSH_UP,
};

const PLANK: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::Plank,
    either_side: UPPER_LIMBS,
    tracked_pair: None,
    movement_threshold: pierre_core::constants::form_analysis::DEFAULT_MOVEMENT_THRESHOLD,
};

const DEADLIFT: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::Deadlift,
    either_side: LOWER_LIMBS,
    tracked_pair: Some(SHOULDERS),
    movement_threshold: movement_thresholds::DEADLIFT,
};

const LUNGE: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::Lunge,
    either_side: LOWER_LIMBS,
    tracked_pair: Some(HIPS),
    movement_threshold: movement_thresholds::LUNGE,
};

const BENCH_PRESS: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::BenchPress,
    either_side: &[],
    tracked_pair: Some(SHOULDERS),
    movement_threshold: movement_thresholds::BENCH_PRESS,
};

const OVERHEAD_PRESS: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::OverheadPress,
    either_side: &[],
    tracked_pair: Some(WRISTS),
    movement_threshold: movement_thresholds::OVERHEAD_PRESS,
};

const BARBELL_ROW: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::BarbellRow,
    either_side: &[],
    tracked_pair: Some(SHOULDERS),
    movement_threshold: movement_thresholds::BARBELL_ROW,
};

impl ExerciseProfile {
    /// Lookup the profile of an exercise
    #[must_use]
    pub fn for_kind(kind: ExerciseKind) -> &'static Self {
        match kind {
            ExerciseKind::Squat => &SQUAT,
            ExerciseKind::PushUp => &PUSH_UP,
            ExerciseKind::Plank => &PLANK,
            ExerciseKind::Deadlift => &DEADLIFT,
            ExerciseKind::Lunge => &LUNGE,
            ExerciseKind::BenchPress => &BENCH_PRESS,
            ExerciseKind::OverheadPress => &OVERHEAD_PRESS,
            ExerciseKind::BarbellRow => &BARBELL_ROW,
        }
    }
}
