// ABOUTME: Built-in heuristic form scorer using 2D joint angles from pose samples
// ABOUTME: Provides single-frame estimates and a degraded multi-frame fallback scorer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Local Form Scorer
//!
//! Deterministic heuristics that need no network:
//!
//! - per-frame checks (torso lean, body line, shoulder and grip symmetry, knee tracking)
//! - range-of-motion checks across frames (depth, elbow bend, lockout)
//!
//! A per-frame fault is reported for a session when it shows up in at least
//! `PERSISTENT_ISSUE_PERCENT` of the frames that could be measured.

use super::types::{
    FormIssue, FormIssueKind, FormScorer, IssueSeverity, ScoreRequest, ScoreResult, ScoreSource,
    ScorerError,
};
use async_trait::async_trait;
use pierre_core::constants::service_names;
use pierre_core::models::{ExerciseKind, Landmark, Point3, PoseSample};
use std::collections::BTreeMap;
use tracing::debug;

/// Shoulder or wrist height difference counted as asymmetric (normalized units)
const SYMMETRY_TOLERANCE: f32 = 0.05;
/// Forward lean limit for squats and lunges (degrees from vertical)
const SQUAT_LEAN_LIMIT_DEG: f32 = 50.0;
/// Lean limit under an overhead load (degrees from vertical)
const OVERHEAD_LEAN_LIMIT_DEG: f32 = 15.0;
/// Rows below this lean are too upright (degrees from vertical)
const ROW_MIN_LEAN_DEG: f32 = 45.0;
/// Shoulder-hip-ankle angle below which the body line is broken
const BODY_LINE_MIN_DEG: f32 = 160.0;
/// Body line angle below which the break is severe
const BODY_LINE_MAJOR_DEG: f32 = 145.0;
/// Knee angle the deepest frame must reach
const DEPTH_TARGET_DEG: f32 = 110.0;
/// Knee angle beyond which depth is severely lacking
const DEPTH_MAJOR_DEG: f32 = 135.0;
/// Elbow angle the bottom of a press or push-up must reach
const ELBOW_BOTTOM_TARGET_DEG: f32 = 110.0;
/// Elbow angle an overhead lockout must reach
const LOCKOUT_TARGET_DEG: f32 = 160.0;
/// Knee width relative to ankle width under which knees are caving in
const KNEE_TRACKING_RATIO: f32 = 0.75;
/// Minimum ankle width for a frontal view
const FRONTAL_STANCE_MIN_WIDTH: f32 = 0.1;
/// Share of measured frames a per-frame fault needs to count for the session
const PERSISTENT_ISSUE_PERCENT: usize = 30;

const SHOULDERS: (Landmark, Landmark) = (Landmark::LeftShoulder, Landmark::RightShoulder);
const ELBOWS: (Landmark, Landmark) = (Landmark::LeftElbow, Landmark::RightElbow);
const WRISTS: (Landmark, Landmark) = (Landmark::LeftWrist, Landmark::RightWrist);
const HIPS: (Landmark, Landmark) = (Landmark::LeftHip, Landmark::RightHip);
const KNEES: (Landmark, Landmark) = (Landmark::LeftKnee, Landmark::RightKnee);
const ANKLES: (Landmark, Landmark) = (Landmark::LeftAnkle, Landmark::RightAnkle);

/// Heuristic scorer needing nothing beyond the pose samples
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFormScorer;

impl LocalFormScorer {
    /// Create a local scorer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Cheap single-frame estimate
    #[must_use]
    pub fn estimate_frame(
        &self,
        sample: &PoseSample,
        exercise: ExerciseKind,
        reps_counted: u32,
    ) -> ScoreResult {
        let issues = frame_issues(sample, exercise);
        build_result(exercise, issues, reps_counted, 1)
    }

    /// Multi-frame heuristic score over a whole buffer
    ///
    /// # Errors
    ///
    /// Returns `ScorerError::Rejected` when `samples` is empty
    pub fn score_buffer(
        &self,
        samples: &[PoseSample],
        exercise: ExerciseKind,
        reps_counted: u32,
    ) -> Result<ScoreResult, ScorerError> {
        if samples.is_empty() {
            return Err(ScorerError::Rejected("no pose samples to score".to_owned()));
        }

        let mut persistent: BTreeMap<FormIssueKind, (usize, IssueSeverity)> = BTreeMap::new();
        for sample in samples {
            for issue in frame_issues(sample, exercise) {
                let entry = persistent.entry(issue.kind).or_insert((0, issue.severity));
                entry.0 += 1;
                entry.1 = entry.1.max(issue.severity);
            }
        }

        let mut issues: Vec<FormIssue> = persistent
            .into_iter()
            .filter(|(_, (count, _))| count * 100 >= samples.len() * PERSISTENT_ISSUE_PERCENT)
            .map(|(kind, (_, severity))| issue(kind, severity))
            .collect();
        issues.extend(range_of_motion_issues(samples, exercise));

        debug!(
            exercise = %exercise,
            frames = samples.len(),
            issues = issues.len(),
            "Local multi-frame score computed"
        );
        Ok(build_result(exercise, issues, reps_counted, samples.len()))
    }
}

#[async_trait]
impl FormScorer for LocalFormScorer {
    async fn score_samples(&self, request: ScoreRequest) -> Result<ScoreResult, ScorerError> {
        self.score_buffer(&request.samples, request.exercise, request.reps_detected)
    }

    fn name(&self) -> &'static str {
        service_names::LOCAL_FORM_SCORER
    }
}

fn build_result(
    exercise: ExerciseKind,
    mut issues: Vec<FormIssue>,
    reps_counted: u32,
    frames_analyzed: usize,
) -> ScoreResult {
    issues.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.kind.cmp(&b.kind)));
    let penalty: u32 = issues.iter().map(|i| u32::from(i.severity.penalty())).sum();
    let overall_score = 100_u32.saturating_sub(penalty) as u8;

    let summary = if issues.is_empty() {
        format!(
            "{}: {reps_counted} reps, score {overall_score}, no form issues detected",
            exercise.display_name()
        )
    } else {
        format!(
            "{}: {reps_counted} reps, score {overall_score}, main issue: {}",
            exercise.display_name(),
            issues[0].message
        )
    };

    ScoreResult {
        overall_score,
        form_issues: issues,
        reps_counted,
        frames_analyzed,
        source: ScoreSource::LocalEstimate,
        summary,
    }
}

fn issue(kind: FormIssueKind, severity: IssueSeverity) -> FormIssue {
    FormIssue {
        kind,
        severity,
        message: cue(kind).to_owned(),
    }
}

const fn cue(kind: FormIssueKind) -> &'static str {
    match kind {
        FormIssueKind::UnevenShoulders => "Keep your shoulders level",
        FormIssueKind::ExcessiveForwardLean => "Keep your chest up and torso more upright",
        FormIssueKind::ExcessiveBackLean => "Brace your core and avoid leaning back",
        FormIssueKind::HipSag => "Squeeze glutes and core to stop your hips sagging",
        FormIssueKind::HipPike => "Lower your hips into a straight line",
        FormIssueKind::InsufficientDepth => "Sit deeper, aim for thighs parallel to the floor",
        FormIssueKind::KneesCavingIn => "Push your knees out over your toes",
        FormIssueKind::PartialRange => "Lower further to use the full range of motion",
        FormIssueKind::IncompleteLockout => "Fully lock out your arms at the top",
        FormIssueKind::UnevenGrip => "Keep both hands at the same height",
        FormIssueKind::TorsoTooUpright => "Hinge further forward at the hips",
    }
}

/// Interior angle at `vertex` in degrees (180 = straight)
fn joint_angle(a: Point3, vertex: Point3, c: Point3) -> f32 {
    let (ax, ay) = (a.x - vertex.x, a.y - vertex.y);
    let (cx, cy) = (c.x - vertex.x, c.y - vertex.y);
    let norm = ax.hypot(ay) * cx.hypot(cy);
    if norm <= f32::EPSILON {
        return 180.0;
    }
    (ax.mul_add(cx, ay * cy) / norm).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Smallest joint angle across both body sides that are fully visible
fn min_side_angle(
    sample: &PoseSample,
    outer: (Landmark, Landmark),
    vertex: (Landmark, Landmark),
    inner: (Landmark, Landmark),
) -> Option<f32> {
    let side = |a: Landmark, v: Landmark, c: Landmark| {
        Some(joint_angle(
            sample.landmark(a)?,
            sample.landmark(v)?,
            sample.landmark(c)?,
        ))
    };
    let left = side(outer.0, vertex.0, inner.0);
    let right = side(outer.1, vertex.1, inner.1);
    match (left, right) {
        (Some(l), Some(r)) => Some(l.min(r)),
        (one, other) => one.or(other),
    }
}

/// Torso angle from vertical in degrees, 0 = upright, 90 = horizontal
fn torso_lean(sample: &PoseSample) -> Option<f32> {
    let shoulders = sample.midpoint(SHOULDERS.0, SHOULDERS.1)?;
    let hips = sample.midpoint(HIPS.0, HIPS.1)?;
    let dx = (shoulders.x - hips.x).abs();
    let dy = (shoulders.y - hips.y).abs();
    Some(dx.atan2(dy).to_degrees())
}

fn height_difference(sample: &PoseSample, pair: (Landmark, Landmark)) -> Option<f32> {
    Some((sample.landmark(pair.0)?.y - sample.landmark(pair.1)?.y).abs())
}

fn body_line_issue(sample: &PoseSample) -> Option<FormIssue> {
    let shoulders = sample.midpoint(SHOULDERS.0, SHOULDERS.1)?;
    let hips = sample.midpoint(HIPS.0, HIPS.1)?;
    let ankles = sample
        .midpoint(ANKLES.0, ANKLES.1)
        .or_else(|| sample.landmark(ANKLES.0))
        .or_else(|| sample.landmark(ANKLES.1))?;

    let angle = joint_angle(shoulders, hips, ankles);
    if angle >= BODY_LINE_MIN_DEG {
        return None;
    }
    let severity = if angle < BODY_LINE_MAJOR_DEG {
        IssueSeverity::Major
    } else {
        IssueSeverity::Moderate
    };

    // Height of the shoulder-ankle line at the hip's x position
    let span = ankles.x - shoulders.x;
    let line_y = if span.abs() <= f32::EPSILON {
        (shoulders.y + ankles.y) / 2.0
    } else {
        ((hips.x - shoulders.x) / span).mul_add(ankles.y - shoulders.y, shoulders.y)
    };
    let kind = if hips.y > line_y {
        FormIssueKind::HipSag
    } else {
        FormIssueKind::HipPike
    };
    Some(issue(kind, severity))
}

fn knees_caving_in(sample: &PoseSample) -> bool {
    let (Some(lk), Some(rk), Some(la), Some(ra)) = (
        sample.landmark(KNEES.0),
        sample.landmark(KNEES.1),
        sample.landmark(ANKLES.0),
        sample.landmark(ANKLES.1),
    ) else {
        return false;
    };
    let ankle_width = (la.x - ra.x).abs();
    let knee_width = (lk.x - rk.x).abs();
    ankle_width >= FRONTAL_STANCE_MIN_WIDTH && knee_width < ankle_width * KNEE_TRACKING_RATIO
}

fn frame_issues(sample: &PoseSample, exercise: ExerciseKind) -> Vec<FormIssue> {
    let mut issues = Vec::new();

    if height_difference(sample, SHOULDERS).is_some_and(|d| d > SYMMETRY_TOLERANCE) {
        issues.push(issue(FormIssueKind::UnevenShoulders, IssueSeverity::Minor));
    }

    match exercise {
        ExerciseKind::Squat | ExerciseKind::Lunge => {
            if torso_lean(sample).is_some_and(|lean| lean > SQUAT_LEAN_LIMIT_DEG) {
                issues.push(issue(
                    FormIssueKind::ExcessiveForwardLean,
                    IssueSeverity::Moderate,
                ));
            }
            if exercise == ExerciseKind::Squat && knees_caving_in(sample) {
                issues.push(issue(FormIssueKind::KneesCavingIn, IssueSeverity::Moderate));
            }
        }
        ExerciseKind::PushUp | ExerciseKind::Plank => {
            issues.extend(body_line_issue(sample));
        }
        ExerciseKind::BenchPress => {
            if height_difference(sample, WRISTS).is_some_and(|d| d > SYMMETRY_TOLERANCE) {
                issues.push(issue(FormIssueKind::UnevenGrip, IssueSeverity::Minor));
            }
        }
        ExerciseKind::OverheadPress => {
            if torso_lean(sample).is_some_and(|lean| lean > OVERHEAD_LEAN_LIMIT_DEG) {
                issues.push(issue(
                    FormIssueKind::ExcessiveBackLean,
                    IssueSeverity::Moderate,
                ));
            }
            if height_difference(sample, WRISTS).is_some_and(|d| d > SYMMETRY_TOLERANCE) {
                issues.push(issue(FormIssueKind::UnevenGrip, IssueSeverity::Minor));
            }
        }
        ExerciseKind::BarbellRow => {
            if torso_lean(sample).is_some_and(|lean| lean < ROW_MIN_LEAN_DEG) {
                issues.push(issue(FormIssueKind::TorsoTooUpright, IssueSeverity::Minor));
            }
        }
        ExerciseKind::Deadlift => {}
    }

    issues
}

/// Per-frame joint angles for every sample where the joint chain is visible
fn side_angles(
    samples: &[PoseSample],
    outer: (Landmark, Landmark),
    vertex: (Landmark, Landmark),
    inner: (Landmark, Landmark),
) -> impl Iterator<Item = f32> + '_ {
    samples
        .iter()
        .filter_map(move |sample| min_side_angle(sample, outer, vertex, inner))
}

fn range_of_motion_issues(samples: &[PoseSample], exercise: ExerciseKind) -> Option<FormIssue> {
    match exercise {
        ExerciseKind::Squat | ExerciseKind::Lunge => {
            let deepest = side_angles(samples, HIPS, KNEES, ANKLES).reduce(f32::min)?;
            if deepest > DEPTH_MAJOR_DEG {
                Some(issue(FormIssueKind::InsufficientDepth, IssueSeverity::Major))
            } else if deepest > DEPTH_TARGET_DEG {
                Some(issue(
                    FormIssueKind::InsufficientDepth,
                    IssueSeverity::Moderate,
                ))
            } else {
                None
            }
        }
        ExerciseKind::PushUp | ExerciseKind::BenchPress => {
            let bottom = side_angles(samples, SHOULDERS, ELBOWS, WRISTS).reduce(f32::min)?;
            (bottom > ELBOW_BOTTOM_TARGET_DEG)
                .then(|| issue(FormIssueKind::PartialRange, IssueSeverity::Moderate))
        }
        ExerciseKind::OverheadPress => {
            let top = side_angles(samples, SHOULDERS, ELBOWS, WRISTS).reduce(f32::max)?;
            (top < LOCKOUT_TARGET_DEG)
                .then(|| issue(FormIssueKind::IncompleteLockout, IssueSeverity::Minor))
        }
        ExerciseKind::Plank | ExerciseKind::Deadlift | ExerciseKind::BarbellRow => None,
    }
}
