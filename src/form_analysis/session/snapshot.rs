// ABOUTME: Observable session state published to the presentation layer
// ABOUTME: Immutable value copied out of the controller after every transition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::error::SessionError;
use super::phase::SessionPhase;
use crate::form_analysis::quality::QualityGrade;
use crate::form_analysis::scoring::ScoreResult;
use pierre_core::models::{ExerciseKind, PoseSample, SessionMode};
use serde::Serialize;

/// Point-in-time view of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Current phase
    pub phase: SessionPhase,
    /// Selected exercise
    pub exercise: ExerciseKind,
    /// Selected mode
    pub mode: SessionMode,
    /// Seconds left in the countdown, 0 outside it
    pub countdown_seconds_remaining: u32,
    /// Buffered valid samples
    pub frames_collected: usize,
    /// Reps counted
    pub reps_detected: u32,
    /// Grade of the data collected so far
    pub data_quality: QualityGrade,
    /// Whether the last sample contained any landmark
    pub pose_detected: bool,
    /// Last sample received, valid or not, for the skeleton overlay
    pub current_sample: Option<PoseSample>,
    /// Last error, cleared by a reset or the next analysis request
    pub error: Option<SessionError>,
    /// Latest single-frame estimate from passive re-analysis
    pub live_estimate: Option<ScoreResult>,
    /// Final analysis once complete
    pub result: Option<ScoreResult>,
}
