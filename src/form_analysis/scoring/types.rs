// ABOUTME: Scorer collaborator contract: score requests, results, form issues, and errors
// ABOUTME: Defines the async FormScorer trait implemented by remote and local scorers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use bytes::Bytes;
use pierre_core::errors::{AppError, ErrorCode};
use pierre_core::models::{ExerciseKind, PoseSample, SessionMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Still image captured by the camera layer and passed through to the scorer untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Capture time on the producer's clock
    pub captured_at_ms: u64,
    /// Encoding of `payload`, e.g. `image/jpeg`
    pub mime_type: String,
    /// Encoded image bytes
    pub payload: Bytes,
}

/// Everything a scorer receives for one analysis
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    /// Buffered samples, oldest first
    pub samples: Vec<PoseSample>,
    /// Stills captured alongside the samples
    pub captured_frames: Vec<CapturedFrame>,
    /// Exercise being scored
    pub exercise: ExerciseKind,
    /// Collection mode
    pub mode: SessionMode,
    /// Reps counted by the session
    pub reps_detected: u32,
}

/// Where a score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// External multi-frame scorer
    Remote,
    /// Built-in heuristic estimate
    LocalEstimate,
}

/// How much a form issue costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// Cosmetic, keep an eye on it
    Minor,
    /// Affects the training effect
    Moderate,
    /// Injury risk
    Major,
}

impl IssueSeverity {
    /// Points taken off the overall score
    #[must_use]
    pub const fn penalty(&self) -> u8 {
        match self {
            Self::Minor => 5,
            Self::Moderate => 12,
            Self::Major => 25,
        }
    }
}

/// Recognized form faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormIssueKind {
    /// One shoulder noticeably higher than the other
    UnevenShoulders,
    /// Torso pitched too far forward
    ExcessiveForwardLean,
    /// Torso leaning back under an overhead load
    ExcessiveBackLean,
    /// Hips dropped below the shoulder-ankle line
    HipSag,
    /// Hips raised above the shoulder-ankle line
    HipPike,
    /// Squat or lunge not deep enough
    InsufficientDepth,
    /// Knees collapsing inward
    KneesCavingIn,
    /// Press or push-up not reaching the bottom
    PartialRange,
    /// Overhead press not locked out
    IncompleteLockout,
    /// Hands at different heights
    UnevenGrip,
    /// Row performed too upright
    TorsoTooUpright,
}

/// One detected fault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormIssue {
    /// Fault category
    pub kind: FormIssueKind,
    /// How serious it is
    pub severity: IssueSeverity,
    /// Coaching cue for the user
    pub message: String,
}

/// Outcome of scoring a session or a single frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0-100, higher is better
    pub overall_score: u8,
    /// Faults found, most severe first
    pub form_issues: Vec<FormIssue>,
    /// Reps the score refers to
    pub reps_counted: u32,
    /// Samples the scorer looked at
    pub frames_analyzed: usize,
    /// Producer of the score
    pub source: ScoreSource,
    /// One-line human summary
    pub summary: String,
}

/// Failures reported by a scorer collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ScorerError {
    /// The scorer gave up waiting
    #[error("scorer timed out after {after_ms} ms")]
    Timeout {
        /// Elapsed time before giving up
        after_ms: u64,
    },
    /// The scorer could not be reached
    #[error("scorer unavailable: {0}")]
    Unavailable(String),
    /// The scorer answered with something unusable
    #[error("invalid scorer response: {0}")]
    InvalidResponse(String),
    /// The scorer refused the request
    #[error("scorer rejected request: {0}")]
    Rejected(String),
}

impl From<ScorerError> for AppError {
    fn from(error: ScorerError) -> Self {
        let code = match error {
            ScorerError::Timeout { .. } | ScorerError::Unavailable(_) => {
                ErrorCode::ExternalServiceUnavailable
            }
            ScorerError::InvalidResponse(_) | ScorerError::Rejected(_) => {
                ErrorCode::ExternalServiceError
            }
        };
        Self::new(code, error.to_string())
    }
}

/// External scoring collaborator invoked once per analysis
///
/// Timeouts are the implementation's responsibility; the session treats the
/// call as a suspension point and ignores samples until it resolves.
#[async_trait]
pub trait FormScorer: Send + Sync {
    /// Score the buffered samples (and any captured stills)
    async fn score_samples(&self, request: ScoreRequest) -> Result<ScoreResult, ScorerError>;

    /// Scorer name for logs
    fn name(&self) -> &'static str;
}
