// ABOUTME: Session error taxonomy carrying diagnostic context for precondition failures
// ABOUTME: Converts into the unified AppError with matching error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::phase::SessionPhase;
use crate::form_analysis::scoring::ScorerError;
use pierre_core::errors::{AppError, ErrorCode};
use serde::Serialize;
use thiserror::Error;

/// State of the session when an error was raised, for rendering diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticContext {
    /// Buffered valid samples
    pub frames_collected: usize,
    /// Reps counted so far
    pub reps_detected: u32,
    /// Phase at the time of the error
    pub phase: SessionPhase,
    /// Whether any sample arrived since the last reset
    pub camera_active: bool,
}

/// Recoverable session failures
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionError {
    /// Analysis requested with an empty buffer
    #[error("No pose detected, make sure your whole body is visible to the camera")]
    NoPoseDetected {
        /// Session state
        context: DiagnosticContext,
    },

    /// Analysis requested before enough frames were buffered
    #[error("Insufficient frames: collected {collected}, need at least {required}")]
    InsufficientFrames {
        /// Buffered frames
        collected: usize,
        /// Frames required
        required: usize,
        /// Session state
        context: DiagnosticContext,
    },

    /// Analysis requested for a rep-based exercise with no reps counted
    #[error("Insufficient reps: detected {detected}, need at least {required}")]
    InsufficientReps {
        /// Reps counted
        detected: u32,
        /// Reps required
        required: u32,
        /// Session state
        context: DiagnosticContext,
    },

    /// Operation not allowed in the current phase
    #[error("Cannot {operation} while session is {phase}")]
    InvalidPhase {
        /// Rejected operation
        operation: &'static str,
        /// Phase at the time of the request
        phase: SessionPhase,
    },

    /// The scorer collaborator failed
    #[error("Scorer {scorer} failed: {source}")]
    ScorerFailed {
        /// Scorer name
        scorer: &'static str,
        /// Failure reported by the scorer
        source: ScorerError,
    },
}

impl SessionError {
    /// Diagnostic context for precondition failures
    #[must_use]
    pub const fn context(&self) -> Option<&DiagnosticContext> {
        match self {
            Self::NoPoseDetected { context }
            | Self::InsufficientFrames { context, .. }
            | Self::InsufficientReps { context, .. } => Some(context),
            Self::InvalidPhase { .. } | Self::ScorerFailed { .. } => None,
        }
    }

    /// Whether collection can simply continue after this error
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        self.context().is_some()
    }
}

impl From<SessionError> for AppError {
    fn from(error: SessionError) -> Self {
        let message = error.to_string();
        match error {
            SessionError::NoPoseDetected { context }
            | SessionError::InsufficientFrames { context, .. }
            | SessionError::InsufficientReps { context, .. } => {
                Self::new(ErrorCode::InsufficientData, message)
                    .with_details(serde_json::to_value(context).unwrap_or_default())
            }
            SessionError::InvalidPhase { .. } => Self::new(ErrorCode::InvalidState, message),
            SessionError::ScorerFailed { source, .. } => {
                let code = Self::from(source.clone()).code;
                Self::new(code, message).with_source(source)
            }
        }
    }
}
