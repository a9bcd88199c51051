// ABOUTME: Scoring collaborators for collected pose data
// ABOUTME: Re-exports the FormScorer contract and the built-in heuristic scorer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Built-in heuristic scorer
pub mod local;
/// Scorer contract and result types
pub mod types;

pub use local::LocalFormScorer;
pub use types::{
    CapturedFrame, FormIssue, FormIssueKind, FormScorer, IssueSeverity, ScoreRequest, ScoreResult,
    ScoreSource, ScorerError,
};
