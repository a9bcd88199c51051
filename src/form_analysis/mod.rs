// ABOUTME: Real-time exercise form analysis from streamed pose samples
// ABOUTME: Validation, buffering, rep detection, quality grading, scoring, and session control
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Form Analysis
//!
//! A pose-inference collaborator pushes one [`PoseSample`](pierre_core::models::PoseSample)
//! per analyzed frame into a [`session::SessionHandle`]. The session
//! validates each sample against the selected exercise, buffers the good
//! ones, counts reps from the tracked joint pair, grades the collected
//! data, and hands the buffer to a [`scoring::FormScorer`] once the user
//! asks for it or enough has been collected.

/// Per-exercise landmark and threshold table
pub mod exercise_profile;
/// Data-quality grading
pub mod quality;
/// Repetition counting
pub mod rep_detector;
/// JSON Lines pose recordings
pub mod replay;
/// Bounded FIFO buffers
pub mod sample_buffer;
/// Scorer contract and local heuristic scorer
pub mod scoring;
/// Session state machine and actor
pub mod session;
/// Per-sample landmark validation
pub mod validator;

pub use exercise_profile::ExerciseProfile;
pub use quality::{QualityClassifier, QualityGrade};
pub use rep_detector::RepDetector;
pub use sample_buffer::{BoundedBuffer, SampleBuffer};
pub use validator::{SampleValidator, SampleVerdict};
