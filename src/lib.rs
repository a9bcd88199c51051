// ABOUTME: Library entry point for Pierre real-time exercise form analysis
// ABOUTME: Turns streamed pose samples into rep counts, data-quality grades, and form scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Form Analysis
//!
//! Session core for camera-based exercise form analysis. A pose-inference
//! collaborator streams skeletal landmarks into a session; the session
//! validates and buffers them, counts reps, grades how much usable data
//! has been collected, and hands the buffer to a scorer.
//!
//! ## Architecture
//!
//! - **Models** (`pierre-core`): landmarks, pose samples, exercise kinds
//! - **Form analysis**: validator, sample buffer, rep detector, quality
//!   classifier, scorers, and the session state machine
//! - **Session actor**: tokio task driving the state machine, observed via
//!   a `watch` channel
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_form_analysis::config::SessionConfig;
//! use pierre_form_analysis::errors::AppResult;
//! use pierre_form_analysis::form_analysis::scoring::LocalFormScorer;
//! use pierre_form_analysis::form_analysis::session::SessionActor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = SessionConfig::from_env()?;
//!     let session = SessionActor::spawn(config, Arc::new(LocalFormScorer::new()))?;
//!     session.start_analysis().await?;
//!     println!("phase: {}", session.snapshot().phase);
//!     Ok(())
//! }
//! ```

/// Session tuning configuration
pub mod config;

/// Tuning constants
pub mod constants;

/// Unified error types
pub mod errors;

/// Pose-sample session core
pub mod form_analysis;

/// Structured logging setup
pub mod logging;

/// Pose and exercise models
pub mod models;
