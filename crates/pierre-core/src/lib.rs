// ABOUTME: Core types and constants for Pierre exercise form analysis
// ABOUTME: Foundation crate with error handling, pose models, and tuning constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Core
//!
//! Foundation crate providing shared types and constants for the Pierre
//! form-analysis session core. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ErrorContext`
//! - **constants**: Tuning constants organized by domain
//! - **models**: Pose samples, skeletal landmarks, exercise kinds, and session modes

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants and tuning values organized by domain
pub mod constants;

/// Core data models (`PoseSample`, `Landmark`, `ExerciseKind`, `SessionMode`)
pub mod models;
