// ABOUTME: Core data models for the form-analysis session core
// ABOUTME: Re-exports PoseSample, Landmark, Point3, ExerciseKind and SessionMode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Data structures shared between the session core and its collaborators.
//! Pose samples come from an external pose-inference model; exercise kind
//! and session mode are chosen by the presentation layer.
//!
//! ## Core Models
//!
//! - `PoseSample`: timestamped map from joint to normalized point
//! - `Landmark`: skeletal joint identifier
//! - `ExerciseKind`: strength exercise being recorded
//! - `SessionMode`: running or gym collection

mod exercise;
mod pose;

pub use exercise::{ExerciseKind, SessionMode};
pub use pose::{Landmark, Point3, PoseSample};
