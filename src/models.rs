// ABOUTME: Pose and exercise models re-exported from the pierre-core foundation crate
// ABOUTME: Landmarks, pose samples, exercise kinds, and session modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_core::models::*;
