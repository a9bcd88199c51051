// ABOUTME: Tuning constants re-exported from the pierre-core foundation crate
// ABOUTME: Buffer sizes, rep detection bands, quality thresholds, and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_core::constants::*;
