// ABOUTME: Default tuning constants for the exercise-session data-quality state machine
// ABOUTME: Buffer capacities, quality grade boundaries, rep detection bands, and timings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Empirical tuning values for pose-sample collection.
//!
//! These were tuned by hand against live sessions at roughly ten samples per
//! second. None of them is derived from a model.

/// Sample buffer capacity (oldest evicted beyond this)
pub const SAMPLE_BUFFER_CAPACITY: usize = 100;

/// Movement history capacity for the rep detector
pub const MOVEMENT_HISTORY_CAPACITY: usize = 30;

/// Minimum movement history before rep logic runs
pub const MIN_HISTORY_POINTS: usize = 10;

/// Number of trailing history points used for the movement range
pub const RANGE_WINDOW: usize = 10;

/// Minimum milliseconds between two counted reps
pub const REP_DEBOUNCE_MS: u64 = 500;

/// Fraction of the movement threshold above the average that enters the down phase
pub const DOWN_BAND_FACTOR: f32 = 0.5;

/// Fraction of the movement threshold below the average that completes a rep
pub const UP_BAND_FACTOR: f32 = 0.3;

/// Below this many buffered frames the data is insufficient
pub const INSUFFICIENT_FRAMES: usize = 10;

/// Minimum buffered frames for any analysis
pub const MIN_FRAMES: usize = 30;

/// Buffered frames separating moderate from good quality
pub const MODERATE_FRAMES: usize = 50;

/// Buffered frames that auto-complete a session
pub const AUTO_COMPLETE_FRAMES: usize = 80;

/// Reps needed for full sufficiency on dynamic exercises
pub const MIN_REPS: u32 = 3;

/// Reps that auto-complete a dynamic exercise session
pub const AUTO_COMPLETE_REPS: u32 = 5;

/// Consecutive invalid frames treated as "user finished" once enough data exists
pub const MAX_CONSECUTIVE_INVALID_FRAMES: u32 = 15;

/// Accepted samples between passive single-frame estimates
pub const PASSIVE_ANALYSIS_INTERVAL: u64 = 10;

/// Countdown length before collection begins
pub const COUNTDOWN_SECONDS: u32 = 5;

/// Default movement threshold for exercises without a tuned value
pub const DEFAULT_MOVEMENT_THRESHOLD: f32 = 0.10;

/// Per-exercise movement thresholds (normalized image height, peak-to-peak)
pub mod movement_thresholds {
    /// Squat hip travel
    pub const SQUAT: f32 = 0.15;
    /// Push-up shoulder travel
    pub const PUSH_UP: f32 = 0.08;
    /// Bench press shoulder travel
    pub const BENCH_PRESS: f32 = 0.06;
    /// Deadlift shoulder travel
    pub const DEADLIFT: f32 = 0.12;
    /// Overhead press wrist travel
    pub const OVERHEAD_PRESS: f32 = 0.10;
    /// Barbell row shoulder travel
    pub const BARBELL_ROW: f32 = 0.08;
    /// Lunge hip travel
    pub const LUNGE: f32 = 0.12;
}
