// ABOUTME: Exercise kind and session mode enumerations for form analysis
// ABOUTME: Defines strength exercises, the running mode, parsing and display implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::errors::AppError;

/// Strength exercises the session core knows how to gate and count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Barbell or bodyweight squat (default)
    #[default]
    Squat,
    /// Push-up
    PushUp,
    /// Plank hold, the only static exercise
    Plank,
    /// Conventional deadlift
    Deadlift,
    /// Forward or reverse lunge
    Lunge,
    /// Flat bench press
    BenchPress,
    /// Standing overhead press
    OverheadPress,
    /// Bent-over barbell row
    BarbellRow,
}

impl ExerciseKind {
    /// Every exercise kind
    pub const ALL: [Self; 8] = [
        Self::Squat,
        Self::PushUp,
        Self::Plank,
        Self::Deadlift,
        Self::Lunge,
        Self::BenchPress,
        Self::OverheadPress,
        Self::BarbellRow,
    ];

    /// Snake-case identifier, identical to the serialized form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::PushUp => "push_up",
            Self::Plank => "plank",
            Self::Deadlift => "deadlift",
            Self::Lunge => "lunge",
            Self::BenchPress => "bench_press",
            Self::OverheadPress => "overhead_press",
            Self::BarbellRow => "barbell_row",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Squat => "Squat",
            Self::PushUp => "Push-up",
            Self::Plank => "Plank",
            Self::Deadlift => "Deadlift",
            Self::Lunge => "Lunge",
            Self::BenchPress => "Bench press",
            Self::OverheadPress => "Overhead press",
            Self::BarbellRow => "Barbell row",
        }
    }

    /// Static holds have no repetitions
    #[must_use]
    pub const fn is_static(&self) -> bool {
        matches!(self, Self::Plank)
    }
}

impl Display for ExerciseKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "squat" => Ok(Self::Squat),
            "push_up" | "pushup" => Ok(Self::PushUp),
            "plank" => Ok(Self::Plank),
            "deadlift" => Ok(Self::Deadlift),
            "lunge" => Ok(Self::Lunge),
            "bench_press" | "bench" => Ok(Self::BenchPress),
            "overhead_press" | "ohp" => Ok(Self::OverheadPress),
            "barbell_row" | "row" => Ok(Self::BarbellRow),
            _ => Err(AppError::invalid_input(format!("Unknown exercise kind: {s}"))),
        }
    }
}

/// Collection mode selected by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Running gait capture, frame-count thresholds only
    Running,
    /// Strength training with rep detection (default)
    #[default]
    Gym,
}

impl SessionMode {
    /// Whether rep detection runs in this mode
    #[must_use]
    pub const fn is_gym(&self) -> bool {
        matches!(self, Self::Gym)
    }

    /// Snake-case identifier, identical to the serialized form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Gym => "gym",
        }
    }
}

impl Display for SessionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" | "run" => Ok(Self::Running),
            "gym" | "strength" => Ok(Self::Gym),
            _ => Err(AppError::invalid_input(format!("Unknown session mode: {s}"))),
        }
    }
}

