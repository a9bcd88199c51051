// ABOUTME: Session lifecycle phases from idle through countdown, collection, and analysis
// ABOUTME: Serializable so snapshots can be rendered or logged directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Where a form-analysis session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing collected, waiting for a start request
    #[default]
    Idle,
    /// Counting down before collection begins
    Countdown,
    /// Buffering valid samples and counting reps
    Collecting,
    /// Waiting on the scorer; samples are ignored
    Analyzing,
    /// Result available until the next start
    Complete,
}

impl SessionPhase {
    /// Lowercase name used in logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Countdown => "countdown",
            Self::Collecting => "collecting",
            Self::Analyzing => "analyzing",
            Self::Complete => "complete",
        }
    }

    /// Whether incoming samples are buffered in this phase
    #[must_use]
    pub const fn accepts_samples(&self) -> bool {
        matches!(self, Self::Collecting)
    }
}

impl Display for SessionPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
