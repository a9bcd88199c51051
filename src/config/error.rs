// ABOUTME: Configuration error types for session tuning validation
// ABOUTME: Defines error variants for invalid ranges, parse failures, and inconsistent limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for session tuning validation.

use pierre_core::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Limits that must be ordered are not (e.g., min frames above auto-complete frames)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Failed to parse configuration value
    #[error("Parse error for {key}: {value:?}")]
    Parse {
        /// Environment variable that failed to parse
        key: String,
        /// Raw value that was rejected
        value: String,
    },

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let code = match error {
            ConfigError::Parse { .. } => ErrorCode::ConfigError,
            ConfigError::InvalidRange(_) | ConfigError::ValueOutOfRange(_) => {
                ErrorCode::ConfigInvalid
            }
        };
        Self::new(code, error.to_string())
    }
}
