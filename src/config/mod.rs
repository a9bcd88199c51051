// ABOUTME: Configuration management module for session tuning and runtime options
// ABOUTME: Re-exports SessionConfig and ConfigError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the form-analysis session core
//!
//! - **Session**: buffer capacities, quality boundaries, rep detection bands, timings
//! - **Error**: validation failures for inconsistent or malformed values
//!
//! Configuration is environment-only, like the rest of the Pierre platform.

/// Configuration validation errors
pub mod error;
/// Session tuning configuration
pub mod session;

pub use error::ConfigError;
pub use session::SessionConfig;
