// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants organized by domain for the form-analysis core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.
//! Every value here is a default; the session configuration can override them.

/// Form-analysis session tuning constants (buffers, thresholds, timings)
pub mod form_analysis;

/// Service identifiers used in structured logs
pub mod service_names {
    /// Service name of the form-analysis session core
    pub const PIERRE_FORM_ANALYSIS: &str = "pierre-form-analysis";
    /// Scorer name used for the built-in heuristic scorer
    pub const LOCAL_FORM_SCORER: &str = "local-form-scorer";
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// Prefix shared by all session tuning variables
    pub const FORM_ENV_PREFIX: &str = "PIERRE_FORM_";
    /// Prefix for per-exercise movement threshold overrides
    pub const THRESHOLD_ENV_PREFIX: &str = "PIERRE_FORM_THRESHOLD_";
}
