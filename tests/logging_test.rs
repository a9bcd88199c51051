// ABOUTME: Unit tests for logging configuration loaded from the environment
// ABOUTME: Validates format selection, production defaults, and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_form_analysis::logging::{LogFormat, LoggingConfig};
use serial_test::serial;
use std::env;

const LOGGING_VARS: [&str; 6] = [
    "RUST_LOG",
    "LOG_FORMAT",
    "ENVIRONMENT",
    "SERVICE_NAME",
    "LOG_INCLUDE_LOCATION",
    "LOG_INCLUDE_THREAD",
];

fn clear_env() {
    for key in LOGGING_VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    clear_env();
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("SERVICE_NAME", "form-replay-test");

    let config = LoggingConfig::from_env();
    clear_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.environment, "production");
    assert_eq!(config.service_name, "form-replay-test");
    // Production always records source locations
    assert!(config.include_location);
    assert!(!config.include_thread);
}

#[test]
#[serial]
fn test_logging_config_defaults() {
    clear_env();

    let config = LoggingConfig::from_env();

    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.environment, "development");
    assert_eq!(config.service_name, "pierre-form-analysis");
    assert!(!config.include_location);
}

#[test]
#[serial]
fn test_compact_format_selection() {
    clear_env();
    env::set_var("LOG_FORMAT", "compact");
    env::set_var("LOG_INCLUDE_THREAD", "1");

    let config = LoggingConfig::from_env();
    clear_env();

    assert_eq!(config.format, LogFormat::Compact);
    assert!(config.include_thread);
}

#[test]
fn test_default_config_matches_crate_version() {
    let config = LoggingConfig::default();
    assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
    assert_eq!(config.format, LogFormat::Pretty);
}
