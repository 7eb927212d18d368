// ABOUTME: Unit tests for logging configuration
// ABOUTME: Environment parsing, verbosity and filter directives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;

use solid_health_sync::logging::{LogFormat, LoggingConfig};

fn clear_env() {
    for key in [
        "RUST_LOG",
        "LOG_FORMAT",
        "ENVIRONMENT",
        "SERVICE_NAME",
        "LOG_INCLUDE_LOCATION",
        "LOG_INCLUDE_SPANS",
    ] {
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
    env::set_var("SERVICE_NAME", "test-service");

    let config = LoggingConfig::from_env();
    clear_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.environment, "production");
    assert_eq!(config.service_name, "test-service");
    // production always records source locations
    assert!(config.include_location);
    assert!(!config.include_spans);
}

#[test]
#[serial]
fn test_default_logging_config() {
    clear_env();
    let config = LoggingConfig::from_env();

    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.environment, "development");
    assert_eq!(config.service_name, "solid-health-sync");
    assert!(!config.include_location);
}

#[test]
#[serial]
fn test_verbose_respects_explicit_level() {
    clear_env();
    assert_eq!(LoggingConfig::from_env().verbose(true).level, "debug");
    assert_eq!(LoggingConfig::from_env().verbose(false).level, "info");

    env::set_var("RUST_LOG", "warn");
    let config = LoggingConfig::from_env().verbose(true);
    clear_env();
    assert_eq!(config.level, "warn");
}

#[test]
fn test_filter_quiets_http_internals() {
    let config = LoggingConfig {
        level: "trace".into(),
        ..LoggingConfig::default()
    };
    let rendered = config.env_filter().to_string();
    for noisy in ["hyper=warn", "hyper_util=warn", "reqwest=warn", "rustls=warn"] {
        assert!(rendered.contains(noisy), "{noisy} missing from {rendered}");
    }
    assert!(rendered.contains("solid_health_sync=trace"));
}
