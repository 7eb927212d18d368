// ABOUTME: Unit tests for environment-driven sync configuration
// ABOUTME: Defaults, overrides, unit conversion and rejected values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;

use solid_health_sync::config::environment::keys;
use solid_health_sync::config::{EngineSettings, ProviderKind, SyncConfig};
use solid_health_sync::type_index::PodLayout;

const ALL_KEYS: [&str; 10] = [
    keys::POD_TIMEOUT_SECS,
    keys::CONNECT_TIMEOUT_SECS,
    keys::BATCH_SIZE,
    keys::MODIFY_TOLERANCE,
    keys::HR_WINDOW_SECS,
    keys::HR_DELTA,
    keys::CONTAINER_PATH,
    keys::OBSERVATION_FILE,
    keys::MAX_MONTHS,
    keys::PROVIDER,
];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = SyncConfig::from_env().unwrap();

    assert_eq!(config, SyncConfig::default());
    assert_eq!(config.provider, ProviderKind::GoogleFit);
    assert_eq!(config.engine.batch_size, 50);
    assert!((config.engine.modify_tolerance - 0.01).abs() < f64::EPSILON);
    assert_eq!(config.engine.heart_rate_window_ms, 60_000);
    assert_eq!(config.engine.max_months, None);
    assert_eq!(config.engine.layout, PodLayout::default());
    assert_eq!(config.engine.layout.container_path, "/private/health/");
    assert_eq!(config.engine.layout.observation_file, "fitness.ttl");
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(keys::BATCH_SIZE, "10");
    env::set_var(keys::MODIFY_TOLERANCE, "0.5");
    env::set_var(keys::HR_WINDOW_SECS, "90");
    env::set_var(keys::HR_DELTA, "2");
    env::set_var(keys::CONTAINER_PATH, "/health/");
    env::set_var(keys::OBSERVATION_FILE, "vitals.ttl");
    env::set_var(keys::MAX_MONTHS, "12");
    env::set_var(keys::PROVIDER, "synthetic");
    env::set_var(keys::POD_TIMEOUT_SECS, "5");

    let config = SyncConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.provider, ProviderKind::Synthetic);
    assert_eq!(config.http.request_secs, 5);
    assert_eq!(
        config.engine,
        EngineSettings {
            batch_size: 10,
            modify_tolerance: 0.5,
            heart_rate_window_ms: 90_000,
            heart_rate_delta: 2.0,
            max_months: Some(12),
            layout: PodLayout {
                container_path: "/health/".to_owned(),
                observation_file: "vitals.ttl".to_owned(),
            },
        }
    );
    assert!(config.summary().contains("Batch size: 10"));
}

#[test]
#[serial]
fn test_unparseable_value_is_rejected() {
    clear_env();
    env::set_var(keys::BATCH_SIZE, "fifty");
    let err = SyncConfig::from_env().unwrap_err();
    clear_env();
    assert!(err.to_string().contains(keys::BATCH_SIZE));
}

#[test]
#[serial]
fn test_out_of_range_values_are_rejected() {
    for (key, value) in [
        (keys::BATCH_SIZE, "0"),
        (keys::MAX_MONTHS, "0"),
        (keys::MODIFY_TOLERANCE, "-1"),
        (keys::CONTAINER_PATH, "/private/health"),
        (keys::OBSERVATION_FILE, "nested/fitness.ttl"),
        (keys::PROVIDER, "strava"),
    ] {
        clear_env();
        env::set_var(key, value);
        assert!(
            SyncConfig::from_env().is_err(),
            "{key}={value} should be rejected"
        );
    }
    clear_env();
}

#[test]
fn test_provider_kind_display_round_trips() {
    for kind in [ProviderKind::GoogleFit, ProviderKind::Synthetic] {
        assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
    }
}
