// ABOUTME: Environment configuration for the sync engine and its HTTP clients
// ABOUTME: Reads SOLID_HEALTH_* variables with typed defaults and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::type_index::PodLayout;
use solid_health_core::constants::{pod, sync, timeouts};
use solid_health_providers::HttpTimeouts;

/// Environment variable names
pub mod keys {
    /// Per-request pod timeout in seconds
    pub const POD_TIMEOUT_SECS: &str = "SOLID_HEALTH_POD_TIMEOUT_SECS";
    /// Connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: &str = "SOLID_HEALTH_CONNECT_TIMEOUT_SECS";
    /// Observations per upload PATCH
    pub const BATCH_SIZE: &str = "SOLID_HEALTH_BATCH_SIZE";
    /// Minimum difference that rewrites a stored value
    pub const MODIFY_TOLERANCE: &str = "SOLID_HEALTH_MODIFY_TOLERANCE";
    /// Heart-rate burst window in seconds
    pub const HR_WINDOW_SECS: &str = "SOLID_HEALTH_HR_WINDOW_SECS";
    /// Heart-rate burst value delta
    pub const HR_DELTA: &str = "SOLID_HEALTH_HR_DELTA";
    /// Container created on bootstrap
    pub const CONTAINER_PATH: &str = "SOLID_HEALTH_CONTAINER_PATH";
    /// Observation document name
    pub const OBSERVATION_FILE: &str = "SOLID_HEALTH_OBSERVATION_FILE";
    /// Optional limit on months walked per run
    pub const MAX_MONTHS: &str = "SOLID_HEALTH_MAX_MONTHS";
    /// Fitness data source
    pub const PROVIDER: &str = "SOLID_HEALTH_PROVIDER";
}

/// Fitness data source selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Google Fit REST API
    #[default]
    GoogleFit,
    /// In-memory synthetic samples
    Synthetic,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "google-fit" | "google_fit" | "googlefit" => Ok(Self::GoogleFit),
            "synthetic" => Ok(Self::Synthetic),
            other => Err(anyhow!("unknown provider '{other}'")),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoogleFit => write!(f, "google-fit"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Reconciliation tuning
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Observations per upload PATCH
    pub batch_size: usize,
    /// Stored values within this distance of the provider value are kept
    pub modify_tolerance: f64,
    /// Heart-rate readings closer than this to the previous one may collapse
    pub heart_rate_window_ms: i64,
    /// Heart-rate readings within this value of the previous one may collapse
    pub heart_rate_delta: f64,
    /// Stop after this many months even while uploads continue
    pub max_months: Option<u32>,
    /// Bootstrap layout
    pub layout: PodLayout,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            batch_size: sync::UPLOAD_BATCH_SIZE,
            modify_tolerance: sync::MODIFY_TOLERANCE,
            heart_rate_window_ms: sync::HEART_RATE_COLLAPSE_WINDOW_MS,
            heart_rate_delta: sync::HEART_RATE_COLLAPSE_DELTA,
            max_months: None,
            layout: PodLayout::default(),
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncConfig {
    /// Outbound HTTP timeouts
    pub http: HttpTimeouts,
    /// Reconciliation tuning
    pub engine: EngineSettings,
    /// Fitness data source
    pub provider: ProviderKind,
}

impl SyncConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable or invalid value
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let hr_window_secs: i64 = parse_env(
            keys::HR_WINDOW_SECS,
            sync::HEART_RATE_COLLAPSE_WINDOW_MS / 1000,
        )?;
        let max_months = match env::var(keys::MAX_MONTHS) {
            Ok(value) if !value.trim().is_empty() => Some(
                value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid {} value", keys::MAX_MONTHS))?,
            ),
            _ => None,
        };

        let config = Self {
            http: HttpTimeouts {
                request_secs: parse_env(keys::POD_TIMEOUT_SECS, timeouts::POD_REQUEST_TIMEOUT_SECS)?,
                connect_secs: parse_env(keys::CONNECT_TIMEOUT_SECS, timeouts::CONNECT_TIMEOUT_SECS)?,
            },
            engine: EngineSettings {
                batch_size: parse_env(keys::BATCH_SIZE, sync::UPLOAD_BATCH_SIZE)?,
                modify_tolerance: parse_env(keys::MODIFY_TOLERANCE, sync::MODIFY_TOLERANCE)?,
                heart_rate_window_ms: hr_window_secs.saturating_mul(1000),
                heart_rate_delta: parse_env(keys::HR_DELTA, sync::HEART_RATE_COLLAPSE_DELTA)?,
                max_months,
                layout: PodLayout {
                    container_path: env_var_or(keys::CONTAINER_PATH, pod::DEFAULT_CONTAINER_PATH),
                    observation_file: env_var_or(
                        keys::OBSERVATION_FILE,
                        pod::DEFAULT_OBSERVATION_FILE,
                    ),
                },
            },
            provider: env_var_or(keys::PROVIDER, "google-fit").parse()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.http.request_secs == 0 {
            return Err(anyhow!("{} must be greater than zero", keys::POD_TIMEOUT_SECS));
        }
        if self.engine.batch_size == 0 {
            return Err(anyhow!("{} must be greater than zero", keys::BATCH_SIZE));
        }
        if is_negative(self.engine.modify_tolerance) {
            return Err(anyhow!("{} must not be negative", keys::MODIFY_TOLERANCE));
        }
        if self.engine.heart_rate_window_ms < 0 || is_negative(self.engine.heart_rate_delta) {
            return Err(anyhow!("heart-rate collapse settings must not be negative"));
        }
        if !self.engine.layout.container_path.ends_with('/') {
            return Err(anyhow!("{} must end with '/'", keys::CONTAINER_PATH));
        }
        if self.engine.layout.observation_file.is_empty()
            || self.engine.layout.observation_file.contains('/')
        {
            return Err(anyhow!("{} must be a plain file name", keys::OBSERVATION_FILE));
        }
        if self.engine.max_months == Some(0) {
            return Err(anyhow!("{} must be at least 1", keys::MAX_MONTHS));
        }
        Ok(())
    }

    /// Human readable configuration summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Solid Health Sync Configuration:\n\
             - Provider: {}\n\
             - Pod timeout: {}s (connect {}s)\n\
             - Batch size: {}\n\
             - Modify tolerance: {}\n\
             - Heart-rate collapse: {}ms / {}\n\
             - Bootstrap location: {}{}\n\
             - Month limit: {}",
            self.provider,
            self.http.request_secs,
            self.http.connect_secs,
            self.engine.batch_size,
            self.engine.modify_tolerance,
            self.engine.heart_rate_window_ms,
            self.engine.heart_rate_delta,
            self.engine.layout.container_path,
            self.engine.layout.observation_file,
            self.engine
                .max_months
                .map_or_else(|| "none".to_owned(), |m| m.to_string()),
        )
    }
}

/// NaN counts as negative so it never passes validation
fn is_negative(value: f64) -> bool {
    value.is_nan() || value < 0.0
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value")),
        Err(_) => Ok(default),
    }
}
