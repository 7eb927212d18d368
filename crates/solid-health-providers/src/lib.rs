// ABOUTME: Fitness data source implementations for Google Fit and synthetic data
// ABOUTME: Core source trait, shared HTTP client, and provider clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Fitness data sources feeding the pod sync engine.
//!
//! A source is read-only: it reports raw `{date, value}` samples per metric
//! category and date window. "No data for this period" is always an empty
//! list, never an error.

pub use solid_health_core::{constants, errors, models};

/// Core data source trait
pub mod core;
/// Shared HTTP client for provider and pod calls
pub mod http_client;

/// Google Fit REST client
#[cfg(feature = "provider-google-fit")]
pub mod google_fit;
/// In-memory source for demos and tests
#[cfg(feature = "provider-synthetic")]
pub mod synthetic;

pub use crate::core::FitnessDataSource;
#[cfg(feature = "provider-google-fit")]
pub use google_fit::{GoogleFitConfig, GoogleFitProvider};
pub use http_client::{build_client, initialize_shared_client, shared_client, HttpTimeouts};
pub use solid_health_core::errors::provider::{ProviderError, ProviderResult};
#[cfg(feature = "provider-synthetic")]
pub use synthetic::SyntheticSource;
