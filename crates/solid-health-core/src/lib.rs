// ABOUTME: Core types and constants for the Solid Health sync engine
// ABOUTME: Foundation crate with error taxonomy, health data models, and RDF vocabulary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Solid Health Core
//!
//! Foundation crate shared by the sync engine and the provider clients. It is
//! designed to change infrequently so the rest of the workspace compiles
//! incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: `SyncError`, `ProviderError` and the `ErrorCode` categories
//! - **models**: `DataPoint`, `PodDataPoint`, `MetricCategory`, `Profile`, `SyncStatus`
//! - **constants**: RDF namespaces, LOINC codes, units and engine defaults

/// Error taxonomy for sync runs and provider calls
pub mod errors;

/// Vocabulary IRIs, clinical codes and engine defaults
pub mod constants;

/// Health data and session models
pub mod models;

pub use errors::{ErrorCode, ProviderError, ProviderResult, SyncError, SyncResult};
pub use models::{DataPoint, MetricCategory, PodDataPoint, Profile, SyncStatus};
