// ABOUTME: Core data source trait for fitness providers
// ABOUTME: Defines the read-only sample query contract used by the reconciler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fitness Data Source Contract
//!
//! The reconciler only ever asks a provider one question: which samples of a
//! category exist between two instants. Implementations translate their own
//! API into [`DataPoint`]s:
//!
//! - daily categories (steps, distance) use `YYYY-MM-DD` dates
//! - heart rate uses RFC 3339 timestamps with millisecond precision
//! - an empty period is `Ok(vec![])`
//!
//! ## Example: a fixed source
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use chrono::{DateTime, Utc};
//! use solid_health_core::{DataPoint, MetricCategory, ProviderResult};
//! use solid_health_providers::FitnessDataSource;
//!
//! struct TenThousandSteps;
//!
//! #[async_trait]
//! impl FitnessDataSource for TenThousandSteps {
//!     fn name(&self) -> &'static str {
//!         "fixed"
//!     }
//!
//!     async fn get_samples(
//!         &self,
//!         category: MetricCategory,
//!         start: DateTime<Utc>,
//!         _end: DateTime<Utc>,
//!     ) -> ProviderResult<Vec<DataPoint>> {
//!         Ok(match category {
//!             MetricCategory::Steps => {
//!                 vec![DataPoint::new(start.format("%Y-%m-%d").to_string(), 10_000.0)]
//!             }
//!             _ => vec![],
//!         })
//!     }
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use solid_health_core::errors::provider::ProviderResult;
use solid_health_core::models::{DataPoint, MetricCategory};

/// Read-only source of raw fitness samples
#[async_trait]
pub trait FitnessDataSource: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &'static str;

    /// Samples of `category` within `[start, end]`
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` when the provider cannot be queried. An empty
    /// period is not an error.
    async fn get_samples(
        &self,
        category: MetricCategory,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ProviderResult<Vec<DataPoint>>;
}
