// ABOUTME: Synthetic fitness data source for development and testing
// ABOUTME: Serves injected samples per category without any network access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Synthetic Data Source
//!
//! Holds samples in memory and answers window queries from them. Samples can
//! be injected at any time, which lets tests simulate a provider that gains
//! new data between two sync runs.
//!
//! Every query is recorded so tests can assert which windows the engine
//! asked for.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::FitnessDataSource;
use solid_health_core::errors::provider::{ProviderError, ProviderResult};
use solid_health_core::models::{DataPoint, MetricCategory};

/// Provider name of synthetic sources
pub const PROVIDER_NAME: &str = "synthetic";

/// One recorded `get_samples` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQuery {
    /// Requested category
    pub category: MetricCategory,
    /// Window start
    pub start: DateTime<Utc>,
    /// Window end
    pub end: DateTime<Utc>,
}

/// In-memory fitness source
#[derive(Clone, Default)]
pub struct SyntheticSource {
    samples: Arc<RwLock<HashMap<MetricCategory, Vec<DataPoint>>>>,
    queries: Arc<RwLock<Vec<SampleQuery>>>,
    failure: Arc<RwLock<Option<ProviderError>>>,
}

impl SyntheticSource {
    /// Empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add samples to a category
    pub fn push(&self, category: MetricCategory, points: impl IntoIterator<Item = DataPoint>) {
        if let Ok(mut samples) = self.samples.write() {
            samples.entry(category).or_default().extend(points);
        }
    }

    /// Daily steps and distance for every day in `[first, last]`
    ///
    /// Values are derived from the day of year so repeated calls are stable.
    pub fn fill_daily(&self, first: NaiveDate, last: NaiveDate) {
        let mut day = first;
        let mut steps = Vec::new();
        let mut distance = Vec::new();
        while day <= last {
            let seed = f64::from(day.format("%j").to_string().parse::<u16>().unwrap_or(1));
            let date = day.format("%Y-%m-%d").to_string();
            steps.push(DataPoint::new(date.clone(), 4_000.0 + seed * 37.0));
            distance.push(DataPoint::new(date, 2_800.0 + seed * 25.5));
            day += Duration::days(1);
        }
        self.push(MetricCategory::Steps, steps);
        self.push(MetricCategory::Distance, distance);
    }

    /// Make every following query fail with `error`
    pub fn fail_with(&self, error: ProviderError) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(error);
        }
    }

    /// Calls made so far
    #[must_use]
    pub fn queries(&self) -> Vec<SampleQuery> {
        self.queries.read().map(|q| q.clone()).unwrap_or_default()
    }

    fn poisoned() -> ProviderError {
        ProviderError::ConfigurationError {
            provider: PROVIDER_NAME.to_owned(),
            details: "sample store lock poisoned".to_owned(),
        }
    }
}

#[async_trait]
impl FitnessDataSource for SyntheticSource {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn get_samples(
        &self,
        category: MetricCategory,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ProviderResult<Vec<DataPoint>> {
        self.queries
            .write()
            .map_err(|_| Self::poisoned())?
            .push(SampleQuery {
                category,
                start,
                end,
            });

        if let Some(error) = self.failure.read().map_err(|_| Self::poisoned())?.clone() {
            return Err(error);
        }

        let samples = self.samples.read().map_err(|_| Self::poisoned())?;
        Ok(samples
            .get(&category)
            .map(|points| {
                points
                    .iter()
                    .filter(|point| {
                        point
                            .parsed_date()
                            .is_some_and(|at| start <= at && at <= end)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
