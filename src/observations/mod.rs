// ABOUTME: Observation document access: load, parse and encode health records
// ABOUTME: Groups pod samples per metric category for the reconciler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Sample to FHIR RDF encoding
pub mod codec;
/// FHIR RDF to sample decoding
pub mod parser;
/// Observation document loading and initialisation
pub mod store;

pub use codec::{observation_id, EncodedObservation, ObservationCodec};
pub use parser::parse_observations;
pub use store::ObservationStore;

use chrono::{DateTime, Utc};
use solid_health_core::models::{MetricCategory, PodDataPoint};

/// Pod samples per category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet {
    /// Daily step counts
    pub steps: Vec<PodDataPoint>,
    /// Daily distances
    pub distance: Vec<PodDataPoint>,
    /// Heart-rate readings
    pub heart_rate: Vec<PodDataPoint>,
    /// Observations dropped while parsing
    pub skipped: usize,
}

impl ObservationSet {
    /// Samples of one category
    #[must_use]
    pub fn category(&self, category: MetricCategory) -> &[PodDataPoint] {
        match category {
            MetricCategory::Steps => &self.steps,
            MetricCategory::Distance => &self.distance,
            MetricCategory::HeartRate => &self.heart_rate,
        }
    }

    /// Append a sample to its category
    pub fn push(&mut self, category: MetricCategory, point: PodDataPoint) {
        match category {
            MetricCategory::Steps => self.steps.push(point),
            MetricCategory::Distance => self.distance.push(point),
            MetricCategory::HeartRate => self.heart_rate.push(point),
        }
    }

    /// Samples of one category inside the inclusive window
    #[must_use]
    pub fn within(
        &self,
        category: MetricCategory,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<PodDataPoint> {
        self.category(category)
            .iter()
            .filter(|point| point.within(start, end))
            .cloned()
            .collect()
    }

    /// Total number of samples across categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len() + self.distance.len() + self.heart_rate.len()
    }

    /// Whether no category holds a sample
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
