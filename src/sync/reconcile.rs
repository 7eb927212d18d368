// ABOUTME: Pure reconciliation planning between provider samples and pod observations
// ABOUTME: Exact-instant keying, MODIFY tolerance and heart-rate burst collapsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Reconciliation
//!
//! Planning is side-effect free: the engine turns a [`ReconcilePlan`] into
//! pod writes. Points are keyed by their exact parsed instant, so a daily
//! sample at `2020-03-05` only matches a pod sample at midnight of that day.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::EngineSettings;
use crate::observations::ObservationSet;
use solid_health_core::constants::sync;
use solid_health_core::models::{DataPoint, MetricCategory, PodDataPoint};

/// Thresholds of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileRules {
    /// Stored values closer than this to the provider value are kept
    pub tolerance: f64,
    /// Heart-rate burst window in milliseconds, inclusive
    pub collapse_window_ms: i64,
    /// Heart-rate burst value delta, inclusive
    pub collapse_delta: f64,
}

impl Default for ReconcileRules {
    fn default() -> Self {
        Self {
            tolerance: sync::MODIFY_TOLERANCE,
            collapse_window_ms: sync::HEART_RATE_COLLAPSE_WINDOW_MS,
            collapse_delta: sync::HEART_RATE_COLLAPSE_DELTA,
        }
    }
}

impl From<&EngineSettings> for ReconcileRules {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            tolerance: settings.modify_tolerance,
            collapse_window_ms: settings.heart_rate_window_ms,
            collapse_delta: settings.heart_rate_delta,
        }
    }
}

/// Overwrite of a stored value
#[derive(Debug, Clone, PartialEq)]
pub struct Modify {
    /// Stored observation
    pub point: PodDataPoint,
    /// Provider value replacing it
    pub value: f64,
}

/// Provider sample missing from the pod
#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    /// Metric category of the sample
    pub category: MetricCategory,
    /// Sample to encode
    pub point: DataPoint,
}

/// Writes needed to bring one month of pod data in line with the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Value overwrites, applied first
    pub modifies: Vec<Modify>,
    /// New observations, uploaded in batches
    pub creates: Vec<Create>,
}

impl ReconcilePlan {
    /// Whether nothing needs to be written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modifies.is_empty() && self.creates.is_empty()
    }

    fn extend(&mut self, other: Self) {
        self.modifies.extend(other.modifies);
        self.creates.extend(other.creates);
    }
}

/// Provider samples fetched for one month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthSamples {
    /// Daily step counts
    pub steps: Vec<DataPoint>,
    /// Daily distances
    pub distance: Vec<DataPoint>,
    /// Heart-rate readings
    pub heart_rate: Vec<DataPoint>,
}

fn parse_or_skip(category: MetricCategory, point: &DataPoint) -> Option<DateTime<Utc>> {
    let parsed = point.parsed_date();
    if parsed.is_none() {
        debug!(
            "skipping {} sample with unreadable date '{}'",
            category.display(),
            point.date
        );
    }
    parsed
}

/// Plan MODIFYs and CREATEs for a daily category
///
/// A provider sample matching a stored instant becomes a MODIFY when the
/// values differ by more than the tolerance. Unmatched samples become CREATEs.
#[must_use]
pub fn reconcile_daily(
    category: MetricCategory,
    provider: &[DataPoint],
    pod: &[PodDataPoint],
    rules: &ReconcileRules,
) -> ReconcilePlan {
    let stored: HashMap<DateTime<Utc>, &PodDataPoint> =
        pod.iter().map(|point| (point.parsed_date, point)).collect();

    let mut plan = ReconcilePlan::default();
    for point in provider {
        let Some(at) = parse_or_skip(category, point) else {
            continue;
        };
        match stored.get(&at) {
            Some(existing) if (point.value - existing.value).abs() > rules.tolerance => {
                plan.modifies.push(Modify {
                    point: (*existing).clone(),
                    value: point.value,
                });
            }
            Some(_) => {}
            None => plan.creates.push(Create {
                category,
                point: point.clone(),
            }),
        }
    }
    plan
}

/// Drop heart-rate readings that repeat the previous reading
///
/// Readings are walked in chronological order. A reading collapses when it is
/// within the window and the value delta of the reading directly before it.
/// The comparison is always against the raw preceding reading, collapsed or
/// not, so a slow drift inside each window collapses entirely.
#[must_use]
pub fn collapse_heart_rate(points: &[DataPoint], rules: &ReconcileRules) -> Vec<DataPoint> {
    let mut timed: Vec<(DateTime<Utc>, &DataPoint)> = points
        .iter()
        .filter_map(|point| {
            parse_or_skip(MetricCategory::HeartRate, point).map(|at| (at, point))
        })
        .collect();
    timed.sort_by_key(|(at, _)| *at);

    let mut survivors = Vec::with_capacity(timed.len());
    let mut previous: Option<(DateTime<Utc>, f64)> = None;
    for (at, point) in timed {
        let collapsed = previous.is_some_and(|(before, value)| {
            (at - before).num_milliseconds() <= rules.collapse_window_ms
                && (point.value - value).abs() <= rules.collapse_delta
        });
        previous = Some((at, point.value));
        if !collapsed {
            survivors.push(point.clone());
        }
    }
    survivors
}

/// Plan CREATEs for heart-rate readings
///
/// Heart rate is never modified: a surviving reading is created unless a
/// stored reading shares its exact instant.
#[must_use]
pub fn reconcile_heart_rate(
    provider: &[DataPoint],
    pod: &[PodDataPoint],
    rules: &ReconcileRules,
) -> Vec<Create> {
    let stored: HashSet<DateTime<Utc>> = pod.iter().map(|point| point.parsed_date).collect();

    collapse_heart_rate(provider, rules)
        .into_iter()
        .filter(|point| {
            point
                .parsed_date()
                .is_some_and(|at| !stored.contains(&at))
        })
        .map(|point| Create {
            category: MetricCategory::HeartRate,
            point,
        })
        .collect()
}

/// Full plan for one month
///
/// `pod` must already be narrowed to the month being reconciled.
#[must_use]
pub fn plan_month(
    samples: &MonthSamples,
    pod: &ObservationSet,
    rules: &ReconcileRules,
) -> ReconcilePlan {
    let mut plan = reconcile_daily(MetricCategory::Steps, &samples.steps, &pod.steps, rules);
    plan.extend(reconcile_daily(
        MetricCategory::Distance,
        &samples.distance,
        &pod.distance,
        rules,
    ));
    plan.creates
        .extend(reconcile_heart_rate(&samples.heart_rate, &pod.heart_rate, rules));
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(date: &str, value: f64) -> PodDataPoint {
        PodDataPoint::from_data_point(
            &DataPoint::new(date, value),
            format!("https://pod.example/private/health/fitness.ttl#{date}"),
        )
        .unwrap()
    }

    #[test]
    fn test_modify_threshold() {
        let rules = ReconcileRules::default();
        let pod = vec![stored("2020-03-05", 100.0)];

        let within = reconcile_daily(
            MetricCategory::Distance,
            &[DataPoint::new("2020-03-05", 100.005)],
            &pod,
            &rules,
        );
        assert!(within.is_empty());

        let beyond = reconcile_daily(
            MetricCategory::Distance,
            &[DataPoint::new("2020-03-05", 100.02)],
            &pod,
            &rules,
        );
        assert_eq!(beyond.modifies.len(), 1);
        assert_eq!(beyond.modifies[0].value, 100.02);
        assert!(beyond.creates.is_empty());
    }

    #[test]
    fn test_daily_keys_by_exact_instant() {
        let rules = ReconcileRules::default();
        let pod = vec![stored("2020-03-05", 10.0)];
        let plan = reconcile_daily(
            MetricCategory::Steps,
            &[
                DataPoint::new("2020-03-05T00:00:01Z", 10.0),
                DataPoint::new("2020-03-06", 20.0),
                DataPoint::new("yesterday", 30.0),
            ],
            &pod,
            &rules,
        );
        assert!(plan.modifies.is_empty());
        assert_eq!(plan.creates.len(), 2);
    }

    #[test]
    fn test_heart_rate_burst_collapses() {
        let rules = ReconcileRules::default();
        let points = [
            DataPoint::new("2020-03-05T10:01:30Z", 90.0),
            DataPoint::new("2020-03-05T10:00:00Z", 70.0),
            DataPoint::new("2020-03-05T10:00:30Z", 70.5),
        ];
        let survivors = collapse_heart_rate(&points, &rules);
        let values: Vec<f64> = survivors.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![70.0, 90.0]);
    }

    #[test]
    fn test_heart_rate_collapse_bounds_are_inclusive() {
        let rules = ReconcileRules::default();
        let points = [
            DataPoint::new("2020-03-05T10:00:00Z", 70.0),
            DataPoint::new("2020-03-05T10:01:00Z", 71.0),
            DataPoint::new("2020-03-05T10:02:00.001Z", 71.0),
        ];
        let survivors = collapse_heart_rate(&points, &rules);
        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[1].date, "2020-03-05T10:02:00.001Z");
    }

    #[test]
    fn test_heart_rate_compares_against_raw_predecessor() {
        let rules = ReconcileRules::default();
        let points = [
            DataPoint::new("2020-03-05T10:00:00Z", 70.0),
            DataPoint::new("2020-03-05T10:00:40Z", 71.0),
            DataPoint::new("2020-03-05T10:01:20Z", 72.0),
        ];
        assert_eq!(collapse_heart_rate(&points, &rules).len(), 1);
    }

    #[test]
    fn test_heart_rate_never_modified() {
        let rules = ReconcileRules::default();
        let pod = vec![stored("2020-03-05T10:00:00Z", 60.0)];
        let creates = reconcile_heart_rate(
            &[
                DataPoint::new("2020-03-05T10:00:00Z", 75.0),
                DataPoint::new("2020-03-05T11:00:00Z", 80.0),
            ],
            &pod,
            &rules,
        );
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].point.value, 80.0);
    }

    #[test]
    fn test_plan_month_orders_categories() {
        let rules = ReconcileRules::default();
        let samples = MonthSamples {
            steps: vec![DataPoint::new("2020-03-05", 5000.0)],
            distance: vec![DataPoint::new("2020-03-05", 3200.0)],
            heart_rate: vec![DataPoint::new("2020-03-05T10:00:00Z", 64.0)],
        };
        let plan = plan_month(&samples, &ObservationSet::default(), &rules);
        let categories: Vec<MetricCategory> = plan.creates.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![
                MetricCategory::Steps,
                MetricCategory::Distance,
                MetricCategory::HeartRate
            ]
        );
    }
}
