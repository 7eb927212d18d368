// ABOUTME: Health sample models shared by providers, the pod codec and the reconciler
// ABOUTME: DataPoint, PodDataPoint and MetricCategory with LOINC coding metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::loinc;

/// Kind of health metric synchronised between provider and pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    /// Daily step count
    Steps,
    /// Daily walked distance in meters
    Distance,
    /// Instantaneous heart rate in beats per minute
    HeartRate,
}

/// Lexical datatype of an encoded quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityType {
    /// `xsd:integer`
    Integer,
    /// `xsd:decimal`
    Decimal,
}

impl MetricCategory {
    /// Every category, in upload order
    pub const ALL: [Self; 3] = [Self::Steps, Self::Distance, Self::HeartRate];

    /// LOINC code identifying this category
    #[must_use]
    pub const fn loinc_code(self) -> &'static str {
        match self {
            Self::Steps => loinc::STEPS,
            Self::Distance => loinc::DISTANCE,
            Self::HeartRate => loinc::HEART_RATE,
        }
    }

    /// Resolve a LOINC code; unknown codes yield `None`
    #[must_use]
    pub fn from_loinc_code(code: &str) -> Option<Self> {
        match code {
            loinc::STEPS => Some(Self::Steps),
            loinc::DISTANCE => Some(Self::Distance),
            loinc::HEART_RATE => Some(Self::HeartRate),
            _ => None,
        }
    }

    /// Human readable coding display
    #[must_use]
    pub const fn display(self) -> &'static str {
        match self {
            Self::Steps => "Step count",
            Self::Distance => "Distance walked",
            Self::HeartRate => "Heart rate",
        }
    }

    /// Prefix of the resource fragment in the observation document
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Distance => "distance",
            Self::HeartRate => "heartrate",
        }
    }

    /// `Quantity.unit` written on encode
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Steps => "/d",
            Self::Distance => "m/d",
            Self::HeartRate => "beats/min",
        }
    }

    /// UCUM `Quantity.code` written on encode
    #[must_use]
    pub const fn unit_code(self) -> &'static str {
        match self {
            Self::Steps | Self::Distance => "/d",
            Self::HeartRate => "/min",
        }
    }

    /// Literal datatype of the encoded value
    #[must_use]
    pub const fn quantity_type(self) -> QuantityType {
        match self {
            Self::Steps => QuantityType::Integer,
            Self::Distance | Self::HeartRate => QuantityType::Decimal,
        }
    }

    /// Whether records are keyed per day rather than per instant
    #[must_use]
    pub const fn is_daily(self) -> bool {
        matches!(self, Self::Steps | Self::Distance)
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

/// Parse a sample date into an instant
///
/// Accepts RFC 3339 timestamps, zone-less timestamps (read as UTC) and plain
/// calendar dates (midnight UTC). The result depends only on the input string.
#[must_use]
pub fn parse_point_date(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Raw `{date, value}` sample as reported by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Calendar date (`YYYY-MM-DD`) or timestamp
    pub date: String,
    /// Measured value
    pub value: f64,
}

impl DataPoint {
    /// Create a sample
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }

    /// Instant derived from `date`
    #[must_use]
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        parse_point_date(&self.date)
    }
}

/// Sample that is stored in the pod
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodDataPoint {
    /// Date as written in the document
    pub date: String,
    /// Stored value
    pub value: f64,
    /// Absolute IRI of the observation resource
    pub uri: String,
    /// Instant derived from `date`
    pub parsed_date: DateTime<Utc>,
}

impl PodDataPoint {
    /// Attach a pod location to a provider sample
    ///
    /// Returns `None` when the sample date cannot be interpreted.
    #[must_use]
    pub fn from_data_point(point: &DataPoint, uri: impl Into<String>) -> Option<Self> {
        Some(Self {
            parsed_date: point.parsed_date()?,
            date: point.date.clone(),
            value: point.value,
            uri: uri.into(),
        })
    }

    /// Whether the sample falls inside the inclusive window
    #[must_use]
    pub fn within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.parsed_date && self.parsed_date <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_calendar_date_is_midnight_utc() {
        let parsed = parse_point_date("2020-03-14").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let parsed = parse_point_date("2020-03-14T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 14, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_zoneless_timestamp() {
        let parsed = parse_point_date("2020-03-14T10:00:00.250").unwrap();
        assert_eq!(parsed.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_point_date("yesterday").is_none());
        assert!(parse_point_date("").is_none());
    }

    #[test]
    fn test_loinc_round_trip() {
        for category in MetricCategory::ALL {
            assert_eq!(
                MetricCategory::from_loinc_code(category.loinc_code()),
                Some(category)
            );
        }
        assert_eq!(MetricCategory::from_loinc_code("1234-5"), None);
    }

    #[test]
    fn test_quantity_types() {
        assert_eq!(MetricCategory::Steps.quantity_type(), QuantityType::Integer);
        assert_eq!(
            MetricCategory::Distance.quantity_type(),
            QuantityType::Decimal
        );
        assert!(!MetricCategory::HeartRate.is_daily());
    }
}
