// ABOUTME: Calendar month windows walked backwards by the reconciler
// ABOUTME: UTC month boundaries and "Month YYYY" labels for status text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt;

/// One calendar month in UTC, inclusive on both ends
///
/// `end` is the last millisecond of the month so provider queries and pod
/// filters share the same bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// First instant of the month
    pub start: DateTime<Utc>,
    /// Last millisecond of the month
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// Month containing `at`
    #[must_use]
    pub fn containing(at: DateTime<Utc>) -> Self {
        let day = at.date_naive();
        let first = day.with_day(1).unwrap_or(day);
        let next = first
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        let start = Utc.from_utc_datetime(&first.and_time(NaiveTime::default()));
        let end =
            Utc.from_utc_datetime(&next.and_time(NaiveTime::default())) - Duration::milliseconds(1);
        Self { start, end }
    }

    /// Month immediately before this one
    #[must_use]
    pub fn previous(&self) -> Self {
        Self::containing(self.start - Duration::milliseconds(1))
    }

    /// `"March 2020"`
    #[must_use]
    pub fn label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
