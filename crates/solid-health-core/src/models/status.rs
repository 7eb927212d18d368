// ABOUTME: Progress snapshot published to sync status observers
// ABOUTME: Determinate and indeterminate progress plus terminal error text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::status_messages;

/// Current sync progress
///
/// `max_value == None` means the amount of remaining work is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Work done so far
    pub value: u64,
    /// Total work, if known
    pub max_value: Option<u64>,
    /// Human readable phase
    pub description: String,
    /// Raw error text of a terminal failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncStatus {
    /// Phase with unknown length
    pub fn indeterminate(description: impl Into<String>) -> Self {
        Self {
            value: 0,
            max_value: None,
            description: description.into(),
            error: None,
        }
    }

    /// Phase with known progress
    pub fn progress(description: impl Into<String>, value: u64, max_value: u64) -> Self {
        Self {
            value,
            max_value: Some(max_value),
            description: description.into(),
            error: None,
        }
    }

    /// Completed phase (`1 / 1`)
    pub fn complete(description: impl Into<String>) -> Self {
        Self::progress(description, 1, 1)
    }

    /// Terminal failure (`0 / 1`) carrying the raw error text
    pub fn failed(description: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            value: 0,
            max_value: Some(1),
            description: description.into(),
            error: Some(error.into()),
        }
    }

    /// Whether this status marks a failed run
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Fraction of work done, `None` when indeterminate
    #[must_use]
    pub fn fraction(&self) -> Option<f64> {
        match self.max_value {
            Some(0) => Some(1.0),
            Some(max) => Some(self.value as f64 / max as f64),
            None => None,
        }
    }
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::indeterminate(status_messages::SETTING_UP)
    }
}
