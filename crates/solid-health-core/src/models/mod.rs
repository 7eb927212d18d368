// ABOUTME: Core data models for health samples, profiles and sync progress
// ABOUTME: Re-exports DataPoint, PodDataPoint, MetricCategory, Profile and SyncStatus
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Health samples and metric categories
pub mod data_point;
/// Linked-data profile model
pub mod profile;
/// Sync progress model
pub mod status;

pub use data_point::{parse_point_date, DataPoint, MetricCategory, PodDataPoint, QuantityType};
pub use profile::Profile;
pub use status::SyncStatus;
