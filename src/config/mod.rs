// ABOUTME: Configuration module for runtime settings of the sync engine
// ABOUTME: Environment-driven HTTP, reconciliation and provider options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! Configuration is environment-only. Command-line flags of the binary
//! override individual values after loading.

/// Environment configuration
pub mod environment;

pub use environment::{EngineSettings, ProviderKind, SyncConfig};
