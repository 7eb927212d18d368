// ABOUTME: Main library entry point for the Solid health sync engine
// ABOUTME: Reconciles fitness provider samples with FHIR observations stored on a Solid pod
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Solid Health Sync
//!
//! Keeps a user's Solid pod in step with a fitness data provider. Daily step
//! counts, daily distances and heart-rate readings are stored as FHIR RDF
//! observations in a Turtle document that is discovered through the user's
//! private type index, and created on first use.
//!
//! ## Architecture
//!
//! - **Pod**: authenticated document access (GET, SPARQL-Update PATCH, container POST)
//! - **RDF**: a small triple store, Turtle parsing and a structured triple builder
//! - **Profile / Type index**: discovery and bootstrap of the observation document
//! - **Observations**: FHIR encoding and tolerant parsing
//! - **Sync**: sessions, generation tokens, status buses and the month-by-month engine
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use solid_health_sync::config::EngineSettings;
//! use solid_health_sync::pod::HttpPodClient;
//! use solid_health_sync::providers::SyntheticSource;
//! use solid_health_sync::sync::{Identity, SessionManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = SessionManager::new(Arc::new(SyntheticSource::new()), EngineSettings::default());
//!     let client = HttpPodClient::new(reqwest::Client::new()).with_bearer_token("token");
//!     let identity = Identity::new("https://alice.pod.example/profile/card#me", Arc::new(client));
//!     if let Some(run) = manager.handle_identity(Some(identity)).await {
//!         let _summary = run.await;
//!     }
//! }
//! ```

/// Environment configuration
pub mod config;

/// Structured logging setup
pub mod logging;

/// FHIR observation encoding, parsing and loading
pub mod observations;

/// Pod document protocol
pub mod pod;

/// WebID profile loading
pub mod profile;

/// RDF terms, graphs, Turtle parsing and SPARQL-Update bodies
pub mod rdf;

/// Sessions and the reconciliation engine
pub mod sync;

/// Private type index discovery and bootstrap
pub mod type_index;

pub use solid_health_core::{constants, errors, models};
pub use solid_health_providers as providers;
