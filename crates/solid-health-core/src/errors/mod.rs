// ABOUTME: Unified error taxonomy for pod synchronisation runs
// ABOUTME: Maps network, rejection, bootstrap and capability failures onto stable error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sync Error Handling
//!
//! Every fatal failure of a sync run is a [`SyncError`]. Shape violations in
//! pod data are not errors at all: the observation parser drops them and only
//! counts them, so they never reach this type.
//!
//! Each variant maps to an [`ErrorCode`] so observers can classify a failure
//! without matching on the message text.

/// Provider error types
pub mod provider;

pub use provider::{ProviderError, ProviderResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes for sync failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Transport (1000-1999)
    /// Request could not complete
    #[serde(rename = "NETWORK_ERROR")]
    NetworkError = 1000,
    /// Request exceeded the per-request timeout
    #[serde(rename = "NETWORK_TIMEOUT")]
    NetworkTimeout = 1001,

    // Remote (2000-2999)
    /// Pod refused a write
    #[serde(rename = "REMOTE_REJECTION")]
    RemoteRejection = 2000,
    /// Pod served a document that is not valid Turtle
    #[serde(rename = "MALFORMED_DOCUMENT")]
    MalformedDocument = 2001,

    // Setup (3000-3999)
    /// Profile lacks a required pointer
    #[serde(rename = "MISSING_CAPABILITY")]
    MissingCapability = 3000,
    /// Type registration or container creation failed
    #[serde(rename = "BOOTSTRAP_FAILURE")]
    BootstrapFailure = 3001,

    // Provider (4000-4999)
    /// Fitness provider call failed
    #[serde(rename = "PROVIDER_ERROR")]
    ProviderError = 4000,

    // Lifecycle (5000-5999)
    /// Identity changed while the run was in flight
    #[serde(rename = "RUN_SUPERSEDED")]
    RunSuperseded = 5000,

    // Configuration (6000-6999)
    /// Invalid local configuration
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6000,
}

impl ErrorCode {
    /// Get a user-friendly description of this error category
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NetworkError => "The request to the server could not be completed",
            Self::NetworkTimeout => "The server did not answer in time",
            Self::RemoteRejection => "The pod rejected the update",
            Self::MalformedDocument => "The pod returned a document that could not be read",
            Self::MissingCapability => "The profile is missing a required setting",
            Self::BootstrapFailure => "The health data location could not be created",
            Self::ProviderError => "The fitness provider could not be reached",
            Self::RunSuperseded => "The sync was replaced by a newer login",
            Self::ConfigInvalid => "The configuration is invalid",
        }
    }
}

/// Fatal errors of a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    /// Request could not complete
    #[error("request to {uri} failed: {message}")]
    Network {
        /// Target of the request
        uri: String,
        /// Transport error text
        message: String,
        /// Set for timeouts and connect failures
        retryable: bool,
    },

    /// Non-success status on a PATCH or POST
    #[error("{method} {uri} rejected with status {status}: {body}")]
    RemoteRejection {
        /// HTTP method of the rejected request
        method: &'static str,
        /// Target of the request
        uri: String,
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Document body was not parseable RDF
    #[error("could not parse {uri}: {reason}")]
    MalformedDocument {
        /// Document address
        uri: String,
        /// Parser error text
        reason: String,
    },

    /// Profile does not advertise a required pointer
    #[error("profile {web_id} has no {capability}")]
    MissingCapability {
        /// Profile being synced
        web_id: String,
        /// Human name of the missing pointer
        capability: &'static str,
    },

    /// Registration insert or container creation failed
    #[error("{step} failed with status {status}: {body}")]
    BootstrapFailure {
        /// Which bootstrap step failed
        step: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Fitness provider failure
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Identity changed; this run must stop writing
    #[error("sync generation {generation} superseded")]
    Superseded {
        /// Generation the stale run was started with
        generation: u64,
    },

    /// Local configuration problem
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Stable category for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Network {
                retryable: true, ..
            } => ErrorCode::NetworkTimeout,
            Self::Network { .. } => ErrorCode::NetworkError,
            Self::RemoteRejection { .. } => ErrorCode::RemoteRejection,
            Self::MalformedDocument { .. } => ErrorCode::MalformedDocument,
            Self::MissingCapability { .. } => ErrorCode::MissingCapability,
            Self::BootstrapFailure { .. } => ErrorCode::BootstrapFailure,
            Self::Provider(_) => ErrorCode::ProviderError,
            Self::Superseded { .. } => ErrorCode::RunSuperseded,
            Self::Config(_) => ErrorCode::ConfigInvalid,
        }
    }

    /// Whether the failure is transient
    ///
    /// The engine never retries within a run; this only informs the caller
    /// deciding whether the next identity event is worth waiting for.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { retryable, .. } => *retryable,
            Self::Provider(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Whether the run was cancelled by a newer identity
    #[must_use]
    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    /// Build a network error from any transport error
    pub fn network(uri: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self::Network {
            uri: uri.into(),
            message: message.into(),
            retryable,
        }
    }
}

/// Result alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let timeout = SyncError::network("https://pod.example/doc", "timed out", true);
        assert_eq!(timeout.code(), ErrorCode::NetworkTimeout);
        assert!(timeout.is_retryable());

        let refused = SyncError::network("https://pod.example/doc", "dns failure", false);
        assert_eq!(refused.code(), ErrorCode::NetworkError);
        assert!(!refused.is_retryable());

        let rejection = SyncError::RemoteRejection {
            method: "PATCH",
            uri: "https://pod.example/private/health/fitness.ttl".to_owned(),
            status: 403,
            body: "Forbidden".to_owned(),
        };
        assert_eq!(rejection.code(), ErrorCode::RemoteRejection);
        assert!(rejection.to_string().contains("403"));
        assert!(rejection.to_string().contains("Forbidden"));
    }

    #[test]
    fn test_superseded_is_not_retryable() {
        let err = SyncError::Superseded { generation: 3 };
        assert!(err.is_superseded());
        assert!(!err.is_retryable());
        assert_eq!(err.code(), ErrorCode::RunSuperseded);
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::BootstrapFailure).unwrap();
        assert_eq!(json, "\"BOOTSTRAP_FAILURE\"");
    }
}
