// ABOUTME: Structured error types for fitness provider operations
// ABOUTME: Provides domain-specific errors with retry information and rate limit handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Errors raised while talking to a fitness data provider
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Provider API answered with a non-success status
    #[error("{provider} API error ({status_code}): {message}")]
    ApiError {
        /// Provider name
        provider: String,
        /// HTTP status code returned by the provider
        status_code: u16,
        /// Provider supplied message or body
        message: String,
        /// Whether repeating the request may succeed
        retryable: bool,
    },

    /// Request never completed (DNS, connect, timeout)
    #[error("{provider} network error: {message}")]
    NetworkError {
        /// Provider name
        provider: String,
        /// Underlying transport error text
        message: String,
        /// Set when the request hit the client timeout
        timed_out: bool,
    },

    /// Response body could not be decoded
    #[error("{provider} returned unparseable data: {message}")]
    ParseError {
        /// Provider name
        provider: String,
        /// Decoder error text
        message: String,
    },

    /// Credentials missing, expired or rejected
    #[error("{provider} authentication failed: {reason}")]
    AuthenticationFailed {
        /// Provider name
        provider: String,
        /// Why authentication failed
        reason: String,
    },

    /// Provider throttled the request
    #[error("{provider} rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded {
        /// Provider name
        provider: String,
        /// Seconds until the quota resets
        retry_after_secs: u64,
    },

    /// Provider is misconfigured locally
    #[error("{provider} configuration error: {details}")]
    ConfigurationError {
        /// Provider name
        provider: String,
        /// What is wrong with the configuration
        details: String,
    },
}

impl ProviderError {
    /// Whether retrying the same request later may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { retryable, .. } => *retryable,
            Self::NetworkError { .. } | Self::RateLimitExceeded { .. } => true,
            Self::ParseError { .. }
            | Self::AuthenticationFailed { .. }
            | Self::ConfigurationError { .. } => false,
        }
    }

    /// Name of the provider that produced this error
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::ApiError { provider, .. }
            | Self::NetworkError { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::AuthenticationFailed { provider, .. }
            | Self::RateLimitExceeded { provider, .. }
            | Self::ConfigurationError { provider, .. } => provider,
        }
    }
}

/// Result alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
