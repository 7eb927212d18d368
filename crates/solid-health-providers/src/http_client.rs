// ABOUTME: Shared HTTP client with connection pooling for provider and pod calls
// ABOUTME: Singleton pattern with configurable timeouts initialized at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

use solid_health_core::constants::timeouts;

/// Request and connect timeouts applied to every outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Whole-request timeout in seconds
    pub request_secs: u64,
    /// Connection establishment timeout in seconds
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request_secs: timeouts::POD_REQUEST_TIMEOUT_SECS,
            connect_secs: timeouts::CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Configured timeout values for the shared client
static CLIENT_TIMEOUTS: OnceLock<HttpTimeouts> = OnceLock::new();

/// Global shared HTTP client with configured timeouts
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Initialize the shared HTTP client timeout configuration
///
/// Must be called once at startup before the first `shared_client()` call.
/// Later calls are ignored.
pub fn initialize_shared_client(timeouts: HttpTimeouts) {
    let _ = CLIENT_TIMEOUTS.set(timeouts);
}

/// Get the shared HTTP client
///
/// Falls back to default timeouts if `initialize_shared_client()` was not called.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| build_client(CLIENT_TIMEOUTS.get().copied().unwrap_or_default()))
}

/// Build a standalone client with the given timeouts
#[must_use]
pub fn build_client(timeouts: HttpTimeouts) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
