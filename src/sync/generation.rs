// ABOUTME: Generation tokens for cooperative cancellation of stale sync runs
// ABOUTME: A shared counter bumped on every identity change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use solid_health_core::errors::{SyncError, SyncResult};

/// Source of generation tokens
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Arc<AtomicU64>,
}

impl GenerationCounter {
    /// Counter starting at generation 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every outstanding token and hand out a fresh one
    #[must_use]
    pub fn advance(&self) -> GenerationToken {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationToken {
            current: Arc::clone(&self.current),
            generation,
        }
    }

    /// Token for the current generation
    #[must_use]
    pub fn token(&self) -> GenerationToken {
        GenerationToken {
            current: Arc::clone(&self.current),
            generation: self.current.load(Ordering::SeqCst),
        }
    }

    /// Current generation number
    #[must_use]
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

/// Tag of one sync run
///
/// Checked before every side-effecting pod request. Once the counter moves
/// past the token's generation the run must stop writing.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    current: Arc<AtomicU64>,
    generation: u64,
}

impl GenerationToken {
    /// Token that never goes stale, for one-off tools
    #[must_use]
    pub fn detached() -> Self {
        GenerationCounter::new().token()
    }

    /// Generation this token was issued for
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer generation has started
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Fail with `SyncError::Superseded` for a stale token
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Superseded` when a newer generation has started.
    pub fn ensure_current(&self) -> SyncResult<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(SyncError::Superseded {
                generation: self.generation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_invalidates_older_tokens() {
        let counter = GenerationCounter::new();
        let first = counter.advance();
        assert!(first.ensure_current().is_ok());

        let second = counter.advance();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(matches!(
            first.ensure_current(),
            Err(SyncError::Superseded { generation: 1 })
        ));
    }

    #[test]
    fn test_detached_token_stays_current() {
        let token = GenerationToken::detached();
        assert!(token.ensure_current().is_ok());
        assert_eq!(token.generation(), 0);
    }
}
