// ABOUTME: Single-slot broadcast channel for status and profile snapshots
// ABOUTME: Latest value on subscribe, every later change to current subscribers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tokio::sync::watch;

/// Typed single-slot publish/subscribe channel
///
/// Holds exactly the latest value. A slow subscriber skips intermediate
/// values instead of queueing them.
#[derive(Debug)]
pub struct Bus<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> Bus<T> {
    /// Bus holding `initial`
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Replace the current value and notify subscribers
    pub fn publish(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Copy of the current value
    #[must_use]
    pub fn current(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Receiver positioned at the current value
    ///
    /// The current value is readable immediately through `borrow`; `changed`
    /// resolves on the next publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone + Default> Default for Bus<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_subscriber_sees_latest_value() {
        let bus = Bus::new(1_u32);
        bus.publish(2);
        bus.publish(3);
        let rx = bus.subscribe();
        assert_eq!(*rx.borrow(), 3);
    }

    #[tokio::test]
    async fn test_slow_subscriber_skips_intermediate_values() {
        let bus = Bus::new(0_u32);
        let mut rx = bus.subscribe();
        for value in 1..=5 {
            bus.publish(value);
        }
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 5);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = Bus::new("idle".to_owned());
        bus.publish("busy".to_owned());
        assert_eq!(bus.current(), "busy");
        assert_eq!(bus.subscriber_count(), 0);
    }
}
