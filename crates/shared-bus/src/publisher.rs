//! # Event Publisher
//!
//! The engine's side of the bus.

use crate::events::{EventFilter, LoyaltyEvent};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Where the engine hands off domain events.
///
/// Publishing is fire-and-forget: the engine never waits for a notification
/// to be delivered, and a scan never fails because nobody was listening.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Returns how many subscribers the event reached.
    async fn publish(&self, event: LoyaltyEvent) -> usize;

    /// Events handed to the bus so far, delivered or not.
    fn events_published(&self) -> u64;
}

/// Single-process bus over a `tokio::sync::broadcast` channel.
///
/// Every subscriber sees every event and applies its own [`EventFilter`].
pub struct InMemoryEventBus {
    sender: broadcast::Sender<LoyaltyEvent>,
    published: AtomicU64,
    /// Events published while no subscriber existed.
    dropped: AtomicU64,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// `capacity` events are buffered per subscriber before the slowest one lags.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Only events published after this call are seen.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, users = filter.user_ids.len(), "Subscriber attached");
        Subscription::new(self.sender.subscribe(), filter)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Events nobody was subscribed to receive.
    #[must_use]
    pub fn events_dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LoyaltyEvent) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        let topic = event.topic();
        let user = event.user_id().clone();

        match self.sender.send(event) {
            Ok(reached) => {
                debug!(?topic, %user, reached, "Event published");
                reached
            }
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(?topic, %user, "No subscribers, event dropped");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
