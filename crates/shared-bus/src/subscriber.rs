//! # Event Subscriber
//!
//! The collaborator's side of the bus.

use crate::events::{EventFilter, LoyaltyEvent};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every publisher is gone; nothing more will arrive.
    #[error("Event bus closed")]
    Closed,
}

/// A filtered view of the bus.
///
/// A subscriber that falls more than the channel capacity behind skips the
/// oldest events; `lagged` reports how many it lost.
pub struct Subscription {
    receiver: broadcast::Receiver<LoyaltyEvent>,
    filter: EventFilter,
    lagged: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<LoyaltyEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            lagged: 0,
        }
    }

    /// Wait for the next matching event. `None` once the bus is dropped.
    pub async fn recv(&mut self) -> Option<LoyaltyEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => self.record_lag(missed),
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<LoyaltyEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(missed)) => self.record_lag(missed),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
            }
        }
    }

    /// Every matching event currently buffered, oldest first.
    pub fn drain(&mut self) -> Vec<LoyaltyEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Events skipped because this subscriber fell behind.
    #[must_use]
    pub fn lagged(&self) -> u64 {
        self.lagged
    }

    fn record_lag(&mut self, missed: u64) {
        self.lagged += missed;
        warn!(missed, total = self.lagged, topics = ?self.filter.topics, "Subscriber lagged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventTopic, RewardEarned};
    use crate::publisher::InMemoryEventBus;
    use crate::EventPublisher;
    use chrono::Utc;
    use shared_types::StampId;
    use std::time::Duration;
    use tokio::time::timeout;

    fn reward(user: &str) -> LoyaltyEvent {
        LoyaltyEvent::RewardEarned(RewardEarned {
            user_id: user.into(),
            campaign_id: "c1".into(),
            business_id: "b1".into(),
            reward: "Free latte".to_string(),
            earned_at: Utc::now(),
        })
    }

    fn issued() -> LoyaltyEvent {
        LoyaltyEvent::StampIssued {
            stamp_id: StampId::generate(),
            user_id: "u1".into(),
            business_id: "b1".into(),
            campaign_id: "c1".into(),
            issued_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_recv_skips_other_topics() {
        let bus = InMemoryEventBus::new();
        let mut rewards = bus.subscribe(EventFilter::topics(vec![EventTopic::Rewards]));

        bus.publish(issued()).await;
        bus.publish(reward("u1")).await;

        let received = timeout(Duration::from_millis(100), rewards.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert!(matches!(received, LoyaltyEvent::RewardEarned(_)));
        assert!(rewards.drain().is_empty());
    }

    #[tokio::test]
    async fn test_recv_ends_when_bus_dropped() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());
        bus.publish(reward("u1")).await;
        drop(bus);

        assert!(sub.recv().await.is_some());
        assert!(sub.recv().await.is_none());
        assert_eq!(sub.try_recv(), Err(SubscriptionError::Closed));
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());

        assert_eq!(sub.try_recv(), Ok(None));
    }

    #[tokio::test]
    async fn test_drain_respects_user_filter() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::for_users(vec!["u2".into()]));

        bus.publish(reward("u1")).await;
        bus.publish(reward("u2")).await;
        bus.publish(reward("u2")).await;

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.user_id().as_str() == "u2"));
        assert_eq!(sub.filter().user_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_reports_lag() {
        let bus = InMemoryEventBus::with_capacity(2);
        let mut sub = bus.subscribe(EventFilter::all());

        for user in ["u1", "u2", "u3", "u4"] {
            bus.publish(reward(user)).await;
        }

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(sub.lagged(), 2);
        assert_eq!(events[0].user_id().as_str(), "u3");
    }
}
