//! # Reward Notifications
//!
//! Subscribes to reward events and hands them to the push collaborator.
//! Delivery here is a structured log line; a push gateway would replace
//! `deliver`.

use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, LoyaltyEvent, Subscription};
use tokio::sync::watch;
use tracing::info;

pub struct RewardNotifier {
    subscription: Subscription,
}

impl RewardNotifier {
    /// Subscribe before any scan is served so no reward is missed.
    pub fn subscribe(bus: &InMemoryEventBus) -> Self {
        Self {
            subscription: bus.subscribe(EventFilter::topics(vec![EventTopic::Rewards])),
        }
    }

    /// Deliver rewards until shutdown or until the bus closes.
    ///
    /// Returns the number of notifications delivered.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut delivered = 0;
        loop {
            tokio::select! {
                event = self.subscription.recv() => {
                    let Some(event) = event else { break };
                    if deliver(&event) {
                        delivered += 1;
                    }
                }
                _ = shutdown.changed() => {
                    // Flush whatever was published before the signal
                    for event in self.subscription.drain() {
                        if deliver(&event) {
                            delivered += 1;
                        }
                    }
                    break;
                }
            }
        }
        info!(
            delivered,
            lagged = self.subscription.lagged(),
            "Reward notifier stopped"
        );
        delivered
    }
}

fn deliver(event: &LoyaltyEvent) -> bool {
    let LoyaltyEvent::RewardEarned(reward) = event else {
        return false;
    };
    info!(
        user = %reward.user_id,
        campaign = %reward.campaign_id,
        business = %reward.business_id,
        reward = %reward.reward,
        "Reward notification sent"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventPublisher, RewardEarned};
    use shared_types::{SystemTimeSource, TimeSource};

    fn reward(user: &str) -> LoyaltyEvent {
        LoyaltyEvent::RewardEarned(RewardEarned {
            user_id: user.into(),
            campaign_id: "c1".into(),
            business_id: "b1".into(),
            reward: "Free latte".to_string(),
            earned_at: SystemTimeSource.now(),
        })
    }

    #[tokio::test]
    async fn test_delivers_until_shutdown() {
        let bus = InMemoryEventBus::new();
        let notifier = RewardNotifier::subscribe(&bus);
        let (tx, rx) = watch::channel(false);

        bus.publish(reward("u1")).await;
        bus.publish(reward("u2")).await;
        let handle = tokio::spawn(notifier.run(rx));
        tx.send(true).unwrap();

        assert_eq!(handle.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stops_when_bus_dropped() {
        let bus = InMemoryEventBus::new();
        let notifier = RewardNotifier::subscribe(&bus);
        let (_tx, rx) = watch::channel(false);

        bus.publish(reward("u1")).await;
        drop(bus);

        assert_eq!(notifier.run(rx).await, 1);
    }
}
