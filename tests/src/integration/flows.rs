//! # Integration Flows
//!
//! Multi-step journeys across codec, engine, ledger and bus:
//!
//! 1. **Discover → verify → scan → card**: a new customer joins a campaign
//! 2. **Event delivery**: a reward reaches a topic-filtered subscriber
//! 3. **Campaign lifecycle**: an ended campaign keeps its history but stops issuing

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Duration as ChronoDuration;
    use shared_bus::{EventFilter, EventTopic, LoyaltyEvent};
    use shared_types::Campaign;
    use sl_02_qr_codec::{decode, encode_with_display};
    use sl_03_stamp_ledger::StampLedgerApi;
    use sl_04_cycle_engine::{
        CardState, CycleEngineApi, CycleEngineService, InMemoryCampaignDirectory, ScanError,
        ScanRequest,
    };
    use std::sync::Arc;
    use tokio::time::timeout;

    use crate::integration::fixtures::Harness;

    // =============================================================================
    // FLOW 1: NEW CUSTOMER JOURNEY
    // =============================================================================

    #[tokio::test]
    async fn test_join_verify_scan_card() {
        let h = Harness::new();
        let user = "frank".into();

        let joinable: Vec<String> = h
            .engine
            .list_joinable(&user)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id.0)
            .collect();
        assert_eq!(joinable, vec!["bread", "coffee", "geo"]);

        // Printed hints are stale; the confirm screen must not trust them
        let printed = encode_with_display(
            &"bread".into(),
            &"bakery".into(),
            Some("Old Bakery"),
            Some("Old Club"),
        );
        assert_eq!(decode(&printed).unwrap().display.business_name.as_deref(), Some("Old Bakery"));

        let verified = h.engine.verify_payload(&printed).await.unwrap();
        assert_eq!(verified.business_name, "Bakery");
        assert_eq!(verified.campaign_name, "Bread Club");
        assert!(verified.issuing);
        assert!(h.ledger.list_for_user(&user).await.unwrap().is_empty());

        h.engine
            .handle_scan(ScanRequest::new("frank", printed))
            .await
            .unwrap();

        let cards = h.engine.list_cards(&user).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].business_name.as_deref(), Some("Bakery"));
        assert_eq!(cards[0].state, CardState::Building { count: 1, goal: 2 });

        let joinable = h.engine.list_joinable(&user).await.unwrap();
        assert!(joinable.iter().all(|c| c.id.as_str() != "bread"));
    }

    // =============================================================================
    // FLOW 2: EVENT DELIVERY
    // =============================================================================

    #[tokio::test]
    async fn test_reward_reaches_rewards_subscriber() {
        let h = Harness::new();
        let mut rewards = h.events.subscribe(EventFilter::topics(vec![EventTopic::Rewards]));
        let mut issuance = h.events.subscribe(EventFilter::topics(vec![EventTopic::Issuance]));

        let payload = sl_02_qr_codec::encode(&"bread".into(), &"bakery".into());
        for _ in 0..2 {
            h.engine
                .handle_scan(ScanRequest::new("gina", payload.clone()))
                .await
                .unwrap();
        }

        let event = timeout(Duration::from_millis(100), rewards.recv())
            .await
            .expect("timeout")
            .expect("event");
        let LoyaltyEvent::RewardEarned(reward) = event else {
            panic!("expected reward event");
        };
        assert_eq!(reward.user_id.as_str(), "gina");
        assert_eq!(reward.reward, "Free loaf");
        assert!(rewards.drain().is_empty());

        // Two scans plus the rollover seed
        assert_eq!(issuance.drain().len(), 3);
    }

    // =============================================================================
    // FLOW 3: CAMPAIGN LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_ended_campaign_stops_issuing_keeps_history() {
        let h = Harness::new();
        let end = h.now() + ChronoDuration::hours(1);
        let directory = Arc::new(InMemoryCampaignDirectory::new());
        directory
            .upsert_campaign(
                Campaign::new("seasonal", "cafe", "Summer Club", 3, "Free iced tea")
                    .with_schedule(None, Some(end)),
            )
            .unwrap();
        let engine = CycleEngineService::new(directory, h.ledger.clone(), h.events.clone())
            .with_clock(h.clock.clone());

        let payload = sl_02_qr_codec::encode(&"seasonal".into(), &"cafe".into());
        engine
            .handle_scan(ScanRequest::new("hank", payload.clone()))
            .await
            .unwrap();

        h.clock.advance(ChronoDuration::hours(2));
        let err = engine
            .handle_scan(ScanRequest::new("hank", payload))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::CampaignInactive { .. }));

        let user = "hank".into();
        assert_eq!(h.ledger.list_for_user(&user).await.unwrap().len(), 1);
        assert_eq!(engine.list_cards(&user).await.unwrap()[0].current_count, 1);
        assert!(engine.list_joinable(&"ivy".into()).await.unwrap().is_empty());
    }
}
