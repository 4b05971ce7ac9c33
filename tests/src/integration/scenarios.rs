//! # Acceptance Scenarios
//!
//! 1. **Rollover**: the goal-reaching scan redeems exactly `goal` stamps and
//!    starts the next card at one
//! 2. **Geofence**: a location-gated campaign rejects a distant scan without
//!    touching the ledger
//! 3. **Mismatch**: a payload naming the wrong business is rejected
//! 4. **Race**: two scans reaching the goal together earn one reward

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::{GeoPoint, StampId};
    use sl_01_geofence::{distance_if_known, is_within_proximity};
    use sl_02_qr_codec::encode;
    use sl_03_stamp_ledger::StampLedgerApi;
    use sl_04_cycle_engine::{CycleEngineApi, EngineConfig, ScanError, ScanRequest};

    use crate::integration::fixtures::{Harness, STOREFRONT};

    fn payload(campaign: &str, business: &str) -> String {
        encode(&campaign.into(), &business.into())
    }

    // =============================================================================
    // SCENARIO A: ROLLOVER
    // =============================================================================

    #[tokio::test]
    async fn test_goal_reaching_scan_rolls_over() {
        let h = Harness::new();
        h.seed("alice", "coffee", "cafe", 4).await;

        let result = h
            .engine
            .handle_scan(ScanRequest::new("alice", payload("coffee", "cafe")))
            .await
            .unwrap();

        assert!(result.reward_earned);
        assert_eq!(result.current_count, 1);
        assert_eq!(result.reward.as_deref(), Some("Free coffee"));

        // Newest first: the seed, then the five redeemed stamps
        let history = h.ledger.list_for_user(&"alice".into()).await.unwrap();
        assert_eq!(history.len(), 6);
        assert!(!history[0].redeemed);
        assert!(history[1..].iter().all(|s| s.redeemed));
        assert!(history[1..].iter().all(|s| s.redeemed_at == Some(h.now())));
        assert_eq!(history[1].id, result.stamp_id);
    }

    #[tokio::test]
    async fn test_redemption_takes_oldest_first() {
        let h = Harness::new();
        h.seed("alice", "bread", "bakery", 3).await;

        // Three unredeemed already exceed the goal of two; the scan redeems two
        // and the leftovers start the next card, so no seed is appended
        let result = h
            .engine
            .handle_scan(ScanRequest::new("alice", payload("bread", "bakery")))
            .await
            .unwrap();
        assert!(result.reward_earned);

        let mut history = h.ledger.list_for_user(&"alice".into()).await.unwrap();
        history.reverse();
        let redeemed: Vec<bool> = history.iter().map(|s| s.redeemed).collect();
        assert_eq!(redeemed, vec![true, true, false, false]);
        assert_eq!(result.current_count, 2);
    }

    // =============================================================================
    // SCENARIO B: GEOFENCE
    // =============================================================================

    #[tokio::test]
    async fn test_distant_scan_rejected_without_stamp() {
        let h = Harness::new();
        let far = GeoPoint::new(STOREFRONT.latitude + 0.0045, STOREFRONT.longitude);
        assert!(!is_within_proximity(Some(&far), Some(&STOREFRONT), 100.0));

        let err = h
            .engine
            .handle_scan(ScanRequest::new("bob", payload("geo", "cafe")).at(far))
            .await
            .unwrap_err();

        match err {
            ScanError::OutOfRange {
                distance_meters: Some(distance),
                threshold_meters,
            } => {
                assert!(distance > 450.0 && distance < 550.0, "distance {distance}");
                assert_eq!(Some(distance), distance_if_known(Some(&far), Some(&STOREFRONT)));
                assert_eq!(threshold_meters, 100.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(h.ledger.list_for_user(&"bob".into()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nearby_scan_accepted_with_location() {
        let h = Harness::new();
        let near = GeoPoint::new(STOREFRONT.latitude + 0.0005, STOREFRONT.longitude);
        assert!(is_within_proximity(Some(&near), Some(&STOREFRONT), 100.0));

        let result = h
            .engine
            .handle_scan(ScanRequest::new("bob", payload("geo", "cafe")).at(near))
            .await
            .unwrap();
        assert_eq!(result.current_count, 1);

        let history = h.ledger.list_for_user(&"bob".into()).await.unwrap();
        assert_eq!(history[0].issued_location, Some(near));
    }

    // =============================================================================
    // SCENARIO C: PAYLOAD MISMATCH
    // =============================================================================

    #[tokio::test]
    async fn test_wrong_business_rejected() {
        let h = Harness::new();

        let err = h
            .engine
            .handle_scan(ScanRequest::new("carol", payload("coffee", "bakery")))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::PayloadMismatch { .. }));
        assert!(err.is_client_correctable());
        assert!(h.ledger.list_for_user(&"carol".into()).await.unwrap().is_empty());
    }

    // =============================================================================
    // SCENARIO D: CONCURRENT GOAL-REACHING SCANS
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scans_earn_one_reward() {
        let h = Harness::new();
        h.seed("dave", "coffee", "cafe", 4).await;

        let scans = (0..2).map(|_| {
            let engine = Arc::clone(&h.engine);
            tokio::spawn(async move {
                engine
                    .handle_scan(ScanRequest::new("dave", payload("coffee", "cafe")))
                    .await
            })
        });
        let mut results = Vec::new();
        for scan in scans.collect::<Vec<_>>() {
            results.push(scan.await.unwrap().unwrap());
        }

        let rewards = results.iter().filter(|r| r.reward_earned).count();
        assert_eq!(rewards, 1);
        let mut counts: Vec<u32> = results.iter().map(|r| r.current_count).collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![1, 2]);

        let history = h.ledger.list_for_user(&"dave".into()).await.unwrap();
        assert_eq!(history.len(), 7);
        assert_eq!(history.iter().filter(|s| s.redeemed).count(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unserialized_scans_never_double_redeem() {
        let h = Harness::with_config(EngineConfig {
            serialize_pairs: false,
            ..EngineConfig::default()
        });

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let engine = Arc::clone(&h.engine);
                tokio::spawn(async move {
                    engine
                        .handle_scan(ScanRequest::new("erin", payload("coffee", "cafe")))
                        .await
                })
            })
            .collect();

        let mut rewards = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(result) if result.reward_earned => rewards += 1,
                Ok(_) => {}
                Err(err) => assert!(
                    matches!(err, ScanError::ConcurrentRedemption { .. }),
                    "unexpected error: {err:?}"
                ),
            }
        }

        // Every scan appended; each reward redeemed five and seeded at most one
        let history = h.ledger.list_for_user(&"erin".into()).await.unwrap();
        assert!(rewards >= 1);
        assert!(history.len() >= 20 && history.len() <= 20 + rewards);
        assert_eq!(history.iter().filter(|s| s.redeemed).count(), rewards * 5);

        let mut ids: Vec<StampId> = history.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), history.len());
    }
}
