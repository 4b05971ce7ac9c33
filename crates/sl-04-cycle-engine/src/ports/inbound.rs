//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use shared_types::{Campaign, UserId};

use crate::domain::errors::ScanError;
use crate::domain::scan::{ScanRequest, ScanResult, VerifiedPayload};
use crate::domain::state::LoyaltyCard;

/// Primary Cycle Engine API
#[async_trait]
pub trait CycleEngineApi: Send + Sync {
    /// Handle one scan end to end.
    ///
    /// On goal completion the card is redeemed and a fresh one seeded before
    /// this returns; the pair is never left observable in the complete state.
    async fn handle_scan(&self, request: ScanRequest) -> Result<ScanResult, ScanError>;

    /// Decode a payload and resolve it against the directory without
    /// touching the ledger.
    async fn verify_payload(&self, payload: &str) -> Result<VerifiedPayload, ScanError>;

    /// Issuing campaigns the user holds no unredeemed stamps for.
    async fn list_joinable(&self, user_id: &UserId) -> Result<Vec<Campaign>, ScanError>;

    /// Current progress on every campaign the user has unredeemed stamps in.
    async fn list_cards(&self, user_id: &UserId) -> Result<Vec<LoyaltyCard>, ScanError>;
}
