//! Configuration for the cycle engine

use serde::{Deserialize, Serialize};
use sl_02_qr_codec::DEFAULT_MAX_PAYLOAD_BYTES;

/// Engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hold a per-(user, campaign) lock around append, recount and redemption
    pub serialize_pairs: bool,
    /// Reject payloads longer than this before parsing
    pub max_payload_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            serialize_pairs: true,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}
