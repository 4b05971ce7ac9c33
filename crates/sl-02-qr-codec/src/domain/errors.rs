use thiserror::Error;

/// Why a scanned payload was rejected.
///
/// Decoding never yields a partial result: any of these aborts the scan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Not a JSON object.
    #[error("Payload is not well-formed: {0}")]
    Malformed(String),

    #[error("Payload has no string `type` field")]
    MissingDiscriminator,

    #[error("Unsupported payload type: {0}")]
    UnsupportedKind(String),

    #[error("Payload has no campaign id")]
    MissingCampaignId,

    #[error("Payload has no business id")]
    MissingBusinessId,

    #[error("Payload is {size} bytes, limit is {max}")]
    PayloadTooLarge { size: usize, max: usize },
}
