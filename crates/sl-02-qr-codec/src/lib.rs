//! # SL-02: QR Payload Codec
//!
//! Encodes and decodes the scan payload printed in a merchant's QR code.
//!
//! ## Wire Format
//!
//! A compact JSON object with one-to-three letter keys:
//!
//! ```json
//! {"bid":"<business id>","cid":"<campaign id>","type":"stamp"}
//! ```
//!
//! `bn` and `cn` (business and campaign name) may be added for display.
//! They are advisory: nothing downstream authorizes on them.
//!
//! The payload is not signed. Integrity comes from re-deriving the owning
//! business from `cid` at scan time and comparing it with `bid`.

pub mod codec;
pub mod domain;

pub use codec::{decode, decode_with_limit, encode, encode_with_display, DEFAULT_MAX_PAYLOAD_BYTES};
pub use domain::errors::DecodeError;
pub use domain::payload::{DecodedPayload, DisplayHints, PayloadKind};
