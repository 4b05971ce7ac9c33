//! Encoding and decoding.

use serde_json::{Map, Value};
use shared_types::{BusinessId, CampaignId};

use crate::domain::errors::DecodeError;
use crate::domain::payload::{DecodedPayload, DisplayHints, PayloadKind};

/// Default upper bound on an accepted payload, in bytes.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 512;

const KEY_KIND: &str = "type";
const KEY_CAMPAIGN: &str = "cid";
const KEY_BUSINESS: &str = "bid";
const KEY_BUSINESS_NAME: &str = "bn";
const KEY_CAMPAIGN_NAME: &str = "cn";

/// Encode a stamp payload.
pub fn encode(campaign_id: &CampaignId, business_id: &BusinessId) -> String {
    encode_with_display(campaign_id, business_id, None, None)
}

/// Encode a stamp payload with advisory display names.
pub fn encode_with_display(
    campaign_id: &CampaignId,
    business_id: &BusinessId,
    business_name: Option<&str>,
    campaign_name: Option<&str>,
) -> String {
    let mut object = Map::new();
    object.insert(KEY_KIND.into(), Value::from(PayloadKind::Stamp.as_str()));
    object.insert(KEY_CAMPAIGN.into(), Value::from(campaign_id.as_str()));
    object.insert(KEY_BUSINESS.into(), Value::from(business_id.as_str()));
    if let Some(name) = business_name {
        object.insert(KEY_BUSINESS_NAME.into(), Value::from(name));
    }
    if let Some(name) = campaign_name {
        object.insert(KEY_CAMPAIGN_NAME.into(), Value::from(name));
    }
    Value::Object(object).to_string()
}

/// Decode a payload of any size.
pub fn decode(payload: &str) -> Result<DecodedPayload, DecodeError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(DecodeError::Malformed("expected a JSON object".into()));
    };

    let kind = match object.get(KEY_KIND) {
        Some(Value::String(kind)) => {
            PayloadKind::parse(kind).ok_or_else(|| DecodeError::UnsupportedKind(kind.clone()))?
        }
        _ => return Err(DecodeError::MissingDiscriminator),
    };

    let campaign_id = string_field(&object, KEY_CAMPAIGN).ok_or(DecodeError::MissingCampaignId)?;
    let business_id = string_field(&object, KEY_BUSINESS).ok_or(DecodeError::MissingBusinessId)?;

    Ok(DecodedPayload {
        kind,
        campaign_id: CampaignId::new(campaign_id),
        business_id: BusinessId::new(business_id),
        display: DisplayHints {
            business_name: string_field(&object, KEY_BUSINESS_NAME).map(str::to_owned),
            campaign_name: string_field(&object, KEY_CAMPAIGN_NAME).map(str::to_owned),
        },
    })
}

/// Decode, refusing anything longer than `max_bytes`.
pub fn decode_with_limit(payload: &str, max_bytes: usize) -> Result<DecodedPayload, DecodeError> {
    if payload.len() > max_bytes {
        return Err(DecodeError::PayloadTooLarge {
            size: payload.len(),
            max: max_bytes,
        });
    }
    decode(payload)
}

/// Present and a JSON string. `null`, numbers and objects count as absent.
fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}
