//! # Command Protocol
//!
//! One JSON object per line in, one JSON object per line out.
//!
//! ```text
//! {"cmd":"scan","user_id":"u1","payload":"{\"type\":\"stamp\",...}","location":{...}}
//! {"cmd":"verify","payload":"..."}
//! {"cmd":"cards","user_id":"u1"}
//! {"cmd":"joinable","user_id":"u1"}
//! {"cmd":"history","user_id":"u1"}
//! {"cmd":"qr","campaign_id":"c1","business_id":"b1","business_name":"Bean There"}
//! {"cmd":"metrics"}
//! ```
//!
//! Responses are `{"ok":true,"result":...}` or
//! `{"ok":false,"error":{"kind":...,"message":...,"retryable":...}}`.

use std::sync::Arc;

use loyalty_telemetry::{encode_metrics, TelemetryError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{BusinessId, CampaignId, GeoPoint, UserId};
use sl_02_qr_codec::encode_with_display;
use sl_03_stamp_ledger::{LedgerError, StampLedgerApi};
use sl_04_cycle_engine::{CycleEngineApi, ScanError, ScanRequest};
use thiserror::Error;
use tracing::debug;

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Scan {
        user_id: UserId,
        payload: String,
        #[serde(default)]
        location: Option<GeoPoint>,
    },
    Verify {
        payload: String,
    },
    Cards {
        user_id: UserId,
    },
    Joinable {
        user_id: UserId,
    },
    History {
        user_id: UserId,
    },
    /// Render the payload a business would print on its QR code.
    Qr {
        campaign_id: CampaignId,
        business_id: BusinessId,
        #[serde(default)]
        business_name: Option<String>,
        #[serde(default)]
        campaign_name: Option<String>,
    },
    Metrics,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scan { .. } => "scan",
            Self::Verify { .. } => "verify",
            Self::Cards { .. } => "cards",
            Self::Joinable { .. } => "joinable",
            Self::History { .. } => "history",
            Self::Qr { .. } => "qr",
            Self::Metrics => "metrics",
        }
    }
}

/// Errors surfaced to the caller as `{"ok":false,...}`.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unrecognized command: {0}")]
    BadCommand(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CommandError {
    /// Stable error code for the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadCommand(_) => "bad_command",
            Self::Scan(err) => err.kind(),
            Self::Ledger(err) if err.is_infrastructure() => "infrastructure",
            Self::Ledger(_) => "ledger",
            Self::Telemetry(_) | Self::Encode(_) => "internal",
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Scan(err) => err.is_retryable(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    pub retryable: bool,
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(err: &CommandError) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind: err.kind().to_string(),
                message: err.to_string(),
                retryable: err.is_retryable(),
            }),
        }
    }
}

/// Executes commands against the engine and ledger.
pub struct CommandHandler {
    engine: Arc<dyn CycleEngineApi>,
    ledger: Arc<dyn StampLedgerApi>,
}

impl CommandHandler {
    pub fn new(engine: Arc<dyn CycleEngineApi>, ledger: Arc<dyn StampLedgerApi>) -> Self {
        Self { engine, ledger }
    }

    /// Parse and execute one request line. Never fails; errors become responses.
    pub async fn handle_line(&self, line: &str) -> Response {
        let outcome = match serde_json::from_str::<Command>(line) {
            Ok(command) => self.execute(command).await,
            Err(err) => Err(CommandError::BadCommand(err.to_string())),
        };

        match outcome {
            Ok(result) => Response::success(result),
            Err(err) => Response::failure(&err),
        }
    }

    pub async fn execute(&self, command: Command) -> Result<Value, CommandError> {
        debug!(cmd = command.name(), "Executing command");

        let result = match command {
            Command::Scan {
                user_id,
                payload,
                location,
            } => {
                let request = ScanRequest {
                    user_id,
                    payload,
                    location,
                };
                serde_json::to_value(self.engine.handle_scan(request).await?)?
            }
            Command::Verify { payload } => {
                serde_json::to_value(self.engine.verify_payload(&payload).await?)?
            }
            Command::Cards { user_id } => {
                serde_json::to_value(self.engine.list_cards(&user_id).await?)?
            }
            Command::Joinable { user_id } => {
                serde_json::to_value(self.engine.list_joinable(&user_id).await?)?
            }
            Command::History { user_id } => {
                serde_json::to_value(self.ledger.list_for_user(&user_id).await?)?
            }
            Command::Qr {
                campaign_id,
                business_id,
                business_name,
                campaign_name,
            } => {
                let payload = encode_with_display(
                    &campaign_id,
                    &business_id,
                    business_name.as_deref(),
                    campaign_name.as_deref(),
                );
                json!({ "payload": payload })
            }
            Command::Metrics => json!({ "text": encode_metrics()? }),
        };

        Ok(result)
    }
}
