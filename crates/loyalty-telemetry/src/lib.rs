//! # Loyalty Telemetry
//!
//! Logging and metrics for the stamp-loyalty engine.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use loyalty_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Logs and metrics are now being collected
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SL_SERVICE_NAME` | `stamp-loyalty` | Service name in logs |
//! | `SL_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SL_JSON_LOGS` | `false` | Emit JSON log lines |
//! | `SL_CONSOLE_OUTPUT` | `true` | Write logs at all |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, REGISTRY, REWARDS_EARNED, SCANS_REJECTED,
    SCAN_DURATION, STAMPS_ISSUED, STAMPS_REDEEMED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
