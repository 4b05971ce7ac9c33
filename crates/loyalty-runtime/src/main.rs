//! # Stamp Loyalty Runtime
//!
//! Reads one JSON command per line on stdin and writes one JSON response
//! per line on stdout. Logs go to stderr.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (metrics registry, logging)
//! 2. Load configuration from the environment
//! 3. Load the catalog and wire components
//! 4. Start the reward notifier
//! 5. Serve commands until stdin closes or Ctrl+C

use anyhow::{Context, Result};
use loyalty_runtime::{LoyaltyContainer, LoyaltyRuntime, RuntimeConfig};
use loyalty_telemetry::{init_telemetry, TelemetryConfig};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("Invalid runtime configuration")?;
    let container =
        LoyaltyContainer::from_config(config).context("Failed to build loyalty container")?;
    let mut runtime = LoyaltyRuntime::start(container);

    info!("===========================================");
    info!("  Stamp Loyalty Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        served = runtime.serve(stdin, stdout) => {
            let answered = served?;
            info!(answered, "Input closed");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            info!("Interrupt received");
        }
    }

    let delivered = runtime.shutdown().await;
    info!(delivered, "Shutdown complete");
    Ok(())
}
