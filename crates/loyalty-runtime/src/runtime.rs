//! # Loyalty Runtime
//!
//! Owns the container, the notifier task and the command loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared_bus::EventPublisher;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::commands::CommandHandler;
use crate::container::LoyaltyContainer;
use crate::notifications::RewardNotifier;

pub struct LoyaltyRuntime {
    container: Arc<LoyaltyContainer>,
    handler: CommandHandler,
    shutdown_tx: watch::Sender<bool>,
    notifier: Option<JoinHandle<u64>>,
}

impl LoyaltyRuntime {
    /// Wire the command handler and start the reward notifier.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(container: LoyaltyContainer) -> Self {
        let container = Arc::new(container);
        let handler = CommandHandler::new(container.engine.clone(), container.ledger.clone());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let notifier = RewardNotifier::subscribe(&container.events);
        let notifier = tokio::spawn(notifier.run(shutdown_rx));

        info!("Loyalty runtime started");
        Self {
            container,
            handler,
            shutdown_tx,
            notifier: Some(notifier),
        }
    }

    pub fn container(&self) -> Arc<LoyaltyContainer> {
        Arc::clone(&self.container)
    }

    pub fn handler(&self) -> &CommandHandler {
        &self.handler
    }

    /// Serve JSON-lines commands until the reader is exhausted.
    ///
    /// Blank lines are skipped. Returns the number of commands answered.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut answered = 0;

        while let Some(line) = lines.next_line().await.context("Failed to read command")? {
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handler.handle_line(&line).await;
            let mut encoded =
                serde_json::to_string(&response).context("Failed to encode response")?;
            encoded.push('\n');
            writer
                .write_all(encoded.as_bytes())
                .await
                .context("Failed to write response")?;
            writer.flush().await.context("Failed to flush response")?;
            answered += 1;
        }

        Ok(answered)
    }

    /// Stop the notifier after it flushes pending rewards.
    ///
    /// Returns the number of reward notifications delivered.
    pub async fn shutdown(&mut self) -> u64 {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let Some(notifier) = self.notifier.take() else {
            return 0;
        };
        let delivered = match notifier.await {
            Ok(delivered) => delivered,
            Err(e) => {
                error!("Reward notifier failed: {}", e);
                0
            }
        };

        let events = &self.container.events;
        info!(
            published = events.events_published(),
            dropped = events.events_dropped(),
            "Event bus drained"
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Catalog, RuntimeConfig};

    #[tokio::test]
    async fn test_serve_skips_blank_lines() {
        let container = LoyaltyContainer::new(RuntimeConfig::default(), Catalog::demo()).unwrap();
        let mut runtime = LoyaltyRuntime::start(container);

        let input = b"\n{\"cmd\":\"cards\",\"user_id\":\"u1\"}\n   \n{\"cmd\":\"nope\"}\n";
        let mut output = Vec::new();
        let answered = runtime.serve(&input[..], &mut output).await.unwrap();

        assert_eq!(answered, 2);
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"{"ok":true,"result":[]}"#);
        assert!(lines[1].starts_with(r#"{"ok":false"#));

        assert_eq!(runtime.shutdown().await, 0);
        assert_eq!(runtime.shutdown().await, 0);
    }
}
