//! # Notification Poller
//!
//! Background task that polls the upstream `/notification` endpoint on a
//! fixed interval and publishes the latest snapshot through a watch
//! channel. Consumers (the API layer) always read the most recent
//! successful snapshot; a failed poll keeps the previous one.

use crate::upstream::DirectoryClient;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Poll cadence. The original site refreshed its banner every 5 seconds.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

// =============================================================================
// POLLER
// =============================================================================

/// Handle to a running notification poll loop.
pub struct NotificationPoller {
    receiver: watch::Receiver<Vec<Value>>,
    task: JoinHandle<()>,
}

impl NotificationPoller {
    /// Spawn the poll loop against the given upstream client.
    #[must_use]
    pub fn spawn(client: DirectoryClient, interval: Duration) -> Self {
        let (sender, receiver) = watch::channel(Vec::new());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(100)));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match client.fetch_notifications().await {
                    Ok(items) => {
                        // Only wake watchers when the content actually changed.
                        if *sender.borrow() != items {
                            tracing::debug!(count = items.len(), "Notification snapshot updated");
                            let _ = sender.send(items);
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Notification poll failed, keeping last snapshot: {}", e);
                    }
                }
                if sender.is_closed() {
                    break;
                }
            }
        });

        Self { receiver, task }
    }

    /// A receiver for the latest notification snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Value>> {
        self.receiver.clone()
    }

    /// Stop the poll loop.
    pub fn stop(self) {
        self.task.abort();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;

    #[tokio::test]
    async fn poller_starts_with_empty_snapshot() {
        let client = DirectoryClient::new(&UpstreamConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        });
        let poller = NotificationPoller::spawn(client, Duration::from_secs(60));
        let receiver = poller.subscribe();
        assert!(receiver.borrow().is_empty());
        poller.stop();
    }
}
