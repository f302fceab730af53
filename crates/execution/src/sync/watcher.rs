//! Polling watcher for the provider session.

use crate::api::{DxMgnPoolApi, UserSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

/// Change observed in the provider session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Account, balance or network differ from the previous poll.
    Changed(UserSnapshot),
    /// The session stopped answering. Sent once per outage.
    Unavailable(String),
}

/// Configuration for the provider watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Interval between polls.
    pub poll_interval: Duration,
    /// Capacity of the event channel.
    pub channel_capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            channel_capacity: 64,
        }
    }
}

/// Polls account, balance and network and reports changes.
pub struct ProviderWatcher {
    /// Aggregator used for reads.
    api: Arc<DxMgnPoolApi>,
    /// Configuration.
    config: WatcherConfig,
    /// Last successful read.
    last: Arc<RwLock<Option<UserSnapshot>>>,
    /// Whether the previous poll failed.
    unavailable: Arc<RwLock<bool>>,
    /// Event sender.
    event_tx: mpsc::Sender<WatchEvent>,
    /// Event receiver.
    event_rx: Option<mpsc::Receiver<WatchEvent>>,
}

impl ProviderWatcher {
    /// Creates a new watcher.
    pub fn new(api: Arc<DxMgnPoolApi>, config: WatcherConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        Self {
            api,
            config,
            last: Arc::new(RwLock::new(None)),
            unavailable: Arc::new(RwLock::new(false)),
            event_tx: tx,
            event_rx: Some(rx),
        }
    }

    /// Takes the event receiver.
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<WatchEvent>> {
        self.event_rx.take()
    }

    /// Last snapshot read from the provider.
    pub async fn last_snapshot(&self) -> Option<UserSnapshot> {
        *self.last.read().await
    }

    /// Polls once, returning the event to report, if any.
    pub async fn poll_once(&self) -> Option<WatchEvent> {
        match self.api.user_state().await {
            Ok(snapshot) => {
                *self.unavailable.write().await = false;
                let mut last = self.last.write().await;
                if last.as_ref() == Some(&snapshot) {
                    return None;
                }
                debug!(
                    account = %format!("{:#x}", snapshot.account),
                    network = %snapshot.network,
                    "Provider state changed"
                );
                *last = Some(snapshot);
                Some(WatchEvent::Changed(snapshot))
            }
            Err(e) => {
                let mut unavailable = self.unavailable.write().await;
                if *unavailable {
                    return None;
                }
                *unavailable = true;
                *self.last.write().await = None;
                warn!(error = %e, "Provider unavailable");
                Some(WatchEvent::Unavailable(e.to_string()))
            }
        }
    }

    /// Starts the polling loop. Returns when the receiver is dropped.
    pub async fn start(&self) {
        info!(
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "Starting provider watcher"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);

        loop {
            interval.tick().await;

            let Some(event) = self.poll_once().await else {
                continue;
            };
            if self.event_tx.send(event).await.is_err() {
                info!("Watcher receiver dropped, stopping");
                break;
            }
        }
    }
}
