//! Reconnecting event feed
//!
//! Delivers structured log entries from the recognition service to the UI,
//! surviving transport interruptions transparently. The feed is
//! receive-only and owns both the bounded log and the connection state;
//! nothing else writes to either.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::channel::ChannelSignal;

/// Maximum number of retained log entries; older entries are silently
/// dropped once the cap is exceeded.
pub const EVENT_LOG_CAP: usize = 100;

/// Connection state of the event subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Transport opened, handshake pending
    Connecting,
    /// Handshake completed, events flowing
    Connected,
    /// Transport lost; it retries on its own
    Reconnecting,
    /// Explicitly closed; terminal for this subscription
    Disconnected,
}

/// Severity of a live event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One structured event received from the service. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub timestamp: String,
    pub level: EventLevel,
    pub message: String,
}

struct FeedShared {
    state: ConnectionState,
    /// Most-recent-first, capped at [`EVENT_LOG_CAP`].
    log: VecDeque<EventLogEntry>,
    alive: bool,
}

/// A live subscription to the event channel.
///
/// Created with the transport's signal stream; closed on consumer unmount.
/// A closed feed is terminal - create a new one to resume.
pub struct LiveEventFeed {
    shared: Arc<Mutex<FeedShared>>,
    task: Option<JoinHandle<()>>,
}

impl LiveEventFeed {
    /// Start consuming a freshly opened transport. Initial state is
    /// `Connecting` until the first `Opened` signal arrives.
    pub fn open(mut signals: mpsc::UnboundedReceiver<ChannelSignal>) -> Self {
        let shared = Arc::new(Mutex::new(FeedShared {
            state: ConnectionState::Connecting,
            log: VecDeque::new(),
            alive: true,
        }));

        let task_shared = Arc::clone(&shared);
        let task = tokio::spawn(async move {
            while let Some(signal) = signals.recv().await {
                let mut s = task_shared.lock();
                if !s.alive {
                    break;
                }
                match signal {
                    ChannelSignal::Opened => {
                        s.state = ConnectionState::Connected;
                        tracing::debug!("event channel connected");
                    }
                    ChannelSignal::Interrupted => {
                        s.state = ConnectionState::Reconnecting;
                        tracing::warn!("event channel interrupted; transport is retrying");
                    }
                    ChannelSignal::Message(raw) => {
                        // Malformed payloads are diagnosed and dropped; they
                        // never change the connection state or kill the feed.
                        match serde_json::from_str::<EventLogEntry>(&raw) {
                            Ok(entry) => {
                                s.log.push_front(entry);
                                s.log.truncate(EVENT_LOG_CAP);
                            }
                            Err(err) => {
                                tracing::warn!(%err, "dropping malformed event payload");
                            }
                        }
                    }
                }
            }
        });

        Self {
            shared,
            task: Some(task),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.lock().state
    }

    /// Snapshot of the log, newest first.
    pub fn entries(&self) -> Vec<EventLogEntry> {
        self.shared.lock().log.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.shared.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tear the subscription down. Synchronously detaches the consumer task
    /// before returning; no signal is processed afterwards.
    pub fn close(&mut self) {
        {
            let mut s = self.shared.lock();
            s.alive = false;
            s.state = ConnectionState::Disconnected;
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        tracing::debug!("event feed closed");
    }
}

impl Drop for LiveEventFeed {
    fn drop(&mut self) {
        self.close();
    }
}
