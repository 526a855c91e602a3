//! Server-push channel surface
//!
//! Models the one-way, long-lived event channel (`GET /events`). The
//! transport owns reconnection and backoff; this layer only observes its
//! lifecycle, so an interruption is followed - eventually - by a fresh
//! `Opened` without anything here counting attempts.

use tokio::sync::mpsc;

/// Lifecycle and payload signals emitted by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSignal {
    /// Handshake completed. Fires again after every automatic reconnect.
    Opened,
    /// One raw message payload, in delivery order.
    Message(String),
    /// Transport lost. The transport keeps retrying with its own backoff.
    Interrupted,
}

/// Opens the server-push transport.
///
/// The host application implements this over its HTTP stack; tests script
/// the signal sequence directly.
pub trait EventChannelFactory: Send + Sync {
    fn open(&self) -> mpsc::UnboundedReceiver<ChannelSignal>;
}
