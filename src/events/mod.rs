//! Live event feed
//!
//! A best-effort, self-healing subscription to the recognition service's
//! server-push event channel:
//! - ChannelSignal / EventChannelFactory model the transport surface
//! - LiveEventFeed consumes signals, keeps the bounded log and exposes the
//!   connection state

pub mod channel;
pub mod feed;

pub use channel::{ChannelSignal, EventChannelFactory};
pub use feed::{ConnectionState, EventLevel, EventLogEntry, LiveEventFeed, EVENT_LOG_CAP};
