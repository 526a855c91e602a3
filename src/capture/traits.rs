//! Capture trait definitions
//!
//! Platform-agnostic traits for the camera device and the chunked video
//! encoder. The core never touches hardware directly; the host application
//! supplies implementations backed by the platform capture APIs, and tests
//! supply scripted fakes.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::utils::error::CaptureError;

/// A live handle to the physical camera's video frames.
pub trait CaptureStream: Send + Sync {
    /// Stop all device tracks. Must be idempotent.
    fn stop_tracks(&mut self);
}

/// The camera device as exposed by the platform.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request a live, video-only capture stream.
    ///
    /// Platform failures are classified into [`CaptureError`]; the caller
    /// decides whether to re-invoke. No retry happens at this layer.
    async fn acquire(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// An encoder bound to a live stream, producing compressed video segments.
pub trait ChunkEncoder: Send {
    /// Begin encoding. One chunk is delivered per `flush_interval` tick, in
    /// produced order. The returned channel closes once [`stop`] has flushed
    /// any remaining buffered data.
    ///
    /// [`stop`]: ChunkEncoder::stop
    fn start(&mut self, flush_interval: Duration) -> mpsc::UnboundedReceiver<Vec<u8>>;

    /// Stop encoding, flushing buffered data into the chunk channel and
    /// cancelling the flush timer. Must be idempotent.
    fn stop(&mut self);
}

/// Creates an encoder for a live stream.
///
/// Encoders are created lazily on each recording start, never at session
/// construction.
pub trait EncoderFactory: Send + Sync {
    fn create(&self, stream: &dyn CaptureStream) -> Box<dyn ChunkEncoder>;
}
