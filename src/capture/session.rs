//! Capture session state machine
//!
//! Owns acquisition and release of the physical camera stream plus the
//! encoded-recording lifecycle: start, chunk accumulation, stop, blob
//! assembly, and derived telemetry (elapsed seconds, frame count,
//! instantaneous frame rate).
//!
//! Concurrency contract: encoder chunks and the telemetry tick arrive on
//! independent tasks with no mutual ordering. Every task checks the session
//! liveness epoch before mutating shared state, so nothing fires against a
//! released session. `release()` invalidates the epoch synchronously before
//! returning and is safe to call from any state, any number of times.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use super::traits::{CameraDevice, CaptureStream, ChunkEncoder, EncoderFactory};
use crate::utils::error::CaptureError;

/// Interval at which the encoder is asked to flush a chunk.
pub const ENCODER_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// Interval of the telemetry tick.
pub const TELEMETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Media type of the assembled recording.
pub const VIDEO_MIME: &str = "video/mp4";

/// Current state of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Created, camera not yet requested
    Idle,
    /// Camera acquisition in flight
    Acquiring,
    /// Live stream held, not recording
    Ready,
    /// Encoder running
    Recording,
    /// Torn down; terminal
    Released,
    /// Acquisition failed; re-invoke `acquire` to retry
    Error,
}

/// Lifecycle misuse errors, distinct from platform capture failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("camera is not ready; start the camera before recording")]
    NotReady,

    #[error("a recording is still in progress; stop it first")]
    StillRecording,
}

/// Telemetry snapshot for an active recording.
///
/// `fps` is a sliding per-second rate: frames produced since the previous
/// tick divided by the actual wall-clock time elapsed. It may spike or drop
/// with encoder scheduling jitter and is deliberately not smoothed, so
/// stalls stay visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub elapsed_seconds: u64,
    pub frame_count: u64,
    pub fps: f64,
}

/// The finished recording, assembled from the chunk sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingBlob {
    pub data: Vec<u8>,
    pub mime: &'static str,
}

impl RecordingBlob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// State shared with the chunk-drain and telemetry tasks.
struct Shared {
    state: SessionState,
    chunks: Vec<Vec<u8>>,
    telemetry: Telemetry,
    diagnostic: Option<String>,
    /// Liveness epoch. `release()` bumps it; a task whose epoch no longer
    /// matches must not mutate anything.
    epoch: u64,
}

/// One camera capture session, scoped to the recording view's lifetime.
///
/// Created on view mount, camera acquired via [`acquire`], encoder created
/// lazily on the first [`start_recording`], torn down by [`release`] on
/// every exit path.
///
/// [`acquire`]: CaptureSession::acquire
/// [`start_recording`]: CaptureSession::start_recording
/// [`release`]: CaptureSession::release
pub struct CaptureSession {
    id: Uuid,
    device: Arc<dyn CameraDevice>,
    encoders: Arc<dyn EncoderFactory>,
    stream: Option<Box<dyn CaptureStream>>,
    encoder: Option<Box<dyn ChunkEncoder>>,
    shared: Arc<Mutex<Shared>>,
    chunk_task: Option<JoinHandle<()>>,
    telemetry_task: Option<JoinHandle<()>>,
}

impl CaptureSession {
    pub fn new(device: Arc<dyn CameraDevice>, encoders: Arc<dyn EncoderFactory>) -> Self {
        Self {
            id: Uuid::new_v4(),
            device,
            encoders,
            stream: None,
            encoder: None,
            shared: Arc::new(Mutex::new(Shared {
                state: SessionState::Idle,
                chunks: Vec::new(),
                telemetry: Telemetry::default(),
                diagnostic: None,
                epoch: 0,
            })),
            chunk_task: None,
            telemetry_task: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    pub fn is_recording(&self) -> bool {
        self.state() == SessionState::Recording
    }

    /// Human-readable diagnostic from the last failed acquisition.
    pub fn diagnostic(&self) -> Option<String> {
        self.shared.lock().diagnostic.clone()
    }

    pub fn telemetry(&self) -> Telemetry {
        self.shared.lock().telemetry
    }

    /// Request the live video stream from the platform.
    ///
    /// Succeeds into `Ready`; on failure stores a user-facing diagnostic and
    /// lands in `Error`. There is no automatic retry - the caller re-invokes
    /// after the user asks for it. Calling while already `Ready` or
    /// `Recording` is a no-op.
    pub async fn acquire(&mut self) -> Result<(), CaptureError> {
        {
            let mut shared = self.shared.lock();
            match shared.state {
                SessionState::Ready | SessionState::Recording => return Ok(()),
                SessionState::Released => {
                    return Err(CaptureError::Unknown("session already released".into()))
                }
                _ => shared.state = SessionState::Acquiring,
            }
            shared.diagnostic = None;
        }

        match self.device.acquire().await {
            Ok(stream) => {
                self.stream = Some(stream);
                self.shared.lock().state = SessionState::Ready;
                tracing::info!(session = %self.id, "camera stream acquired");
                Ok(())
            }
            Err(err) => {
                let mut shared = self.shared.lock();
                shared.diagnostic = Some(err.user_message());
                shared.state = SessionState::Error;
                tracing::warn!(session = %self.id, %err, "camera acquisition failed");
                Err(err)
            }
        }
    }

    /// Start a new recording on the live stream.
    ///
    /// Valid only from `Ready` (calling while already `Recording` is a
    /// no-op). Clears the chunk sequence, binds a fresh encoder and starts
    /// the encoder flush and telemetry ticks.
    pub fn start_recording(&mut self) -> Result<(), SessionError> {
        let epoch = {
            let mut shared = self.shared.lock();
            match shared.state {
                SessionState::Recording => return Ok(()),
                SessionState::Ready => {}
                _ => return Err(SessionError::NotReady),
            }
            shared.chunks.clear();
            shared.telemetry = Telemetry::default();
            shared.state = SessionState::Recording;
            shared.epoch += 1;
            shared.epoch
        };

        // State machine guarantees a stream in Ready.
        let stream = match self.stream.as_deref() {
            Some(stream) => stream,
            None => return Err(SessionError::NotReady),
        };

        let mut encoder = self.encoders.create(stream);
        let mut chunk_rx = encoder.start(ENCODER_FLUSH_INTERVAL);
        self.encoder = Some(encoder);

        // Chunk drain: append-only, in produced order. Runs until the
        // encoder closes the channel after its stop-flush, and keeps
        // counting the flushed tail even once the session is back in Ready.
        let shared = Arc::clone(&self.shared);
        self.chunk_task = Some(tokio::spawn(async move {
            while let Some(chunk) = chunk_rx.recv().await {
                let mut s = shared.lock();
                if s.epoch != epoch {
                    break;
                }
                s.telemetry.frame_count += 1;
                s.chunks.push(chunk);
            }
        }));

        // Telemetry tick: one-second cadence, fps computed against the
        // actual wall-clock delta to tolerate scheduling jitter.
        let shared = Arc::clone(&self.shared);
        self.telemetry_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TELEMETRY_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // first tick completes immediately

            let mut last_tick = Instant::now();
            let mut frames_at_last_tick = 0u64;
            loop {
                ticker.tick().await;
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick).as_secs_f64();
                last_tick = now;

                let mut s = shared.lock();
                if s.epoch != epoch || s.state != SessionState::Recording {
                    break;
                }
                s.telemetry.elapsed_seconds += 1;
                let produced = s.telemetry.frame_count - frames_at_last_tick;
                frames_at_last_tick = s.telemetry.frame_count;
                s.telemetry.fps = if elapsed > 0.0 {
                    produced as f64 / elapsed
                } else {
                    0.0
                };
            }
        }));

        tracing::info!(session = %self.id, "recording started");
        Ok(())
    }

    /// Stop the active recording.
    ///
    /// Stops the encoder (flushing buffered data into the chunk sequence)
    /// and cancels the telemetry tick before returning. Idempotent: a no-op
    /// unless currently `Recording`.
    pub fn stop_recording(&mut self) {
        {
            let mut shared = self.shared.lock();
            if shared.state != SessionState::Recording {
                return;
            }
            shared.state = SessionState::Ready;
        }

        // The stop-flush closes the chunk channel; the drain task exits on
        // its own once the tail has been appended.
        if let Some(mut encoder) = self.encoder.take() {
            encoder.stop();
        }
        if let Some(task) = self.telemetry_task.take() {
            task.abort();
        }

        tracing::info!(session = %self.id, "recording stopped");
    }

    /// Assemble the recorded chunks into a single blob.
    ///
    /// Meant to be called after [`stop_recording`]; if no recording ever
    /// happened the blob is simply empty.
    ///
    /// [`stop_recording`]: CaptureSession::stop_recording
    pub fn blob(&self) -> RecordingBlob {
        let shared = self.shared.lock();
        let mut data = Vec::with_capacity(shared.chunks.iter().map(Vec::len).sum());
        for chunk in &shared.chunks {
            data.extend_from_slice(chunk);
        }
        RecordingBlob {
            data,
            mime: VIDEO_MIME,
        }
    }

    /// Tear the session down: invalidate callbacks, cancel timers, stop the
    /// device tracks.
    ///
    /// Callable from any state and idempotent; whatever unwinds the owning
    /// view must reach this on every exit path. After it returns no task
    /// mutates the session again.
    pub fn release(&mut self) {
        {
            let mut shared = self.shared.lock();
            shared.epoch += 1;
            shared.state = SessionState::Released;
        }

        if let Some(mut encoder) = self.encoder.take() {
            encoder.stop();
        }
        if let Some(task) = self.telemetry_task.take() {
            task.abort();
        }
        if let Some(task) = self.chunk_task.take() {
            task.abort();
        }
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
        }

        tracing::info!(session = %self.id, "capture session released");
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}
