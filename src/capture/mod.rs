//! Camera capture subsystem
//!
//! - Platform-agnostic traits for the capture device and encoder
//! - CaptureSession state machine for local video recording

pub mod session;
pub mod traits;

pub use session::{CaptureSession, RecordingBlob, SessionError, SessionState, Telemetry};
pub use traits::{CameraDevice, CaptureStream, ChunkEncoder, EncoderFactory};
