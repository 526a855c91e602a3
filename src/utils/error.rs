//! Error types and handling
//!
//! Common error types used across the application core. Capture and
//! arbitration failures are returned as values and rendered as user-facing
//! messages with a manual retry affordance; nothing here is fatal to the
//! rest of the console.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arbiter::CameraOwner;

/// Classification of a failed camera acquisition.
///
/// The platform reports failures in its own vocabulary; [`CaptureError`]
/// maps them onto the four cases the UI can act on. Acquisition is never
/// retried automatically - repeated grabs could mask a genuinely busy
/// device - so each variant carries enough context for the user to decide
/// what to do before retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("camera device is busy: {0}")]
    DeviceBusy(String),

    #[error("no camera device found: {0}")]
    DeviceNotFound(String),

    #[error("camera error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Actionable guidance shown next to the manual retry button.
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::PermissionDenied(_) => {
                "Camera access is blocked in the browser. \
                 Allow camera access in the site settings, then retry."
                    .to_string()
            }
            CaptureError::DeviceBusy(_) => {
                "The camera is being used by another application. \
                 Close the recognition view or any other program holding \
                 the camera. If the recognition service still has the \
                 device open, restart it, then retry."
                    .to_string()
            }
            CaptureError::DeviceNotFound(_) => {
                "No connected camera was found. Plug one in and retry.".to_string()
            }
            CaptureError::Unknown(detail) => {
                format!("The camera could not be started: {detail}")
            }
        }
    }
}

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("camera already in use by the {holder} view")]
    ResourceConflict { holder: CameraOwner },

    #[error("recording session error: {0}")]
    Session(#[from] crate::capture::session::SessionError),

    #[error("event feed transport interrupted: {0}")]
    Transport(String),

    #[error("malformed event payload: {0}")]
    MalformedEvent(String),

    #[error("remote service error: {0}")]
    Remote(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Non-blocking, user-facing explanation of the failure.
    ///
    /// A denied arbiter request must never fail silently; this is the text
    /// the views render for it.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Capture(err) => err.user_message(),
            AppError::ResourceConflict { holder } => format!(
                "The camera is currently in use by the {holder} view. \
                 Close that view and try again."
            ),
            other => other.to_string(),
        }
    }
}

/// Error response for the frontend
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        let code = match error {
            AppError::Capture(CaptureError::PermissionDenied(_)) => "PERMISSION_DENIED",
            AppError::Capture(CaptureError::DeviceBusy(_)) => "DEVICE_BUSY",
            AppError::Capture(CaptureError::DeviceNotFound(_)) => "DEVICE_NOT_FOUND",
            AppError::Capture(CaptureError::Unknown(_)) => "CAPTURE_ERROR",
            AppError::ResourceConflict { .. } => "RESOURCE_CONFLICT",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::Transport(_) => "TRANSPORT_INTERRUPTED",
            AppError::MalformedEvent(_) => "MALFORMED_EVENT",
            AppError::Remote(_) => "REMOTE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.user_message(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
