//! Recognition microservice contract
//!
//! `POST /camera/start`, `POST /camera/stop` and the MJPEG stream URL. The
//! live event channel of the same service is modelled separately in
//! [`crate::events`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// Outcome reported by `POST /camera/start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraStartStatus {
    Success,
    /// The service already holds the device; treated as started.
    AlreadyRunning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraStartResponse {
    pub status: CameraStartStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The recognition microservice.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// `POST /camera/start`
    async fn start_camera(&self) -> Result<CameraStartResponse, AppError>;

    /// `POST /camera/stop`
    async fn stop_camera(&self) -> Result<(), AppError>;

    /// Base URL of `GET /video-stream`. The stream is rendered directly by
    /// the UI and never parsed by this core; the controller appends a
    /// cache-busting timestamp.
    fn stream_url(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_response_wire_format() {
        let response: CameraStartResponse =
            serde_json::from_str(r#"{"status":"already_running"}"#).unwrap();
        assert_eq!(response.status, CameraStartStatus::AlreadyRunning);
        assert!(response.message.is_none());

        let response: CameraStartResponse =
            serde_json::from_str(r#"{"status":"error","message":"no device"}"#).unwrap();
        assert_eq!(response.status, CameraStartStatus::Error);
        assert_eq!(response.message.as_deref(), Some("no device"));
    }
}
