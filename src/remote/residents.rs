//! Residents upload contract
//!
//! The recording view submits the finished video as multipart form data
//! together with the resident's details. The wire field names are the
//! backend's Spanish ones.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capture::session::RecordingBlob;
use crate::utils::error::AppError;

/// Companion form fields of the uploaded video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResidentForm {
    #[serde(rename = "nombre")]
    pub name: String,

    pub dni: String,

    #[serde(rename = "departamento")]
    pub apartment: String,
}

/// Residents backend, consumed only for the recorded-video upload.
#[async_trait]
pub trait ResidentsApi: Send + Sync {
    /// Multipart upload: `{video, nombre, dni, departamento}`.
    async fn upload_recorded(
        &self,
        video: RecordingBlob,
        form: NewResidentForm,
    ) -> Result<(), AppError>;
}
