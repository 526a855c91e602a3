//! Training backend contract
//!
//! Plain request/response calls; no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// A resident eligible for dataset generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCandidate {
    pub id: i64,

    #[serde(rename = "nombre")]
    pub name: String,

    pub needs_training: bool,
}

/// Body of `POST /residentes/train-dataset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainDatasetRequest {
    pub residentes: Vec<i64>,
}

/// Training backend.
#[async_trait]
pub trait TrainingApi: Send + Sync {
    /// `GET /residentes/training-candidates`
    async fn candidates(&self) -> Result<Vec<TrainingCandidate>, AppError>;

    /// `POST /residentes/train-dataset`
    async fn train_dataset(&self, request: TrainDatasetRequest) -> Result<(), AppError>;

    /// `POST /train-model`
    async fn train_model(&self) -> Result<(), AppError>;
}
