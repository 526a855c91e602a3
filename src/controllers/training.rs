//! Training view controller
//!
//! Holds the dataset selection for the training page - a plain set of
//! resident ids that lives only for the page session - and forwards it to
//! the training backend. Internal logic is a trivial set-toggle; the
//! contract is what matters.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::remote::training::{TrainDatasetRequest, TrainingApi, TrainingCandidate};
use crate::utils::error::AppResult;

pub struct TrainingController {
    api: Arc<dyn TrainingApi>,
    selection: BTreeSet<i64>,
}

impl TrainingController {
    pub fn new(api: Arc<dyn TrainingApi>) -> Self {
        Self {
            api,
            selection: BTreeSet::new(),
        }
    }

    pub async fn candidates(&self) -> AppResult<Vec<TrainingCandidate>> {
        self.api.candidates().await
    }

    /// Toggle a resident in or out of the selection.
    pub fn toggle(&mut self, resident_id: i64) {
        if !self.selection.remove(&resident_id) {
            self.selection.insert(resident_id);
        }
    }

    pub fn is_selected(&self, resident_id: i64) -> bool {
        self.selection.contains(&resident_id)
    }

    /// Currently selected resident ids, ascending.
    pub fn selected(&self) -> Vec<i64> {
        self.selection.iter().copied().collect()
    }

    /// Send the selection for dataset generation.
    ///
    /// Cleared only on success, so a failed submission can simply be
    /// retried. An empty selection is a no-op.
    pub async fn submit(&mut self) -> AppResult<()> {
        if self.selection.is_empty() {
            return Ok(());
        }
        let request = TrainDatasetRequest {
            residentes: self.selected(),
        };
        tracing::info!(count = request.residentes.len(), "submitting training dataset");
        self.api.train_dataset(request).await?;
        self.selection.clear();
        Ok(())
    }

    /// Kick off model training on the backend.
    pub async fn train_model(&self) -> AppResult<()> {
        self.api.train_model().await
    }
}
