//! Async driver pairing an [`AnalysisLifecycle`] with an [`AnalysisClient`].
//!
//! The lifecycle lock is only held to start and to finish a submission, never
//! across the service call, so a new selection or submission can always get
//! in while a request is outstanding.

use clariscan_core::{AnalysisClient, DocumentUpload};
use tokio::sync::Mutex;
use tracing::info;

use crate::lifecycle::{AnalysisLifecycle, Completion, LifecycleState, SubmitError};

pub struct Session<C> {
    client: C,
    lifecycle: Mutex<AnalysisLifecycle>,
}

impl<C: AnalysisClient> Session<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            lifecycle: Mutex::new(AnalysisLifecycle::new()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn select(&self, upload: DocumentUpload) {
        self.lifecycle.lock().await.select(upload);
    }

    pub async fn clear_selection(&self) {
        self.lifecycle.lock().await.clear_selection();
    }

    /// Submit the selected file and apply the response if it is still current.
    ///
    /// Returns `Err` only for local validation failures; service failures
    /// land in [`LifecycleState::Failed`].
    pub async fn submit(&self) -> Result<Completion, SubmitError> {
        let pending = self.lifecycle.lock().await.begin_submit()?;
        info!(
            file = %pending.upload.file_name,
            generation = pending.generation.value(),
            "submitting document for analysis"
        );

        let outcome = self.client.analyze(&pending.upload).await;

        let completion = self
            .lifecycle
            .lock()
            .await
            .complete(pending.generation, outcome);
        Ok(completion)
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> LifecycleState {
        self.lifecycle.lock().await.state().clone()
    }

    pub async fn notice(&self) -> Option<SubmitError> {
        self.lifecycle.lock().await.notice()
    }
}
