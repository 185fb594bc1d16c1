//! services/docvault/src/workflows/upload.rs

use docvault_core::action::ActionState;
use docvault_core::domain::{Document, NewDocument};
use docvault_core::ports::DocumentApi;
use docvault_core::validation::validate_upload;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::state::AppState;

pub struct DocumentUpload {
    api: Arc<dyn DocumentApi>,
    state: ActionState<Document>,
}

impl DocumentUpload {
    pub fn new(app_state: &AppState) -> Self {
        Self {
            api: app_state.api.clone(),
            state: ActionState::default(),
        }
    }

    /// Validates the file locally, then uploads it. A rejected file never
    /// reaches the backend.
    pub async fn upload(&mut self, upload: NewDocument) -> &ActionState<Document> {
        if self.state.is_in_flight() {
            return &self.state;
        }
        if let Err(e) = validate_upload(&upload) {
            warn!("Rejected upload of '{}': {}", upload.file_name, e);
            self.state.reject(e);
            return &self.state;
        }

        let state = self.state.start();
        let file_name = upload.file_name.clone();
        let result = self.api.create_document(upload).await;
        match &result {
            Ok(doc) => info!("Uploaded '{}' as document {}", file_name, doc.id),
            Err(e) => error!("Failed to upload '{}': {:?}", file_name, e),
        }
        state.finish(result);
        &self.state
    }

    pub fn state(&self) -> &ActionState<Document> {
        &self.state
    }

    pub fn dismiss_error(&mut self) {
        self.state.dismiss();
    }
}
