//! services/docvault/src/workflows/batch.rs
//!
//! Multi-select actions over the document list: process, export and delete.

use docvault_core::action::ActionState;
use docvault_core::domain::{BatchProcessOutcome, BatchStatus, Document, DocumentId, ExportFormat};
use docvault_core::ports::{ApiError, Confirm, DocumentApi};
use docvault_core::selection::Selection;
use docvault_core::validation::validate_selection;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::state::AppState;

pub struct BatchProcessing {
    api: Arc<dyn DocumentApi>,
    confirm: Arc<dyn Confirm>,
    documents: Vec<Document>,
    selection: Selection<DocumentId>,
    export_format: ExportFormat,
    process: ActionState<Vec<BatchProcessOutcome>>,
    export: ActionState<serde_json::Value>,
    delete: ActionState<usize>,
}

impl BatchProcessing {
    pub fn new(app_state: &AppState, documents: Vec<Document>) -> Self {
        Self {
            api: app_state.api.clone(),
            confirm: app_state.confirm.clone(),
            documents,
            selection: Selection::new(),
            export_format: app_state.config.default_export_format,
            process: ActionState::default(),
            export: ActionState::default(),
            delete: ActionState::default(),
        }
    }

    /// Replaces the list the selection is made from. Selected ids that are
    /// no longer listed are dropped.
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        let ids = self.document_ids();
        self.selection.retain_available(&ids);
    }

    pub fn toggle(&mut self, id: DocumentId) -> bool {
        self.selection.toggle(id)
    }

    pub fn toggle_all(&mut self) {
        let ids = self.document_ids();
        self.selection.toggle_all(&ids);
    }

    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.export_format = format;
    }

    pub async fn process(&mut self) -> &ActionState<Vec<BatchProcessOutcome>> {
        if self.process.is_in_flight() {
            return &self.process;
        }
        if let Err(e) = validate_selection(self.selection.items(), "document") {
            self.process.reject(e);
            return &self.process;
        }

        let process = self.process.start();
        match self.api.batch_process(self.selection.items()).await {
            Ok(outcomes) => {
                let failed = outcomes
                    .iter()
                    .filter(|o| o.status == BatchStatus::Error)
                    .count();
                if failed > 0 {
                    warn!("Batch processing finished with {} failures", failed);
                } else {
                    info!("Processed {} documents", outcomes.len());
                }
                process.finish(Ok::<_, ApiError>(outcomes));
            }
            Err(e) => {
                error!("Batch processing failed: {:?}", e);
                process.finish(Err::<Vec<BatchProcessOutcome>, _>(e));
            }
        }
        &self.process
    }

    pub async fn export(&mut self) -> &ActionState<serde_json::Value> {
        if self.export.is_in_flight() {
            return &self.export;
        }
        if let Err(e) = validate_selection(self.selection.items(), "document") {
            self.export.reject(e);
            return &self.export;
        }

        let export = self.export.start();
        let result = self
            .api
            .batch_export(self.selection.items(), self.export_format)
            .await;
        if let Err(e) = &result {
            error!("Batch export as {} failed: {:?}", self.export_format, e);
        }
        export.finish(result);
        &self.export
    }

    /// Deletes every selected document after a single confirmation.
    ///
    /// Deletes run one after another and stop at the first failure. The ones
    /// that went through are removed from the list either way.
    pub async fn delete(&mut self) -> &ActionState<usize> {
        if self.delete.is_in_flight() {
            return &self.delete;
        }
        if let Err(e) = validate_selection(self.selection.items(), "document") {
            self.delete.reject(e);
            return &self.delete;
        }
        let prompt = format!(
            "Are you sure you want to delete {} documents?",
            self.selection.len()
        );
        if !self.confirm.confirm(&prompt) {
            return &self.delete;
        }

        let delete = self.delete.start();
        let ids = self.selection.items().to_vec();
        let mut deleted = Vec::with_capacity(ids.len());
        let mut failure = None;
        for id in ids {
            match self.api.delete_document(id).await {
                Ok(()) => deleted.push(id),
                Err(e) => {
                    error!("Failed to delete document {}: {:?}", id, e);
                    failure = Some(e);
                    break;
                }
            }
        }

        self.documents.retain(|d| !deleted.contains(&d.id));
        match failure {
            None => {
                info!("Deleted {} documents", deleted.len());
                self.selection.clear();
                delete.finish(Ok::<_, ApiError>(deleted.len()));
            }
            Some(e) => {
                let ids: Vec<DocumentId> = self.documents.iter().map(|d| d.id).collect();
                self.selection.retain_available(&ids);
                delete.finish(Err::<usize, _>(e));
            }
        }
        &self.delete
    }

    fn document_ids(&self) -> Vec<DocumentId> {
        self.documents.iter().map(|d| d.id).collect()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn selection(&self) -> &Selection<DocumentId> {
        &self.selection
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    pub fn process_state(&self) -> &ActionState<Vec<BatchProcessOutcome>> {
        &self.process
    }

    pub fn export_state(&self) -> &ActionState<serde_json::Value> {
        &self.export
    }

    pub fn delete_state(&self) -> &ActionState<usize> {
        &self.delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::mock::{app_state, document, MockApi, ScriptedConfirm};
    use docvault_core::{ActionError, ValidationError};

    fn batch(api: &MockApi, confirm: bool) -> BatchProcessing {
        let docs = vec![document(1), document(2), document(3)];
        BatchProcessing::new(
            &app_state(api.clone(), Arc::new(ScriptedConfirm::new(confirm))),
            docs,
        )
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected_without_a_call() {
        let api = MockApi::default();
        let mut batch = batch(&api, true);

        let expected = Some(ActionError::Validation(ValidationError::EmptySelection("document")));
        assert_eq!(batch.process().await.error().cloned(), expected);
        assert_eq!(batch.export().await.error().cloned(), expected);
        assert_eq!(batch.delete().await.error().cloned(), expected);
        assert_eq!(
            expected.unwrap().to_string(),
            "Please select at least one document"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_process_sends_selection_in_order() {
        let api = MockApi::default();
        let mut batch = batch(&api, true);
        batch.toggle(3);
        batch.toggle(1);

        let outcomes = batch.process().await.value().cloned().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(api.calls(), vec!["batch_process [3, 1]"]);
    }

    #[tokio::test]
    async fn test_export_uses_configured_format() {
        let api = MockApi::default();
        let mut batch = batch(&api, true);
        assert_eq!(batch.export_format(), ExportFormat::Pdf);

        batch.toggle_all();
        batch.set_export_format(ExportFormat::Json);
        batch.export().await;
        assert_eq!(api.calls(), vec!["batch_export [1, 2, 3] json"]);
        assert_eq!(batch.export_state().value().unwrap()["exported"], 3);
    }

    #[tokio::test]
    async fn test_toggle_all_flips_between_all_and_none() {
        let api = MockApi::default();
        let mut batch = batch(&api, true);
        batch.toggle(2);
        batch.toggle_all();
        assert_eq!(batch.selection().len(), 3);
        batch.toggle_all();
        assert!(batch.selection().is_empty());
    }

    #[tokio::test]
    async fn test_declined_delete_does_nothing() {
        let api = MockApi::with_documents(vec![document(1), document(2), document(3)]);
        let mut batch = batch(&api, false);
        batch.toggle(1);

        assert!(batch.delete().await.is_idle());
        assert!(api.calls().is_empty());
        assert_eq!(batch.documents().len(), 3);
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_and_clears() {
        let api = MockApi::with_documents(vec![document(1), document(2), document(3)]);
        let mut batch = batch(&api, true);
        batch.toggle(1);
        batch.toggle(3);

        assert_eq!(batch.delete().await.value(), Some(&2));
        assert_eq!(api.calls(), vec!["delete_document 1", "delete_document 3"]);
        let remaining: Vec<DocumentId> = batch.documents().iter().map(|d| d.id).collect();
        assert_eq!(remaining, vec![2]);
        assert!(batch.selection().is_empty());
    }

    #[tokio::test]
    async fn test_delete_stops_at_first_failure() {
        let api = MockApi::with_documents(vec![document(1), document(2), document(3)]);
        api.fail_next(ApiError::new("Permission denied").with_code("403"));
        let mut batch = batch(&api, true);
        batch.toggle(1);
        batch.toggle(2);

        let state = batch.delete().await;
        assert_eq!(state.error().map(|e| e.to_string()).as_deref(), Some("Permission denied"));
        assert_eq!(api.calls(), vec!["delete_document 1"]);
        assert_eq!(batch.documents().len(), 3);
        assert_eq!(batch.selection().items(), &[1, 2]);
    }

    #[tokio::test]
    async fn test_set_documents_prunes_selection() {
        let api = MockApi::default();
        let mut batch = batch(&api, true);
        batch.toggle(1);
        batch.toggle(2);
        batch.set_documents(vec![document(2)]);
        assert_eq!(batch.selection().items(), &[2]);
    }
}
