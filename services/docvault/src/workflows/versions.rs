//! services/docvault/src/workflows/versions.rs
//!
//! The version history of one document: listing its lineage, picking two
//! versions and comparing their extracted text.

use docvault_core::action::ActionState;
use docvault_core::compare::{diff, SelectionState, VersionSelection};
use docvault_core::domain::{DiffResult, Document, DocumentId};
use docvault_core::lineage::version_chain;
use docvault_core::ports::{ApiError, DocumentApi};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::state::AppState;

/// Two versions side by side, in the order they were selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub version1: Document,
    pub version2: Document,
    pub diff: DiffResult,
}

impl Comparison {
    pub fn between(version1: Document, version2: Document) -> Self {
        let diff = diff(&version1.processed_text, &version2.processed_text);
        Self {
            version1,
            version2,
            diff,
        }
    }
}

pub struct VersionHistory {
    api: Arc<dyn DocumentApi>,
    document_id: DocumentId,
    versions: Vec<Document>,
    selection: VersionSelection,
    load: ActionState<usize>,
    compare: ActionState<Comparison>,
    download: ActionState<String>,
}

impl VersionHistory {
    pub fn new(app_state: &AppState, document_id: DocumentId) -> Self {
        Self {
            api: app_state.api.clone(),
            document_id,
            versions: Vec::new(),
            selection: VersionSelection::new(app_state.config.clear_selection_after_compare),
            load: ActionState::default(),
            compare: ActionState::default(),
            download: ActionState::default(),
        }
    }

    /// Builds the history from documents already on hand instead of asking
    /// the backend.
    pub fn from_documents(app_state: &AppState, documents: &[Document], id: DocumentId) -> Self {
        let mut history = Self::new(app_state, id);
        history.versions = version_chain(documents, id).into_iter().cloned().collect();
        history
    }

    pub async fn load(&mut self) -> &ActionState<usize> {
        if self.load.is_in_flight() {
            return &self.load;
        }
        let load = self.load.start();
        match self.api.list_versions(self.document_id).await {
            Ok(versions) => {
                debug!(
                    "Document {} has {} versions",
                    self.document_id,
                    versions.len()
                );
                self.versions = versions;
                load.finish(Ok::<_, ApiError>(self.versions.len()));
            }
            Err(e) => {
                error!(
                    "Failed to load versions of document {}: {:?}",
                    self.document_id, e
                );
                load.finish(Err::<usize, _>(e));
            }
        }
        &self.load
    }

    pub fn toggle(&mut self, version_id: DocumentId) -> SelectionState {
        self.selection.toggle(version_id)
    }

    /// Fetches both selected versions and diffs their text. Does nothing
    /// unless exactly two versions are selected.
    pub async fn compare(&mut self) -> &ActionState<Comparison> {
        let Some((first, second)) = self.selection.pair() else {
            return &self.compare;
        };
        if self.compare.is_in_flight() {
            return &self.compare;
        }
        let compare = self.compare.start();

        let fetched = Self::fetch_pair(self.api.as_ref(), first, second).await;
        match fetched {
            Ok((version1, version2)) => {
                let comparison = Comparison::between(version1, version2);
                info!(
                    "Compared documents {} and {}: {} added, {} removed, {} modified",
                    first,
                    second,
                    comparison.diff.added.len(),
                    comparison.diff.removed.len(),
                    comparison.diff.modified.len()
                );
                self.selection.complete_compare();
                compare.finish(Ok::<_, ApiError>(comparison));
            }
            Err(e) => {
                error!("Failed to compare {} and {}: {:?}", first, second, e);
                compare.finish(Err::<Comparison, _>(e));
            }
        }
        &self.compare
    }

    async fn fetch_pair(
        api: &dyn DocumentApi,
        first: DocumentId,
        second: DocumentId,
    ) -> Result<(Document, Document), ApiError> {
        let version1 = api.get_document(first).await?;
        let version2 = api.get_document(second).await?;
        Ok((version1, version2))
    }

    pub async fn download(&mut self, version_id: DocumentId) -> &ActionState<String> {
        if self.download.is_in_flight() {
            return &self.download;
        }
        let download = self.download.start();
        let result = self.api.download_url(version_id).await;
        download.finish(result);
        &self.download
    }

    /// Hides the last comparison.
    pub fn close_comparison(&mut self) {
        self.compare.reset();
    }

    pub fn versions(&self) -> &[Document] {
        &self.versions
    }

    pub fn selection(&self) -> &VersionSelection {
        &self.selection
    }

    pub fn compare_state(&self) -> &ActionState<Comparison> {
        &self.compare
    }
}
