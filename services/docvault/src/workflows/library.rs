//! services/docvault/src/workflows/library.rs
//!
//! The document list: fetching, searching, filtering, sorting, statistics and
//! the per-document actions (delete, download).

use docvault_core::action::ActionState;
use docvault_core::domain::{Document, DocumentId};
use docvault_core::lineage;
use docvault_core::ports::{ApiError, Confirm, DocumentApi};
use docvault_core::query::{sort_documents, FilterUpdate, SearchFilters, SortOption};
use docvault_core::stats::{compute_stats, Stats};
use std::sync::Arc;
use tracing::{error, info};

use super::state::AppState;

pub struct DocumentLibrary {
    api: Arc<dyn DocumentApi>,
    confirm: Arc<dyn Confirm>,
    documents: Vec<Document>,
    search_text: String,
    filters: SearchFilters,
    sort: SortOption,
    load: ActionState<usize>,
    delete: ActionState<DocumentId>,
    download: ActionState<String>,
}

impl DocumentLibrary {
    pub fn new(app_state: &AppState) -> Self {
        Self {
            api: app_state.api.clone(),
            confirm: app_state.confirm.clone(),
            documents: Vec::new(),
            search_text: String::new(),
            filters: SearchFilters::default(),
            sort: SortOption::default(),
            load: ActionState::default(),
            delete: ActionState::default(),
            download: ActionState::default(),
        }
    }

    /// Re-fetches the list. With search text set this goes through the search
    /// endpoint, otherwise through the plain listing. Either way the
    /// server-side part of the filters is sent along.
    pub async fn refresh(&mut self) -> &ActionState<usize> {
        if self.load.is_in_flight() {
            return &self.load;
        }
        let load = self.load.start();

        let query = self.filters.server_query();
        let result = if self.search_text.is_empty() {
            self.api.list_documents(query).await
        } else {
            self.api.search_documents(&self.search_text, query).await
        };

        match result {
            Ok(documents) => {
                info!("Loaded {} documents", documents.len());
                self.documents = documents;
                load.finish(Ok::<_, ApiError>(self.documents.len()));
            }
            Err(e) => {
                error!("Failed to load documents: {:?}", e);
                load.finish(Err::<usize, _>(e));
            }
        }
        &self.load
    }

    pub async fn search(&mut self, text: &str) -> &ActionState<usize> {
        self.search_text = text.trim().to_string();
        self.refresh().await
    }

    /// Applies `update` to the active filters and re-fetches.
    pub async fn set_filters(&mut self, update: FilterUpdate) -> &ActionState<usize> {
        self.filters.merge(update);
        self.refresh().await
    }

    /// Resets every filter to "All" and re-fetches.
    pub async fn clear_filters(&mut self) -> &ActionState<usize> {
        self.filters = SearchFilters::default();
        self.refresh().await
    }

    /// Sorting happens locally; no request is made.
    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
    }

    /// The documents to display: the fetched list narrowed by the full set of
    /// filters and ordered by the current sort option.
    pub fn visible(&self) -> Vec<&Document> {
        let mut view = self.filters.apply(&self.documents);
        sort_documents(&mut view, self.sort);
        view
    }

    /// Only the newest revision of each lineage in the fetched list.
    pub fn latest_versions(&self) -> Vec<&Document> {
        lineage::latest_versions(&self.documents)
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.documents)
    }

    /// Adds a freshly uploaded document, or replaces the cached copy.
    pub fn upsert(&mut self, document: Document) {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => self.documents.insert(0, document),
        }
    }

    /// Deletes one document after the user confirms.
    pub async fn delete(&mut self, id: DocumentId) -> &ActionState<DocumentId> {
        if self.delete.is_in_flight() {
            return &self.delete;
        }
        if !self
            .confirm
            .confirm("Are you sure you want to delete this document?")
        {
            return &self.delete;
        }

        let delete = self.delete.start();
        match self.api.delete_document(id).await {
            Ok(()) => {
                info!("Deleted document {}", id);
                self.documents.retain(|d| d.id != id);
                delete.finish(Ok::<_, ApiError>(id));
            }
            Err(e) => {
                error!("Failed to delete document {}: {:?}", id, e);
                delete.finish(Err::<DocumentId, _>(e));
            }
        }
        &self.delete
    }

    pub async fn download(&mut self, id: DocumentId) -> &ActionState<String> {
        if self.download.is_in_flight() {
            return &self.download;
        }
        let download = self.download.start();
        download.finish(self.api.download_url(id).await);
        &self.download
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn load_state(&self) -> &ActionState<usize> {
        &self.load
    }

    pub fn delete_state(&self) -> &ActionState<DocumentId> {
        &self.delete
    }

    pub fn dismiss_errors(&mut self) {
        self.load.dismiss();
        self.delete.dismiss();
        self.download.dismiss();
    }
}
