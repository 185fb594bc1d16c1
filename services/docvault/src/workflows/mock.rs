//! In-memory `DocumentApi` for workflow tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use docvault_core::domain::{
    BatchProcessOutcome, BatchStatus, CategoryDraft, CategoryId, Document, DocumentCategory,
    DocumentId, DocumentPatch, DocumentQuery, ExportFormat, NewDocument, StatusMessage, UserId,
};
use docvault_core::ports::{ApiError, Confirm, DocumentApi, PortResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::state::AppState;
use crate::config::Config;

/// A stored pdf owned by alice. Unlike the core fixture it starts out
/// unprocessed, so batch processing and the processed filter have
/// something to work on.
pub fn document(id: DocumentId) -> Document {
    Document {
        id,
        title: format!("doc-{}", id),
        file: format!("documents/doc-{}.pdf", id),
        file_url: None,
        uploaded_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        processed_text: String::new(),
        is_processed: false,
        file_size: 1024,
        file_type: "pdf".to_string(),
        user: "alice".to_string(),
        category: None,
        category_name: None,
        version: 1,
        parent_version: None,
        is_shared: false,
        shared_with: Vec::new(),
        version_history: Vec::new(),
    }
}

pub fn category(id: CategoryId, name: &str) -> DocumentCategory {
    DocumentCategory {
        id,
        name: name.to_string(),
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[derive(Default)]
struct Store {
    documents: Vec<Document>,
    categories: Vec<DocumentCategory>,
    calls: Vec<String>,
    fail_with: Option<ApiError>,
    delay: Option<Duration>,
}

/// Records every call and serves from an in-memory store. `fail_next` makes
/// the next call return the given error.
#[derive(Clone, Default)]
pub struct MockApi {
    store: Arc<Mutex<Store>>,
}

impl MockApi {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let api = Self::default();
        api.store.lock().unwrap().documents = documents;
        api
    }

    pub fn with_categories(categories: Vec<DocumentCategory>) -> Self {
        let api = Self::default();
        api.store.lock().unwrap().categories = categories;
        api
    }

    pub fn fail_next(&self, err: ApiError) {
        self.store.lock().unwrap().fail_with = Some(err);
    }

    /// Makes `get_document` wait this long before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.store.lock().unwrap().delay = delay;
    }

    pub fn calls(&self) -> Vec<String> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn documents(&self) -> Vec<Document> {
        self.store.lock().unwrap().documents.clone()
    }

    fn record(&self, call: String) -> PortResult<()> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(call);
        match store.fail_with.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn find(&self, id: DocumentId) -> PortResult<Document> {
        self.store
            .lock()
            .unwrap()
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| ApiError::new("Not found.").with_code("404"))
    }
}

#[async_trait]
impl DocumentApi for MockApi {
    async fn list_documents(&self, query: DocumentQuery) -> PortResult<Vec<Document>> {
        self.record(format!("list_documents {:?}", query))?;
        Ok(self
            .documents()
            .into_iter()
            .filter(|d| query.category.map_or(true, |c| d.category == Some(c)))
            .filter(|d| query.is_processed.map_or(true, |p| d.is_processed == p))
            .collect())
    }

    async fn get_document(&self, id: DocumentId) -> PortResult<Document> {
        self.record(format!("get_document {}", id))?;
        let delay = self.store.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.find(id)
    }

    async fn create_document(&self, upload: NewDocument) -> PortResult<Document> {
        self.record(format!("create_document {}", upload.file_name))?;
        let mut store = self.store.lock().unwrap();
        let mut doc = document(store.documents.len() as DocumentId + 100);
        doc.title = upload.effective_title();
        doc.file_size = upload.content.len() as u64;
        doc.category = upload.category;
        store.documents.push(doc.clone());
        Ok(doc)
    }

    async fn update_document(&self, id: DocumentId, patch: &DocumentPatch) -> PortResult<Document> {
        self.record(format!("update_document {}", id))?;
        let mut doc = self.find(id)?;
        if let Some(title) = &patch.title {
            doc.title = title.clone();
        }
        Ok(doc)
    }

    async fn delete_document(&self, id: DocumentId) -> PortResult<()> {
        self.record(format!("delete_document {}", id))?;
        self.store.lock().unwrap().documents.retain(|d| d.id != id);
        Ok(())
    }

    async fn list_versions(&self, id: DocumentId) -> PortResult<Vec<Document>> {
        self.record(format!("list_versions {}", id))?;
        let documents = self.documents();
        Ok(docvault_core::lineage::version_chain(&documents, id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn download_url(&self, id: DocumentId) -> PortResult<String> {
        self.record(format!("download_url {}", id))?;
        Ok(format!("http://files/{}.pdf", id))
    }

    async fn share_document(&self, id: DocumentId, user_ids: &[UserId]) -> PortResult<StatusMessage> {
        self.record(format!("share_document {} {:?}", id, user_ids))?;
        Ok(StatusMessage {
            status: "Document shared successfully".to_string(),
        })
    }

    async fn unshare_document(
        &self,
        id: DocumentId,
        user_ids: &[UserId],
    ) -> PortResult<StatusMessage> {
        self.record(format!("unshare_document {} {:?}", id, user_ids))?;
        Ok(StatusMessage {
            status: "Sharing removed successfully".to_string(),
        })
    }

    async fn search_documents(&self, q: &str, query: DocumentQuery) -> PortResult<Vec<Document>> {
        self.record(format!("search_documents {} {:?}", q, query))?;
        let needle = q.to_lowercase();
        Ok(self
            .documents()
            .into_iter()
            .filter(|d| {
                d.title.to_lowercase().contains(&needle)
                    || d.processed_text.to_lowercase().contains(&needle)
            })
            .collect())
    }

    async fn batch_process(&self, ids: &[DocumentId]) -> PortResult<Vec<BatchProcessOutcome>> {
        self.record(format!("batch_process {:?}", ids))?;
        Ok(ids
            .iter()
            .map(|id| BatchProcessOutcome {
                id: *id,
                status: BatchStatus::Success,
                message: None,
            })
            .collect())
    }

    async fn batch_export(
        &self,
        ids: &[DocumentId],
        format: ExportFormat,
    ) -> PortResult<serde_json::Value> {
        self.record(format!("batch_export {:?} {}", ids, format))?;
        Ok(serde_json::json!({ "exported": ids.len(), "format": format }))
    }

    async fn list_categories(&self) -> PortResult<Vec<DocumentCategory>> {
        self.record("list_categories".to_string())?;
        Ok(self.store.lock().unwrap().categories.clone())
    }

    async fn create_category(&self, draft: &CategoryDraft) -> PortResult<DocumentCategory> {
        self.record(format!("create_category {}", draft.name))?;
        let mut store = self.store.lock().unwrap();
        let created = category(store.categories.len() as CategoryId + 1, &draft.name);
        store.categories.push(created.clone());
        Ok(created)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> PortResult<DocumentCategory> {
        self.record(format!("update_category {} {}", id, draft.name))?;
        Ok(category(id, &draft.name))
    }

    async fn delete_category(&self, id: CategoryId) -> PortResult<()> {
        self.record(format!("delete_category {}", id))?;
        self.store.lock().unwrap().categories.retain(|c| c.id != id);
        Ok(())
    }
}

/// Answers with a fixed decision and counts how often it was asked.
#[derive(Default)]
pub struct ScriptedConfirm {
    pub answer: bool,
    pub asked: AtomicUsize,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

pub fn app_state(api: MockApi, confirm: Arc<ScriptedConfirm>) -> AppState {
    AppState::new(Arc::new(api), confirm, Arc::new(Config::default()))
}
