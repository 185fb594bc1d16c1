//! crates/docvault_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The remote document API and the user's confirmation prompt are both
//! reached through these ports, so the core never depends on a transport or
//! a UI toolkit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{
    BatchProcessOutcome, CategoryDraft, CategoryId, Document, DocumentCategory, DocumentId,
    DocumentPatch, DocumentQuery, ExportFormat, NewDocument, StatusMessage, UserId,
};

//=========================================================================================
// Normalized API Error
//=========================================================================================

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// The uniform shape every failed remote call is reduced to.
///
/// `code` carries the HTTP status when a response was received and is absent
/// for network failures. `details` holds per-field messages when the backend
/// provides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{}{}", .message, status_suffix(.code))]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Builds the error for a failed response from its status and raw body.
    ///
    /// `message` and `details` are taken from the JSON body when present and
    /// well-formed; anything else falls back to the default message.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<serde_json::Value>(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();

        let details = parsed
            .as_ref()
            .and_then(|v| v.get("details"))
            .and_then(|d| serde_json::from_value::<HashMap<String, Vec<String>>>(d.clone()).ok());

        Self {
            message,
            code: Some(status.to_string()),
            details,
        }
    }

    /// The error for a request that never produced a response.
    pub fn network() -> Self {
        Self::new(DEFAULT_ERROR_MESSAGE)
    }
}

fn status_suffix(code: &Option<String>) -> String {
    code.as_ref()
        .map(|code| format!(" (status {})", code))
        .unwrap_or_default()
}

/// A convenience type alias for `Result<T, ApiError>`.
pub type PortResult<T> = Result<T, ApiError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote document backend. One method per resource operation; every
/// call is a single round trip with no retry or caching.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    // --- Documents ---
    async fn list_documents(&self, query: DocumentQuery) -> PortResult<Vec<Document>>;

    async fn get_document(&self, id: DocumentId) -> PortResult<Document>;

    async fn create_document(&self, upload: NewDocument) -> PortResult<Document>;

    async fn update_document(&self, id: DocumentId, patch: &DocumentPatch) -> PortResult<Document>;

    async fn delete_document(&self, id: DocumentId) -> PortResult<()>;

    /// The document's lineage, oldest version first.
    async fn list_versions(&self, id: DocumentId) -> PortResult<Vec<Document>>;

    async fn download_url(&self, id: DocumentId) -> PortResult<String>;

    // --- Sharing ---
    async fn share_document(&self, id: DocumentId, user_ids: &[UserId]) -> PortResult<StatusMessage>;

    async fn unshare_document(&self, id: DocumentId, user_ids: &[UserId])
        -> PortResult<StatusMessage>;

    // --- Search and Batch ---
    async fn search_documents(&self, q: &str, query: DocumentQuery) -> PortResult<Vec<Document>>;

    async fn batch_process(&self, ids: &[DocumentId]) -> PortResult<Vec<BatchProcessOutcome>>;

    /// Exports the documents; the payload shape depends on the format.
    async fn batch_export(
        &self,
        ids: &[DocumentId],
        format: ExportFormat,
    ) -> PortResult<serde_json::Value>;

    // --- Categories ---
    async fn list_categories(&self) -> PortResult<Vec<DocumentCategory>>;

    async fn create_category(&self, draft: &CategoryDraft) -> PortResult<DocumentCategory>;

    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> PortResult<DocumentCategory>;

    async fn delete_category(&self, id: CategoryId) -> PortResult<()>;
}

/// Asks the user to confirm a destructive action before it is issued.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}
