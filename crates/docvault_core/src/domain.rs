//! crates/docvault_core/src/domain.rs
//!
//! Defines the core data structures shared by every part of the application.
//! These mirror the records exchanged with the document backend, plus the
//! derived values (diffs) that only ever live on the client.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub type DocumentId = i64;
pub type CategoryId = i64;
pub type UserId = i64;

//=========================================================================================
// Documents and Categories
//=========================================================================================

/// A single managed file plus its metadata and version lineage.
///
/// The client never owns a `Document`; every value is a possibly-stale copy of
/// what the backend last returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub processed_text: String,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default)]
    pub parent_version: Option<DocumentId>,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub shared_with: Vec<UserId>,
    #[serde(default)]
    pub version_history: Vec<VersionSummary>,
}

impl Document {
    /// The name of the category this document belongs to, if it has one.
    pub fn category_label(&self) -> Option<&str> {
        self.category_name.as_deref().filter(|name| !name.is_empty())
    }
}

fn first_version() -> u32 {
    1
}

/// One entry of a document's version history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub version: u32,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Accepts RFC 3339 timestamps as well as naive ISO 8601 ones, which are taken
/// to be UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("'{}' is not an ISO 8601 timestamp", raw))
    })
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::from_str(raw) {
        return Some(naive.and_utc());
    }
    NaiveDate::from_str(raw)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

//=========================================================================================
// Request Payloads
//=========================================================================================

/// A file to upload as a new document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub file_name: String,
    pub content: Bytes,
    pub title: Option<String>,
    pub category: Option<CategoryId>,
}

impl NewDocument {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            title: None,
            category: None,
        }
    }

    /// The title sent to the backend: the explicit one, or the file name
    /// without its extension.
    pub fn effective_title(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.trim().to_string(),
            _ => self
                .file_name
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .filter(|stem| !stem.is_empty())
                .unwrap_or(&self.file_name)
                .to_string(),
        }
    }
}

/// A partial update to a document. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<Vec<UserId>>,
}

/// The editable fields of a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Server-side filters accepted by the list and search endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_processed: Option<bool>,
}

//=========================================================================================
// Batch Operations
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Txt,
    #[default]
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Txt => "txt",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "txt" => Ok(ExportFormat::Txt),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("'{}' is not one of pdf, txt, json", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
    Error,
}

/// The backend's verdict for one document of a batch-process request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProcessOutcome {
    pub id: DocumentId,
    pub status: BatchStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Acknowledgement returned by the share and unshare endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
}

//=========================================================================================
// Version Comparison
//=========================================================================================

/// A line present in both versions whose text changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifiedLine {
    pub before: String,
    pub after: String,
}

/// The line-level differences between two versions of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<ModifiedLine>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}
