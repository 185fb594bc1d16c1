//! Shared test fixtures.

use chrono::{TimeZone, Utc};

use crate::domain::{Document, DocumentId};

/// A processed, uncategorized one-kilobyte PDF uploaded at the start of 2024.
pub fn document(id: DocumentId) -> Document {
    Document {
        id,
        title: format!("doc-{}", id),
        file: format!("documents/doc-{}.pdf", id),
        file_url: None,
        uploaded_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        processed_text: String::new(),
        is_processed: true,
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
