//! crates/docvault_core/src/stats.rs
//!
//! Corpus-wide statistics over a collection of documents. Everything here is
//! recomputed from scratch on every call.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::Document;

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const RECENT_UPLOADS_LIMIT: usize = 5;

/// Aggregate figures for a document collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub total_documents: usize,
    pub total_size: u64,
    pub average_size: f64,
    pub processed_count: usize,
    pub unprocessed_count: usize,
    pub category_distribution: BTreeMap<String, usize>,
    pub file_type_distribution: BTreeMap<String, usize>,
    /// The latest uploads, newest first.
    pub recent_uploads: Vec<Document>,
}

impl Stats {
    /// Percentage of processed documents, 0 for an empty collection.
    pub fn processed_percentage(&self) -> f64 {
        self.share_of(self.processed_count)
    }

    /// `count` as a percentage of all documents, 0 for an empty collection.
    pub fn share_of(&self, count: usize) -> f64 {
        if self.total_documents == 0 {
            return 0.0;
        }
        count as f64 / self.total_documents as f64 * 100.0
    }
}

impl Stats {
    /// The figures as they are shown to a reader: sizes in human units and
    /// each category as a share of all documents.
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_documents: self.total_documents,
            total_size: format_file_size(self.total_size),
            average_size: format_file_size(self.average_size.round() as u64),
            processed_percentage: self.processed_percentage(),
            category_shares: self
                .category_distribution
                .iter()
                .map(|(name, count)| (name.clone(), self.share_of(*count)))
                .collect(),
            file_type_distribution: self.file_type_distribution.clone(),
            recent_uploads: self.recent_uploads.iter().map(|d| d.title.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_documents: usize,
    pub total_size: String,
    pub average_size: String,
    pub processed_percentage: f64,
    pub category_shares: BTreeMap<String, f64>,
    pub file_type_distribution: BTreeMap<String, usize>,
    pub recent_uploads: Vec<String>,
}

pub fn compute_stats(documents: &[Document]) -> Stats {
    let mut stats = Stats {
        total_documents: documents.len(),
        ..Default::default()
    };

    for doc in documents {
        stats.total_size += doc.file_size;

        if doc.is_processed {
            stats.processed_count += 1;
        } else {
            stats.unprocessed_count += 1;
        }

        let category = doc.category_label().unwrap_or(UNCATEGORIZED);
        *stats
            .category_distribution
            .entry(category.to_string())
            .or_insert(0) += 1;

        *stats
            .file_type_distribution
            .entry(doc.file_type.clone())
            .or_insert(0) += 1;
    }

    stats.average_size = if stats.total_documents > 0 {
        stats.total_size as f64 / stats.total_documents as f64
    } else {
        0.0
    };

    // `sort_by` is stable, so equal timestamps keep their collection order.
    let mut by_recency: Vec<&Document> = documents.iter().collect();
    by_recency.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    stats.recent_uploads = by_recency
        .into_iter()
        .take(RECENT_UPLOADS_LIMIT)
        .cloned()
        .collect();

    stats
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable file size in 1024 steps, e.g. `1.5 KB` or `0 Bytes`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
