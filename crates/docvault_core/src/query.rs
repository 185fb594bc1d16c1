//! crates/docvault_core/src/query.rs
//!
//! Client-side narrowing and ordering of an already fetched document list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::{CategoryId, Document, DocumentQuery};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Newest,
    Oldest,
    Name,
    Size,
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOption::Newest),
            "oldest" => Ok(SortOption::Oldest),
            "name" => Ok(SortOption::Name),
            "size" => Ok(SortOption::Size),
            other => Err(format!("'{}' is not one of newest, oldest, name, size", other)),
        }
    }
}

/// Inclusive calendar-date bounds on `uploaded_at`. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub category: Option<CategoryId>,
    pub date_range: Option<DateRange>,
    pub file_type: Option<String>,
    pub processed: Option<bool>,
}

/// A change to some of the filters. Each field is `None` to keep the current
/// value, `Some(None)` to reset it to "All" and `Some(Some(v))` to set it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub category: Option<Option<CategoryId>>,
    pub date_range: Option<Option<DateRange>>,
    pub file_type: Option<Option<String>>,
    pub processed: Option<Option<bool>>,
}

impl SearchFilters {
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(date_range) = update.date_range {
            self.date_range = date_range;
        }
        if let Some(file_type) = update.file_type {
            self.file_type = file_type;
        }
        if let Some(processed) = update.processed {
            self.processed = processed;
        }
    }

    /// The part of these filters the backend can apply itself.
    pub fn server_query(&self) -> DocumentQuery {
        DocumentQuery {
            category: self.category,
            is_processed: self.processed,
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(category) = self.category {
            if doc.category != Some(category) {
                return false;
            }
        }
        if let Some(processed) = self.processed {
            if doc.is_processed != processed {
                return false;
            }
        }
        if let Some(file_type) = &self.file_type {
            if !doc.file_type.eq_ignore_ascii_case(file_type) {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            if !range.contains(doc.uploaded_at.date_naive()) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, documents: &'a [Document]) -> Vec<&'a Document> {
        documents.iter().filter(|doc| self.matches(doc)).collect()
    }
}

/// Sorts in place. Ties keep their previous relative order.
pub fn sort_documents(documents: &mut [&Document], sort: SortOption) {
    match sort {
        SortOption::Newest => documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at)),
        SortOption::Oldest => documents.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at)),
        SortOption::Name => {
            documents.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        SortOption::Size => documents.sort_by(|a, b| b.file_size.cmp(&a.file_size)),
    }
}
