pub mod action;
pub mod compare;
pub mod domain;
pub mod lineage;
pub mod ports;
pub mod query;
pub mod selection;
pub mod stats;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use action::{ActionError, ActionState, InFlightGuard};
pub use compare::{diff, select_for_comparison, SelectionState, VersionSelection};
pub use domain::{
    BatchProcessOutcome, BatchStatus, CategoryDraft, CategoryId, DiffResult, Document,
    DocumentCategory, DocumentId, DocumentPatch, DocumentQuery, ExportFormat, ModifiedLine,
    NewDocument, StatusMessage, UserId, VersionSummary,
};
pub use ports::{ApiError, Confirm, DocumentApi, PortResult};
pub use query::{FilterUpdate, SearchFilters, SortOption};
pub use stats::{compute_stats, format_file_size, Stats, StatsSummary};
pub use validation::ValidationError;
