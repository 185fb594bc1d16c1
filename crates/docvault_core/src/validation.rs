//! crates/docvault_core/src/validation.rs
//!
//! Checks that run before any request is issued. A failure here never
//! reaches the network.

use crate::domain::{CategoryDraft, NewDocument};

/// Largest upload the backend accepts: 10MB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Category name is required")]
    MissingCategoryName,
    #[error("Please select at least one {0}")]
    EmptySelection(&'static str),
    #[error("Only PDF files are accepted")]
    UnsupportedFileType,
    #[error("File size must be under 10MB")]
    FileTooLarge,
    #[error("The selected file is empty")]
    EmptyFile,
}

pub fn validate_category(draft: &CategoryDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::MissingCategoryName);
    }
    Ok(())
}

/// `noun` names what is being selected, e.g. `"document"` or `"user"`.
pub fn validate_selection<T>(selected: &[T], noun: &'static str) -> Result<(), ValidationError> {
    if selected.is_empty() {
        return Err(ValidationError::EmptySelection(noun));
    }
    Ok(())
}

pub fn validate_upload(upload: &NewDocument) -> Result<(), ValidationError> {
    if !upload.file_name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(ValidationError::UnsupportedFileType);
    }
    if upload.content.is_empty() {
        return Err(ValidationError::EmptyFile);
    }
    if upload.content.len() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge);
    }
    Ok(())
}
