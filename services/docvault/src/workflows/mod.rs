pub mod batch;
pub mod categories;
pub mod library;
pub mod sharing;
pub mod state;
pub mod upload;
pub mod versions;

#[cfg(test)]
pub(crate) mod mock;

pub use batch::BatchProcessing;
pub use categories::CategoryManager;
pub use library::DocumentLibrary;
pub use sharing::ShareDialog;
pub use state::AppState;
pub use upload::DocumentUpload;
pub use versions::{Comparison, VersionHistory};
