pub mod confirm;
pub mod http;

pub use confirm::{AutoConfirm, StdinConfirm};
pub use http::HttpDocumentApi;
