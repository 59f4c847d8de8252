//! Document domain module.

mod model;

pub use model::{ALLOWED_EXTENSIONS, DocumentSummary, DocumentUpload, UploadReceipt};
