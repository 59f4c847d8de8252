//! Document domain models.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static UUID_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}_")
        .expect("UUID prefix pattern is valid")
});

/// Extensions the backend accepts for ingestion.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// Immutable snapshot of a document as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    #[serde(alias = "id", alias = "_id")]
    pub document_id: String,
    pub filename: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_status() -> String {
    "processed".to_string()
}

fn default_enabled() -> bool {
    true
}

impl DocumentSummary {
    /// Filename without the storage prefix (`<uuid>_report.pdf` → `report.pdf`).
    pub fn display_name(&self) -> &str {
        if self.filename.is_empty() {
            return "Untitled";
        }
        match UUID_PREFIX.find(&self.filename) {
            Some(m) if m.end() < self.filename.len() => &self.filename[m.end()..],
            _ => &self.filename,
        }
    }

    /// Whether the backend has finished ingesting the document.
    pub fn is_ready(&self) -> bool {
        self.enabled && self.status == "processed"
    }
}

/// A file to send to the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Upload endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub filename: String,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub total_chunks: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}
