//! Cached view of the user's documents.

use docqa_core::document::{DocumentSummary, DocumentUpload, UploadReceipt};
use docqa_core::error::{DocqaError, Result};
use docqa_core::gateway::ApiGateway;
use docqa_core::validation::validate_upload_path;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::lock;

#[derive(Default)]
struct RegistryState {
    documents: Vec<DocumentSummary>,
    /// Sequence number handed to the most recent refresh.
    issued: u64,
    /// Sequence number of the refresh whose result is cached.
    applied: u64,
}

/// The document list, replaced wholesale on every refresh.
pub struct DocumentRegistry {
    gateway: Arc<dyn ApiGateway>,
    state: Mutex<RegistryState>,
}

impl DocumentRegistry {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Fetches the full list and replaces the cache.
    ///
    /// A response that arrives after a newer refresh was already applied is
    /// dropped. On failure the cache is left as it was.
    ///
    /// # Returns
    ///
    /// The cached list after this refresh settled.
    pub async fn refresh(&self) -> Result<Vec<DocumentSummary>> {
        let sequence = {
            let mut state = lock(&self.state);
            state.issued += 1;
            state.issued
        };

        let documents = self.gateway.list_documents().await?;

        let mut state = lock(&self.state);
        if sequence > state.applied {
            tracing::debug!("[Registry] Cached {} documents", documents.len());
            state.documents = documents;
            state.applied = sequence;
        } else {
            tracing::debug!("[Registry] Dropped out-of-date document list #{}", sequence);
        }
        Ok(state.documents.clone())
    }

    pub async fn after_upload(&self) -> Result<Vec<DocumentSummary>> {
        self.refresh().await
    }

    pub async fn after_toggle(&self) -> Result<Vec<DocumentSummary>> {
        self.refresh().await
    }

    /// Uploads a local file, then refreshes the list.
    ///
    /// The extension is checked before the file is read. A failed refresh
    /// after a successful upload is logged and does not fail the upload.
    pub async fn upload(&self, path: &Path) -> Result<UploadReceipt> {
        validate_upload_path(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| DocqaError::validation("file", "path has no file name"))?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DocqaError::validation("file", format!("cannot read {}: {}", path.display(), e))
        })?;

        tracing::info!("[Registry] Uploading {} ({} bytes)", filename, bytes.len());
        let receipt = self
            .gateway
            .upload_document(DocumentUpload { filename, bytes })
            .await?;

        if let Err(e) = self.after_upload().await {
            tracing::warn!("[Registry] Refresh after upload failed: {}", e);
        }
        Ok(receipt)
    }

    pub fn documents(&self) -> Vec<DocumentSummary> {
        lock(&self.state).documents.clone()
    }

    pub fn find(&self, document_id: &str) -> Option<DocumentSummary> {
        lock(&self.state)
            .documents
            .iter()
            .find(|d| d.document_id == document_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockGateway, doc};
    use docqa_core::error::ApiError;

    fn ids(docs: &[DocumentSummary]) -> Vec<&str> {
        docs.iter().map(|d| d.document_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let gateway = Arc::new(MockGateway::new());
        gateway.list_now(Ok(vec![doc("a"), doc("b")]));
        gateway.list_now(Ok(vec![doc("c")]));
        let registry = DocumentRegistry::new(gateway);

        registry.refresh().await.unwrap();
        assert_eq!(ids(&registry.documents()), vec!["a", "b"]);

        registry.refresh().await.unwrap();
        assert_eq!(ids(&registry.documents()), vec!["c"]);
        assert!(registry.find("a").is_none());
        assert!(registry.find("c").is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cache() {
        let gateway = Arc::new(MockGateway::new());
        gateway.list_now(Ok(vec![doc("a")]));
        gateway.list_now(Err(ApiError::http(500, "Failed to list documents")));
        let registry = DocumentRegistry::new(gateway);

        registry.refresh().await.unwrap();
        assert!(registry.refresh().await.is_err());
        assert_eq!(ids(&registry.documents()), vec!["a"]);
    }

    #[tokio::test]
    async fn test_late_response_from_older_refresh_is_dropped() {
        let gateway = Arc::new(MockGateway::new());
        let older = gateway.list_later();
        gateway.list_now(Ok(vec![doc("new")]));
        let registry = Arc::new(DocumentRegistry::new(gateway));

        let slow = tokio::spawn({
            let registry = registry.clone();
            async move { registry.refresh().await }
        });
        while lock(&registry.state).issued == 0 {
            tokio::task::yield_now().await;
        }

        registry.refresh().await.unwrap();
        older.send(Ok(vec![doc("stale")])).unwrap();
        let seen = slow.await.unwrap().unwrap();

        assert_eq!(ids(&seen), vec!["new"]);
        assert_eq!(ids(&registry.documents()), vec!["new"]);
    }

    #[tokio::test]
    async fn test_upload_rejects_extension_without_network() {
        let gateway = Arc::new(MockGateway::new());
        let registry = DocumentRegistry::new(gateway.clone());

        let err = registry.upload(Path::new("slides.pptx")).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(gateway.call_count("upload_document"), 0);
    }

    #[tokio::test]
    async fn test_upload_then_refresh() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let gateway = Arc::new(MockGateway::new());
        gateway.list_now(Ok(vec![doc("new-doc")]));
        let registry = DocumentRegistry::new(gateway.clone());

        let receipt = registry.upload(&path).await.unwrap();
        assert_eq!(receipt.filename, "notes.txt");
        assert_eq!(gateway.uploads.lock().unwrap()[0].bytes, b"hello");
        assert_eq!(gateway.call_count("list_documents"), 1);
        assert!(registry.find("new-doc").is_some());
    }
}
