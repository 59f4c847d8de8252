//! Read-through access to the admin endpoints.

use docqa_core::admin::{
    AdminDocument, AdminQuery, AdminStats, AdminUser, ToggleResult, UsageEntry,
};
use docqa_core::error::Result;
use docqa_core::gateway::ApiGateway;
use std::sync::Arc;

use crate::document_registry::DocumentRegistry;

pub struct AdminService {
    gateway: Arc<dyn ApiGateway>,
    registry: Arc<DocumentRegistry>,
}

impl AdminService {
    pub fn new(gateway: Arc<dyn ApiGateway>, registry: Arc<DocumentRegistry>) -> Self {
        Self { gateway, registry }
    }

    pub async fn stats(&self) -> Result<AdminStats> {
        Ok(self.gateway.admin_stats().await?)
    }

    pub async fn users(&self) -> Result<Vec<AdminUser>> {
        Ok(self.gateway.admin_users().await?)
    }

    pub async fn user_documents(&self, user_id: &str) -> Result<Vec<AdminDocument>> {
        Ok(self.gateway.admin_user_documents(user_id).await?)
    }

    pub async fn user_queries(&self, user_id: &str) -> Result<Vec<AdminQuery>> {
        Ok(self.gateway.admin_user_queries(user_id).await?)
    }

    pub async fn documents(&self) -> Result<Vec<AdminDocument>> {
        Ok(self.gateway.admin_documents().await?)
    }

    pub async fn queries(&self) -> Result<Vec<AdminQuery>> {
        Ok(self.gateway.admin_queries().await?)
    }

    pub async fn usage(&self) -> Result<Vec<UsageEntry>> {
        Ok(self.gateway.admin_usage().await?)
    }

    /// Flips a document's enabled flag, then refreshes the document list.
    pub async fn toggle_document(&self, document_id: &str) -> Result<ToggleResult> {
        let result = self.gateway.toggle_document(document_id).await?;
        tracing::info!(
            "[Admin] Document {} is now {}",
            result.document_id,
            if result.enabled { "enabled" } else { "disabled" }
        );
        if let Err(e) = self.registry.after_toggle().await {
            tracing::warn!("[Admin] Refresh after toggle failed: {}", e);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockGateway, doc};

    #[tokio::test]
    async fn test_toggle_refreshes_registry() {
        let gateway = Arc::new(MockGateway::new());
        gateway.list_now(Ok(vec![doc("d1")]));
        let registry = Arc::new(DocumentRegistry::new(gateway.clone()));
        let service = AdminService::new(gateway.clone(), registry.clone());

        let result = service.toggle_document("d1").await.unwrap();
        assert_eq!(result.document_id, "d1");
        assert!(!result.enabled);
        assert_eq!(gateway.toggled.lock().unwrap().as_slice(), ["d1".to_string()]);
        assert_eq!(gateway.call_count("list_documents"), 1);
        assert!(registry.find("d1").is_some());
    }

    #[tokio::test]
    async fn test_reads_pass_through() {
        let gateway = Arc::new(MockGateway::new());
        let registry = Arc::new(DocumentRegistry::new(gateway.clone()));
        let service = AdminService::new(gateway.clone(), registry);

        assert_eq!(service.stats().await.unwrap().total_users, 2);
        service.users().await.unwrap();
        service.user_documents("u1").await.unwrap();
        service.user_queries("u1").await.unwrap();
        service.documents().await.unwrap();
        service.queries().await.unwrap();
        service.usage().await.unwrap();
        assert_eq!(gateway.calls.lock().unwrap().len(), 7);
    }
}
