//! Backend gateway abstraction.
//!
//! Defines the interface for every call the client makes to the document-QA
//! backend. The HTTP implementation lives in the infrastructure crate; tests
//! substitute scripted implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::admin::{AdminDocument, AdminQuery, AdminStats, AdminUser, ToggleResult, UsageEntry};
use crate::auth::Identity;
use crate::chat::HistoryEntry;
use crate::document::{DocumentSummary, DocumentUpload, UploadReceipt};
use crate::error::ApiResult;

/// Login or registration payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

/// Body of the ask endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub document_id: String,
    pub question: String,
}

/// Gateway to the document-QA backend.
///
/// Every method returns the uniform [`ApiError`](crate::error::ApiError) on
/// failure. Implementations attach the current credential at call time.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Exchanges credentials for a token and identity.
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;

    /// Creates an account. The caller logs in separately.
    async fn register(&self, credentials: &Credentials) -> ApiResult<()>;

    /// Lists the documents owned by the current user.
    ///
    /// # Returns
    ///
    /// - `Ok(documents)`: The complete list, in backend order
    /// - `Err(_)`: The list could not be fetched
    async fn list_documents(&self) -> ApiResult<Vec<DocumentSummary>>;

    /// Uploads one file for ingestion.
    async fn upload_document(&self, upload: DocumentUpload) -> ApiResult<UploadReceipt>;

    /// Asks a question about a document.
    ///
    /// # Returns
    ///
    /// - `Ok(answer)`: The generated answer text
    /// - `Err(_)`: The backend could not answer
    async fn ask(&self, request: &AskRequest) -> ApiResult<String>;

    /// Fetches the conversation history of a document, oldest first.
    async fn history(&self, document_id: &str) -> ApiResult<Vec<HistoryEntry>>;

    async fn admin_stats(&self) -> ApiResult<AdminStats>;

    async fn admin_users(&self) -> ApiResult<Vec<AdminUser>>;

    async fn admin_user_documents(&self, user_id: &str) -> ApiResult<Vec<AdminDocument>>;

    async fn admin_user_queries(&self, user_id: &str) -> ApiResult<Vec<AdminQuery>>;

    async fn admin_documents(&self) -> ApiResult<Vec<AdminDocument>>;

    async fn admin_queries(&self) -> ApiResult<Vec<AdminQuery>>;

    async fn admin_usage(&self) -> ApiResult<Vec<UsageEntry>>;

    /// Flips the enabled flag of a document.
    async fn toggle_document(&self, document_id: &str) -> ApiResult<ToggleResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_request_wire_names() {
        let body = serde_json::to_value(AskRequest {
            document_id: "d1".to_string(),
            question: "Why?".to_string(),
        })
        .unwrap();
        assert_eq!(body["documentId"], "d1");
        assert_eq!(body["question"], "Why?");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("a@b.io", "hunter22");
        assert!(!format!("{:?}", creds).contains("hunter22"));
    }

    #[test]
    fn test_login_response_decodes_user_alias() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token":"jwt","user":{"userId":"u1","email":"a@b.io","role":"admin"}}"#,
        )
        .unwrap();
        assert_eq!(response.user.id, "u1");
        assert!(response.user.is_admin());
    }
}
