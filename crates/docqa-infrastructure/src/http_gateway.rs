//! reqwest-backed implementation of [`ApiGateway`].

use async_trait::async_trait;
use docqa_core::admin::{
    AdminDocument, AdminQuery, AdminStats, AdminUser, ToggleResult, UsageEntry,
};
use docqa_core::auth::AuthContext;
use docqa_core::chat::HistoryEntry;
use docqa_core::document::{DocumentSummary, DocumentUpload, UploadReceipt};
use docqa_core::error::{ApiError, ApiResult};
use docqa_core::gateway::{ApiGateway, AskRequest, Credentials, LoginResponse};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::dto::{
    AnswerEnvelope, DocumentsEnvelope, ErrorBody, MessagesEnvelope, QueriesEnvelope,
    StatsEnvelope, UsageEnvelope, UsersEnvelope,
};

/// Talks to the backend over HTTP.
///
/// The bearer token is read from the [`AuthContext`] on every request. When
/// a request that carried a token comes back `401`, the context is told to
/// expire the session before the error is returned.
#[derive(Clone)]
pub struct HttpApiGateway {
    client: Client,
    base_url: String,
    auth: Arc<dyn AuthContext>,
}

impl HttpApiGateway {
    pub fn new(base_url: impl Into<String>, auth: Arc<dyn AuthContext>) -> Self {
        Self::with_client(Client::new(), base_url, auth)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        auth: Arc<dyn AuthContext>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the credential, sends, and normalizes failures.
    async fn send(&self, request: RequestBuilder, operation: &str) -> ApiResult<Response> {
        let token = self.auth.bearer_token();
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        tracing::debug!("[Gateway] {} (authenticated: {})", operation, token.is_some());

        let response = request.send().await.map_err(|e| {
            tracing::warn!("[Gateway] {} failed: {}", operation, e);
            ApiError::transport(format!("Network error: {}", e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = error_from_body(status, &body);
        tracing::debug!("[Gateway] {} -> {}: {}", operation, status, error.message);

        if status == StatusCode::UNAUTHORIZED && token.is_some() {
            // Only the credential that was rejected may be purged.
            if self.auth.bearer_token() == token {
                tracing::warn!("[Gateway] Credential rejected during {}, expiring session", operation);
                self.auth.expire();
            } else {
                tracing::debug!("[Gateway] {} rejected a replaced credential", operation);
            }
        }

        Err(error)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> ApiResult<T> {
        let response = self.send(request, operation).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::warn!("[Gateway] {} returned an unreadable body: {}", operation, e);
            ApiError::transport(format!("Invalid response from server: {}", e))
        })
    }
}

/// Builds the uniform error from a non-success response.
///
/// Prefers the body's `error` field, then `message`, then the canonical
/// reason phrase.
pub fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });
    ApiError::http(status.as_u16(), message)
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let request = self.client.post(self.url("/auth/login")).json(credentials);
        self.fetch(request, "login").await
    }

    async fn register(&self, credentials: &Credentials) -> ApiResult<()> {
        let request = self.client.post(self.url("/auth/register")).json(credentials);
        self.send(request, "register").await.map(|_| ())
    }

    async fn list_documents(&self) -> ApiResult<Vec<DocumentSummary>> {
        let request = self.client.get(self.url("/documents/list"));
        let envelope: DocumentsEnvelope<DocumentSummary> =
            self.fetch(request, "list_documents").await?;
        Ok(envelope.documents)
    }

    async fn upload_document(&self, upload: DocumentUpload) -> ApiResult<UploadReceipt> {
        let part = Part::bytes(upload.bytes).file_name(upload.filename);
        let form = Form::new().part("file", part);
        let request = self.client.post(self.url("/documents/upload")).multipart(form);
        self.fetch(request, "upload_document").await
    }

    async fn ask(&self, request: &AskRequest) -> ApiResult<String> {
        let builder = self.client.post(self.url("/chat/ask")).json(request);
        let envelope: AnswerEnvelope = self.fetch(builder, "ask").await?;
        Ok(envelope.answer)
    }

    async fn history(&self, document_id: &str) -> ApiResult<Vec<HistoryEntry>> {
        let request = self
            .client
            .get(self.url("/chat/history"))
            .query(&[("documentId", document_id)]);
        let envelope: MessagesEnvelope<HistoryEntry> = self.fetch(request, "history").await?;
        Ok(envelope.messages)
    }

    async fn admin_stats(&self) -> ApiResult<AdminStats> {
        let request = self.client.get(self.url("/admin/stats"));
        let envelope: StatsEnvelope<AdminStats> = self.fetch(request, "admin_stats").await?;
        Ok(envelope.stats)
    }

    async fn admin_users(&self) -> ApiResult<Vec<AdminUser>> {
        let request = self.client.get(self.url("/admin/users"));
        let envelope: UsersEnvelope<AdminUser> = self.fetch(request, "admin_users").await?;
        Ok(envelope.users)
    }

    async fn admin_user_documents(&self, user_id: &str) -> ApiResult<Vec<AdminDocument>> {
        let path = format!("/admin/users/{}/documents", user_id);
        let request = self.client.get(self.url(&path));
        let envelope: DocumentsEnvelope<AdminDocument> =
            self.fetch(request, "admin_user_documents").await?;
        Ok(envelope.documents)
    }

    async fn admin_user_queries(&self, user_id: &str) -> ApiResult<Vec<AdminQuery>> {
        let path = format!("/admin/users/{}/queries", user_id);
        let request = self.client.get(self.url(&path));
        let envelope: QueriesEnvelope<AdminQuery> =
            self.fetch(request, "admin_user_queries").await?;
        Ok(envelope.queries)
    }

    async fn admin_documents(&self) -> ApiResult<Vec<AdminDocument>> {
        let request = self.client.get(self.url("/admin/documents"));
        let envelope: DocumentsEnvelope<AdminDocument> =
            self.fetch(request, "admin_documents").await?;
        Ok(envelope.documents)
    }

    async fn admin_queries(&self) -> ApiResult<Vec<AdminQuery>> {
        let request = self.client.get(self.url("/admin/queries"));
        let envelope: QueriesEnvelope<AdminQuery> = self.fetch(request, "admin_queries").await?;
        Ok(envelope.queries)
    }

    async fn admin_usage(&self) -> ApiResult<Vec<UsageEntry>> {
        let request = self.client.get(self.url("/admin/usage"));
        let envelope: UsageEnvelope<UsageEntry> = self.fetch(request, "admin_usage").await?;
        Ok(envelope.usage)
    }

    async fn toggle_document(&self, document_id: &str) -> ApiResult<ToggleResult> {
        let path = format!("/admin/documents/{}/toggle", document_id);
        let request = self.client.patch(self.url(&path));
        self.fetch(request, "toggle_document").await
    }
}
