//! In-memory doubles shared by the service tests.

use async_trait::async_trait;
use docqa_core::admin::{
    AdminDocument, AdminQuery, AdminStats, AdminUser, ToggleResult, UsageEntry,
};
use docqa_core::auth::{CredentialStore, Identity, Role};
use docqa_core::chat::HistoryEntry;
use docqa_core::document::{DocumentSummary, DocumentUpload, UploadReceipt};
use docqa_core::error::{ApiError, ApiResult, DocqaError, Result};
use docqa_core::gateway::{ApiGateway, AskRequest, Credentials, LoginResponse};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::oneshot;

pub fn user() -> Identity {
    Identity::new("u1", "alice@example.com", Role::User)
}

pub fn admin() -> Identity {
    Identity::new("a1", "root@example.com", Role::Admin)
}

pub fn doc(id: &str) -> DocumentSummary {
    DocumentSummary {
        document_id: id.to_string(),
        filename: format!("{}.pdf", id),
        status: "processed".to_string(),
        enabled: true,
        created_at: None,
    }
}

pub fn entry(question: &str, answer: &str) -> HistoryEntry {
    HistoryEntry {
        question: question.to_string(),
        answer: answer.to_string(),
        created_at: None,
    }
}

/// Two in-memory records, with an optional failure on identity writes.
#[derive(Default)]
pub struct MemoryCredentialStore {
    pub token: Mutex<Option<String>>,
    pub identity: Mutex<Option<String>>,
    pub fail_identity_write: AtomicBool,
}

impl MemoryCredentialStore {
    pub fn with_records(token: Option<&str>, identity: Option<&str>) -> Self {
        Self {
            token: Mutex::new(token.map(str::to_string)),
            identity: Mutex::new(identity.map(str::to_string)),
            fail_identity_write: AtomicBool::new(false),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token.lock().unwrap().is_none() && self.identity.lock().unwrap().is_none()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read_token(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn read_identity(&self) -> Result<Option<String>> {
        Ok(self.identity.lock().unwrap().clone())
    }

    fn write_token(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn write_identity(&self, identity_json: &str) -> Result<()> {
        if self.fail_identity_write.load(Ordering::SeqCst) {
            return Err(DocqaError::storage("disk full"));
        }
        *self.identity.lock().unwrap() = Some(identity_json.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }

    fn clear_identity(&self) -> Result<()> {
        *self.identity.lock().unwrap() = None;
        Ok(())
    }
}

/// A scripted reply: available immediately, or when the test releases it.
pub enum Reply<T> {
    Now(ApiResult<T>),
    Later(oneshot::Receiver<ApiResult<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> ApiResult<T> {
        match self {
            Reply::Now(result) => result,
            Reply::Later(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::transport("reply dropped"))),
        }
    }
}

/// Gateway whose replies are queued by the test, in call order.
#[derive(Default)]
pub struct MockGateway {
    pub logins: Mutex<VecDeque<ApiResult<LoginResponse>>>,
    pub asks: Mutex<VecDeque<Reply<String>>>,
    pub histories: Mutex<VecDeque<Reply<Vec<HistoryEntry>>>>,
    pub lists: Mutex<VecDeque<Reply<Vec<DocumentSummary>>>>,
    pub asked: Mutex<Vec<AskRequest>>,
    pub uploads: Mutex<Vec<DocumentUpload>>,
    pub toggled: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, result: ApiResult<String>) {
        self.asks.lock().unwrap().push_back(Reply::Now(result));
    }

    /// Queues an answer that arrives when the returned sender fires.
    pub fn answer_later(&self) -> oneshot::Sender<ApiResult<String>> {
        let (tx, rx) = oneshot::channel();
        self.asks.lock().unwrap().push_back(Reply::Later(rx));
        tx
    }

    pub fn history_now(&self, result: ApiResult<Vec<HistoryEntry>>) {
        self.histories.lock().unwrap().push_back(Reply::Now(result));
    }

    pub fn history_later(&self) -> oneshot::Sender<ApiResult<Vec<HistoryEntry>>> {
        let (tx, rx) = oneshot::channel();
        self.histories.lock().unwrap().push_back(Reply::Later(rx));
        tx
    }

    pub fn list_now(&self, result: ApiResult<Vec<DocumentSummary>>) {
        self.lists.lock().unwrap().push_back(Reply::Now(result));
    }

    pub fn list_later(&self) -> oneshot::Sender<ApiResult<Vec<DocumentSummary>>> {
        let (tx, rx) = oneshot::channel();
        self.lists.lock().unwrap().push_back(Reply::Later(rx));
        tx
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl ApiGateway for MockGateway {
    async fn login(&self, _credentials: &Credentials) -> ApiResult<LoginResponse> {
        self.record("login");
        self.logins
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::http(401, "Invalid credentials")))
    }

    async fn register(&self, _credentials: &Credentials) -> ApiResult<()> {
        self.record("register");
        Ok(())
    }

    async fn list_documents(&self) -> ApiResult<Vec<DocumentSummary>> {
        self.record("list_documents");
        let reply = self.lists.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn upload_document(&self, upload: DocumentUpload) -> ApiResult<UploadReceipt> {
        self.record("upload_document");
        let filename = upload.filename.clone();
        self.uploads.lock().unwrap().push(upload);
        Ok(UploadReceipt {
            filename,
            document_id: Some("new-doc".to_string()),
            total_chunks: Some(3),
            status: Some("processed".to_string()),
        })
    }

    async fn ask(&self, request: &AskRequest) -> ApiResult<String> {
        self.record("ask");
        self.asked.lock().unwrap().push(request.clone());
        let reply = self.asks.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(ApiError::transport("no scripted answer")),
        }
    }

    async fn history(&self, _document_id: &str) -> ApiResult<Vec<HistoryEntry>> {
        self.record("history");
        let reply = self.histories.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn admin_stats(&self) -> ApiResult<AdminStats> {
        self.record("admin_stats");
        Ok(AdminStats {
            total_users: 2,
            ..Default::default()
        })
    }

    async fn admin_users(&self) -> ApiResult<Vec<AdminUser>> {
        self.record("admin_users");
        Ok(Vec::new())
    }

    async fn admin_user_documents(&self, _user_id: &str) -> ApiResult<Vec<AdminDocument>> {
        self.record("admin_user_documents");
        Ok(Vec::new())
    }

    async fn admin_user_queries(&self, _user_id: &str) -> ApiResult<Vec<AdminQuery>> {
        self.record("admin_user_queries");
        Ok(Vec::new())
    }

    async fn admin_documents(&self) -> ApiResult<Vec<AdminDocument>> {
        self.record("admin_documents");
        Ok(Vec::new())
    }

    async fn admin_queries(&self) -> ApiResult<Vec<AdminQuery>> {
        self.record("admin_queries");
        Ok(Vec::new())
    }

    async fn admin_usage(&self) -> ApiResult<Vec<UsageEntry>> {
        self.record("admin_usage");
        Ok(Vec::new())
    }

    async fn toggle_document(&self, document_id: &str) -> ApiResult<ToggleResult> {
        self.record("toggle_document");
        self.toggled.lock().unwrap().push(document_id.to_string());
        Ok(ToggleResult {
            document_id: document_id.to_string(),
            enabled: false,
        })
    }
}
