//! Per-document question/answer orchestration.
//!
//! Exactly one [`ConversationState`] is active at a time. Each `select`
//! installs a new state under a fresh epoch, and every network result is
//! applied only if the epoch it was requested under is still the active one.
//! Within a conversation, answers are matched to their placeholder by the
//! message's correlation id, so concurrent sends cannot overwrite each other.

use docqa_core::chat::{ConversationEpoch, ConversationState, HistoryEntry, Message, MessageId};
use docqa_core::error::{ApiError, ApiResult, DocqaError, Result};
use docqa_core::gateway::{ApiGateway, AskRequest};
use docqa_core::validation::normalize_question;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};

use crate::lock;

/// How a send settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Resolved(Message),
    Failed { message: Message, error: ApiError },
    /// The conversation was replaced or closed before the answer arrived.
    Discarded,
}

/// How a history load settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOutcome {
    Applied { count: usize },
    Failed(ApiError),
    Discarded,
}

/// The network half of [`ConversationController::send`].
pub type PendingAnswer = BoxFuture<'static, SendOutcome>;

/// The network half of [`ConversationController::select`].
pub type HistoryLoad = BoxFuture<'static, HistoryOutcome>;

#[derive(Default)]
struct Inner {
    active: Option<ConversationState>,
    last_epoch: u64,
}

pub struct ConversationController {
    gateway: Arc<dyn ApiGateway>,
    inner: Arc<Mutex<Inner>>,
}

impl ConversationController {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Switches to `document_id`.
    ///
    /// The previous conversation is discarded and an empty one installed
    /// before this returns; the returned future fetches the history. Any
    /// result still in flight for the previous conversation, including a
    /// previous selection of the same document, will be discarded.
    pub fn select(&self, document_id: &str) -> HistoryLoad {
        let epoch = {
            let mut inner = lock(&self.inner);
            inner.last_epoch += 1;
            let epoch = ConversationEpoch(inner.last_epoch);
            inner.active = Some(ConversationState::new(document_id, epoch));
            epoch
        };
        tracing::debug!("[Conversation] Selected {} (epoch {})", document_id, epoch.0);

        let gateway = self.gateway.clone();
        let inner = self.inner.clone();
        let document_id = document_id.to_string();
        Box::pin(async move {
            let result = gateway.history(&document_id).await;
            apply_history(&inner, epoch, result)
        })
    }

    /// Selects the active document again; the retry path after a failed
    /// history load.
    pub fn reload(&self) -> Result<HistoryLoad> {
        let document_id = self
            .active_document()
            .ok_or(DocqaError::NoActiveConversation)?;
        Ok(self.select(&document_id))
    }

    /// Sends a question about the active document.
    ///
    /// A `Pending` message is appended before this returns. The returned
    /// future performs the request and settles that message.
    ///
    /// # Errors
    ///
    /// - `NoActiveConversation` when no document is selected
    /// - `Validation` when the question is blank
    ///
    /// In both cases nothing is appended and no request is made.
    pub fn send(&self, question: &str) -> Result<PendingAnswer> {
        let question = normalize_question(question)?.to_string();

        let (epoch, id, document_id) = {
            let mut inner = lock(&self.inner);
            let state = inner
                .active
                .as_mut()
                .ok_or(DocqaError::NoActiveConversation)?;
            let id = state.push_pending(question.clone());
            (state.epoch, id, state.document_id.clone())
        };

        let gateway = self.gateway.clone();
        let inner = self.inner.clone();
        Ok(Box::pin(async move {
            let request = AskRequest {
                document_id,
                question,
            };
            let result = gateway.ask(&request).await;
            settle_answer(&inner, epoch, id, result)
        }))
    }

    /// Clone of the active conversation, for rendering.
    pub fn snapshot(&self) -> Option<ConversationState> {
        lock(&self.inner).active.clone()
    }

    pub fn active_document(&self) -> Option<String> {
        lock(&self.inner)
            .active
            .as_ref()
            .map(|s| s.document_id.clone())
    }

    /// Drops the active conversation. In-flight results are discarded.
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        if let Some(state) = inner.active.take() {
            tracing::debug!(
                "[Conversation] Closed {} (epoch {})",
                state.document_id,
                state.epoch.0
            );
        }
    }
}

fn active_for<'a>(
    inner: &'a mut Inner,
    epoch: ConversationEpoch,
) -> Option<&'a mut ConversationState> {
    inner.active.as_mut().filter(|state| state.epoch == epoch)
}

fn apply_history(
    inner: &Mutex<Inner>,
    epoch: ConversationEpoch,
    result: ApiResult<Vec<HistoryEntry>>,
) -> HistoryOutcome {
    let mut inner = lock(inner);
    let Some(state) = active_for(&mut inner, epoch) else {
        tracing::warn!("[Conversation] Discarded history for superseded epoch {}", epoch.0);
        return HistoryOutcome::Discarded;
    };

    match result {
        Ok(entries) => {
            let count = entries.len();
            state.apply_history(entries);
            HistoryOutcome::Applied { count }
        }
        Err(error) => {
            tracing::warn!(
                "[Conversation] History for {} failed: {}",
                state.document_id,
                error
            );
            state.fail_history(error.message.clone());
            HistoryOutcome::Failed(error)
        }
    }
}

fn settle_answer(
    inner: &Mutex<Inner>,
    epoch: ConversationEpoch,
    id: MessageId,
    result: ApiResult<String>,
) -> SendOutcome {
    let mut inner = lock(inner);
    let Some(state) = active_for(&mut inner, epoch) else {
        tracing::warn!("[Conversation] Discarded answer {} for superseded epoch {}", id, epoch.0);
        return SendOutcome::Discarded;
    };
    let Some(pending) = state.message(id).filter(|m| m.is_pending()).cloned() else {
        return SendOutcome::Discarded;
    };

    let (settled, outcome) = match result {
        Ok(answer) => {
            let message = pending.resolve(answer);
            (message.clone(), SendOutcome::Resolved(message))
        }
        Err(error) => {
            tracing::warn!("[Conversation] Answer {} failed: {}", id, error);
            let message = pending.fail();
            (message.clone(), SendOutcome::Failed { message, error })
        }
    };
    state.settle(id, settled);
    outcome
}
