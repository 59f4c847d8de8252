//! Conversation message types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Answer shown while a question is in flight.
pub const PENDING_ANSWER: &str = "Thinking...";

/// Answer shown when the backend failed to produce one.
pub const FAILED_ANSWER: &str = "Error generating answer. Please try again.";

/// Client-side correlation id, assigned when a message is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageState {
    Pending,
    Resolved,
    Failed,
}

/// One question/answer exchange.
///
/// A `Pending` message is replaced exactly once, by [`Message::resolve`] or
/// [`Message::fail`]; settled messages are never changed again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub question: String,
    pub answer: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    pub state: MessageState,
}

impl Message {
    /// Optimistic placeholder for a question that was just sent.
    pub fn pending(question: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            question: question.into(),
            answer: PENDING_ANSWER.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            state: MessageState::Pending,
        }
    }

    /// Settled copy carrying the backend answer. Keeps the correlation id.
    pub fn resolve(&self, answer: impl Into<String>) -> Self {
        Self {
            id: self.id,
            question: self.question.clone(),
            answer: answer.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            state: MessageState::Resolved,
        }
    }

    /// Settled copy carrying the fixed error marker. Keeps the correlation id.
    pub fn fail(&self) -> Self {
        Self {
            id: self.id,
            question: self.question.clone(),
            answer: FAILED_ANSWER.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            state: MessageState::Failed,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == MessageState::Pending
    }
}

/// A message as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<HistoryEntry> for Message {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: MessageId::new(),
            question: entry.question,
            answer: entry.answer,
            created_at: entry
                .created_at
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            state: MessageState::Resolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_message_uses_placeholder() {
        let msg = Message::pending("What is the refund policy?");
        assert!(msg.is_pending());
        assert_eq!(msg.answer, PENDING_ANSWER);
        assert!(chrono::DateTime::parse_from_rfc3339(&msg.created_at).is_ok());
    }

    #[test]
    fn test_resolve_and_fail_keep_correlation_id() {
        let pending = Message::pending("Q");

        let resolved = pending.resolve("A");
        assert_eq!(resolved.id, pending.id);
        assert_eq!(resolved.question, "Q");
        assert_eq!(resolved.answer, "A");
        assert_eq!(resolved.state, MessageState::Resolved);

        let failed = pending.fail();
        assert_eq!(failed.id, pending.id);
        assert_eq!(failed.answer, FAILED_ANSWER);
        assert_eq!(failed.state, MessageState::Failed);
    }

    #[test]
    fn test_history_entry_becomes_resolved_message() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"question":"Q","answer":"A","createdAt":"2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        let msg = Message::from(entry);
        assert_eq!(msg.state, MessageState::Resolved);
        assert_eq!(msg.created_at, "2025-01-02T03:04:05Z");
    }

    #[test]
    fn test_message_ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }
}
