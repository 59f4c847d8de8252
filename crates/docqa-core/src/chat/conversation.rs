//! Per-document conversation state.

use serde::{Deserialize, Serialize};

use super::message::{HistoryEntry, Message, MessageId};

/// Identity of one conversation instance.
///
/// Every selection of a document produces a new epoch, including a
/// reselection of the same document. Responses are matched against the
/// epoch they were requested under, never against whatever is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConversationEpoch(pub u64);

/// Load status of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryStatus {
    Loading,
    Ready,
    /// Inline, retryable by selecting the document again.
    Failed { message: String },
}

/// The message list bound to exactly one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub document_id: String,
    pub epoch: ConversationEpoch,
    pub messages: Vec<Message>,
    pub history: HistoryStatus,
}

impl ConversationState {
    /// Fresh, empty state awaiting its history.
    pub fn new(document_id: impl Into<String>, epoch: ConversationEpoch) -> Self {
        Self {
            document_id: document_id.into(),
            epoch,
            messages: Vec::new(),
            history: HistoryStatus::Loading,
        }
    }

    /// Replaces the list with the server history, keeping server order.
    ///
    /// Messages sent while the history was loading are kept after it.
    pub fn apply_history(&mut self, entries: Vec<HistoryEntry>) {
        let sent_meanwhile = std::mem::take(&mut self.messages);
        self.messages = entries.into_iter().map(Message::from).collect();
        self.messages.extend(sent_meanwhile);
        self.history = HistoryStatus::Ready;
    }

    pub fn fail_history(&mut self, message: impl Into<String>) {
        self.history = HistoryStatus::Failed {
            message: message.into(),
        };
    }

    /// Appends an optimistic placeholder and returns its correlation id.
    pub fn push_pending(&mut self, question: impl Into<String>) -> MessageId {
        let message = Message::pending(question);
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Replaces the pending message with id `id` by `settled`.
    ///
    /// Returns `false` when no pending message carries that id (it was
    /// already settled, or belongs to another conversation).
    pub fn settle(&mut self, id: MessageId, settled: Message) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.is_pending())
        {
            Some(slot) => {
                *slot = settled;
                true
            }
            None => false,
        }
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_pending()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::MessageState;

    fn entry(q: &str, a: &str) -> HistoryEntry {
        HistoryEntry {
            question: q.to_string(),
            answer: a.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_apply_history_keeps_server_order() {
        let mut state = ConversationState::new("doc", ConversationEpoch(1));
        state.apply_history(vec![entry("first", "1"), entry("second", "2")]);

        assert_eq!(state.history, HistoryStatus::Ready);
        let questions: Vec<_> = state.messages.iter().map(|m| m.question.as_str()).collect();
        assert_eq!(questions, vec!["first", "second"]);
        assert!(state.messages.iter().all(|m| m.state == MessageState::Resolved));
    }

    #[test]
    fn test_apply_history_keeps_messages_sent_while_loading() {
        let mut state = ConversationState::new("doc", ConversationEpoch(1));
        let id = state.push_pending("early");
        state.apply_history(vec![entry("old", "answer")]);

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].id, id);
    }

    #[test]
    fn test_settle_targets_exact_message() {
        let mut state = ConversationState::new("doc", ConversationEpoch(1));
        let first = state.push_pending("Q1");
        let second = state.push_pending("Q2");

        let settled = state.message(first).unwrap().resolve("A1");
        assert!(state.settle(first, settled));

        assert_eq!(state.messages[0].answer, "A1");
        assert!(state.messages[1].is_pending());
        assert_eq!(state.messages[1].id, second);
    }

    #[test]
    fn test_settle_happens_once() {
        let mut state = ConversationState::new("doc", ConversationEpoch(1));
        let id = state.push_pending("Q");
        let resolved = state.message(id).unwrap().resolve("A");
        let failed = state.message(id).unwrap().fail();

        assert!(state.settle(id, resolved));
        assert!(!state.settle(id, failed));
        assert_eq!(state.messages[0].answer, "A");
    }

    #[test]
    fn test_fail_history_is_inline() {
        let mut state = ConversationState::new("doc", ConversationEpoch(3));
        state.fail_history("Failed to load chat history");
        assert!(matches!(state.history, HistoryStatus::Failed { .. }));
        assert!(state.messages.is_empty());
    }
}
