//! Chat domain module.
//!
//! # Module Structure
//!
//! - `message`: `Message`, `MessageState`, `MessageId`, `HistoryEntry`
//! - `conversation`: `ConversationState` bound to one document

mod conversation;
mod message;

pub use conversation::{ConversationEpoch, ConversationState, HistoryStatus};
pub use message::{
    FAILED_ANSWER, HistoryEntry, Message, MessageId, MessageState, PENDING_ANSWER,
};
