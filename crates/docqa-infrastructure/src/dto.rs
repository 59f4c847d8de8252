//! Wire envelopes of the backend responses.
//!
//! The backend wraps every payload in a named field and may add unrelated
//! ones (`success`, `count`); only the payload field is read.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub documents: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub messages: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueriesEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub queries: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub users: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsageEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub usage: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope<T> {
    pub stats: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerEnvelope {
    pub answer: String,
}

/// Error body: `{"error": ...}` or `{"message": ...}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}
