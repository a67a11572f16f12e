//! Ordered record of prior conversation turns.

use crate::types::ModelMessage;

/// Chat history for one interactive session.
///
/// Turns are appended in order and never reordered.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    messages: Vec<ModelMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed (query, response) turn.
    pub fn record_turn(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.messages.push(ModelMessage::user(query));
        self.messages.push(ModelMessage::assistant(response));
    }

    /// Messages in turn order.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of recorded turns.
    pub fn turns(&self) -> usize {
        self.messages.len() / 2
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
