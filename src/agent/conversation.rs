//! Private conversation state owned by a single agent.

use crate::types::{ModelMessage, Role};

/// One entry in an agent's private history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Position in the history; assigned at push time.
    pub ordinal: usize,
}

/// Ordered, append-only message history.
///
/// Ordinals are strictly increasing and gapless; the only way to remove
/// entries is [`clear`], which resets the sequence to empty.
///
/// [`clear`]: Conversation::clear
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, assigning the next ordinal.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        let ordinal = self.turns.len();
        self.turns.push(ConversationTurn {
            role,
            content: content.into(),
            ordinal,
        });
    }

    /// History as gateway messages, oldest first.
    pub fn as_messages(&self) -> Vec<ModelMessage> {
        self.turns
            .iter()
            .map(|t| ModelMessage {
                role: t.role,
                content: t.content.clone(),
            })
            .collect()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
