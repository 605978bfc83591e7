mod dedup;
mod log;
mod registry;
mod window;

pub use dedup::dedup_by_content;
pub use log::ChatLog;
pub use registry::MemoryRegistry;
pub use window::{render_context, ContextWindowBuilder, ContextWindowConfig};

use serde::{Deserialize, Serialize};

/// Speaker of a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversational turn. Entries are immutable once stored: the log
/// only ever appends, never rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub role: Role,
    pub content: String,
}

impl Entry {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Memory-layer error type
#[derive(Debug)]
pub enum MemoryError {
    /// Attempted append of empty or whitespace-only content
    InvalidEntry(String),
    /// Empty or blank chat identifier
    InvalidChatId(String),
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntry(msg) => write!(f, "Invalid entry: {}", msg),
            Self::InvalidChatId(id) => write!(f, "Invalid chat id: {:?}", id),
        }
    }
}

impl std::error::Error for MemoryError {}

pub type Result<T> = std::result::Result<T, MemoryError>;
