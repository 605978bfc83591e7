use super::{ChatLog, MemoryError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Owns one [`ChatLog`] per chat identifier, created lazily on first
/// access.
///
/// Each log sits behind its own `Mutex`, so events for the same chat
/// serialize on that lock while different chats proceed in parallel.
/// The registry's key set only ever grows; `clear` empties a log but
/// keeps it addressable.
pub struct MemoryRegistry {
    logs: Arc<RwLock<HashMap<String, Arc<Mutex<ChatLog>>>>>,
    capacity: Option<usize>,
}

impl MemoryRegistry {
    /// Registry of unbounded logs.
    pub fn new() -> Self {
        Self {
            logs: Arc::new(RwLock::new(HashMap::new())),
            capacity: None,
        }
    }

    /// Registry of bounded-retention logs, each keeping at most
    /// `capacity` raw entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            logs: Arc::new(RwLock::new(HashMap::new())),
            capacity: Some(capacity),
        }
    }

    /// Normalize a raw chat identifier into a registry key.
    ///
    /// Gateways hand out ids like `12345@g.us`; the same chat must
    /// always map to the same key, so `@` and `.` collapse to `_` and
    /// surrounding whitespace is dropped. Blank ids fail fast.
    pub fn normalize_chat_id(raw: &str) -> Result<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MemoryError::InvalidChatId(raw.to_string()));
        }
        Ok(trimmed.replace(['@', '.'], "_"))
    }

    /// Return the log for `chat_id`, creating an empty one on first
    /// reference. Repeated calls with the same id return handles to the
    /// same log.
    pub async fn get_or_create(&self, chat_id: &str) -> Result<Arc<Mutex<ChatLog>>> {
        let key = Self::normalize_chat_id(chat_id)?;

        {
            let logs = self.logs.read().await;
            if let Some(log) = logs.get(&key) {
                return Ok(log.clone());
            }
        }

        let mut logs = self.logs.write().await;
        let log = logs.entry(key).or_insert_with(|| {
            let log = match self.capacity {
                Some(capacity) => ChatLog::bounded(capacity),
                None => ChatLog::new(),
            };
            Arc::new(Mutex::new(log))
        });
        Ok(log.clone())
    }

    /// All chat identifiers with a created log, not necessarily a
    /// non-empty one.
    pub async fn list_active(&self) -> Vec<String> {
        let logs = self.logs.read().await;
        logs.keys().cloned().collect()
    }

    /// Empty the log for `chat_id`. A no-op for chats that never had
    /// one; the key set never shrinks.
    pub async fn clear(&self, chat_id: &str) -> Result<()> {
        let key = Self::normalize_chat_id(chat_id)?;
        let logs = self.logs.read().await;
        if let Some(log) = logs.get(&key) {
            log.lock().await.clear();
        }
        Ok(())
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryRegistry {
    fn clone(&self) -> Self {
        Self {
            logs: self.logs.clone(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Role;

    #[tokio::test]
    async fn get_or_create_returns_shared_log() {
        let registry = MemoryRegistry::new();

        let first = registry.get_or_create("chat1").await.unwrap();
        first.lock().await.append(Role::User, "hello").unwrap();

        // Appends through one handle are visible through the other.
        let second = registry.get_or_create("chat1").await.unwrap();
        assert_eq!(second.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn normalization_maps_same_chat_to_same_key() {
        let registry = MemoryRegistry::new();

        let a = registry.get_or_create("user@s.whatsapp.net").await.unwrap();
        a.lock().await.append(Role::User, "hi").unwrap();

        let b = registry
            .get_or_create("  user@s.whatsapp.net  ")
            .await
            .unwrap();
        assert_eq!(b.lock().await.len(), 1);

        assert_eq!(registry.list_active().await.len(), 1);
    }

    #[tokio::test]
    async fn blank_chat_id_fails_fast() {
        let registry = MemoryRegistry::new();
        assert!(matches!(
            registry.get_or_create("   ").await,
            Err(MemoryError::InvalidChatId(_))
        ));
        assert!(matches!(
            registry.get_or_create("").await,
            Err(MemoryError::InvalidChatId(_))
        ));
    }

    #[tokio::test]
    async fn clear_is_idempotent_and_keeps_key() {
        let registry = MemoryRegistry::new();

        // Clearing a chat that has no log is not an error.
        registry.clear("nobody").await.unwrap();

        let log = registry.get_or_create("chat1").await.unwrap();
        log.lock().await.append(Role::User, "hello").unwrap();

        registry.clear("chat1").await.unwrap();
        assert!(log.lock().await.is_empty());
        assert_eq!(registry.list_active().await, vec!["chat1".to_string()]);

        registry.clear("chat1").await.unwrap();
    }

    #[tokio::test]
    async fn capacity_applies_to_created_logs() {
        let registry = MemoryRegistry::with_capacity(2);
        let log = registry.get_or_create("chat1").await.unwrap();

        let mut log = log.lock().await;
        for content in ["a", "b", "c"] {
            log.append(Role::User, content).unwrap();
        }
        let contents: Vec<&str> =
            log.all_entries().iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "c"]);
    }
}
