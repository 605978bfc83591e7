use super::{dedup_by_content, Entry, MemoryError, Result, Role};

/// Append-only, ordered log of conversational turns for one chat.
///
/// The unbounded variant keeps everything. The bounded variant keeps
/// only the most recent `capacity` raw entries, evicting the oldest
/// first; evicted entries are unrecoverable. Eviction operates on raw
/// storage, while deduplication is a read-time concern of
/// [`ChatLog::recent_entries`] — the two layers are independent.
pub struct ChatLog {
    entries: Vec<Entry>,
    capacity: Option<usize>,
}

impl ChatLog {
    /// Create an unbounded log.
    pub fn new() -> Self {
        Self { entries: Vec::new(), capacity: None }
    }

    /// Create a bounded-retention log holding at most `capacity` entries.
    pub fn bounded(capacity: usize) -> Self {
        Self { entries: Vec::new(), capacity: Some(capacity) }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append one turn. Blank content is rejected with `InvalidEntry`;
    /// callers treat that as "nothing to remember".
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> Result<()> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(MemoryError::InvalidEntry(
                "content is empty or whitespace-only".to_string(),
            ));
        }

        self.entries.push(Entry { role, content });
        self.evict();
        Ok(())
    }

    fn evict(&mut self) {
        if let Some(capacity) = self.capacity {
            if self.entries.len() > capacity {
                let overflow = self.entries.len() - capacity;
                self.entries.drain(0..overflow);
            }
        }
    }

    /// Full retained history, oldest first.
    pub fn all_entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The most recent entries, oldest-to-newest, at most `limit` of them.
    ///
    /// On a bounded log the retained entries are first deduplicated by
    /// content (most recent occurrence wins) before the limit applies.
    pub fn recent_entries(&self, limit: usize) -> Vec<Entry> {
        if self.capacity.is_some() {
            let newest_first: Vec<Entry> = self.entries.iter().rev().cloned().collect();
            let mut deduped = dedup_by_content(&newest_first);
            deduped.truncate(limit);
            deduped.reverse();
            deduped
        } else {
            let start = self.entries.len().saturating_sub(limit);
            self.entries[start..].to_vec()
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}
