use super::{dedup_by_content, Entry};

/// Configuration for context window assembly
#[derive(Debug, Clone)]
pub struct ContextWindowConfig {
    /// Maximum number of characters allowed in the assembled window
    pub max_chars: usize,
    /// Entries whose trimmed content starts with any of these strings
    /// are dropped before budgeting (exact, case-sensitive match)
    pub excluded_prefixes: Vec<String>,
    /// Deduplicate by content before budgeting; the most recent
    /// occurrence of a repeated message wins
    pub dedup: bool,
}

impl Default for ContextWindowConfig {
    fn default() -> Self {
        Self {
            max_chars: 2_000,
            excluded_prefixes: Vec::new(),
            dedup: true,
        }
    }
}

impl ContextWindowConfig {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars, ..Self::default() }
    }

    pub fn excluded_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_prefixes.push(prefix.into());
        self
    }

    pub fn dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }
}

/// Assembles the bounded context window for a chat.
///
/// This is the single place trimming policy lives; callers never
/// re-implement budgeting, exclusion, or deduplication on their own.
pub struct ContextWindowBuilder {
    config: ContextWindowConfig,
}

impl ContextWindowBuilder {
    pub fn new(config: ContextWindowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContextWindowConfig {
        &self.config
    }

    /// Select the maximal suffix of recent entries that fits the
    /// character budget.
    ///
    /// `entries` is oldest-first; so is the result. The walk itself is
    /// newest-first: excluded entries are dropped, duplicates collapse
    /// onto their most recent occurrence, and accumulation stops hard
    /// at the first entry that would push the running total past
    /// `max_chars`. An oversized newest entry therefore yields an empty
    /// window rather than a partial or scattered one.
    pub fn build(&self, entries: &[Entry]) -> Vec<Entry> {
        if self.config.max_chars == 0 {
            return Vec::new();
        }

        let newest_first: Vec<Entry> = entries
            .iter()
            .rev()
            .filter(|entry| !self.is_excluded(&entry.content))
            .cloned()
            .collect();

        let newest_first = if self.config.dedup {
            dedup_by_content(&newest_first)
        } else {
            newest_first
        };

        let mut total = 0usize;
        let mut picked = Vec::new();
        for entry in newest_first {
            let length = entry.content.chars().count();
            if total + length > self.config.max_chars {
                break;
            }
            total += length;
            picked.push(entry);
        }

        picked.reverse();
        picked
    }

    fn is_excluded(&self, content: &str) -> bool {
        let trimmed = content.trim();
        self.config
            .excluded_prefixes
            .iter()
            .any(|prefix| trimmed.starts_with(prefix.as_str()))
    }
}

/// Render a window as the plain text block sent to a completion
/// provider: entry contents joined with newlines.
pub fn render_context(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|entry| entry.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(max_chars: usize) -> ContextWindowBuilder {
        ContextWindowBuilder::new(ContextWindowConfig::new(max_chars))
    }

    #[test]
    fn keeps_most_recent_duplicate_and_restores_order() {
        let entries = vec![
            Entry::user("hi"),
            Entry::assistant("hello"),
            Entry::user("hi"),
        ];

        let result = builder(100).build(&entries);
        assert_eq!(result, vec![Entry::assistant("hello"), Entry::user("hi")]);
    }

    #[test]
    fn oversized_newest_entry_yields_empty_window() {
        let entries = vec![
            Entry::user("older message text"),
            Entry::assistant("older reply"),
            Entry::user("twelve chars"), // 12 chars, budget is 10
        ];

        assert!(builder(10).build(&entries).is_empty());
    }

    #[test]
    fn cutoff_is_hard_not_best_fit() {
        // Newest fits, the one before it does not; the walk stops there
        // even though the oldest entry alone would still fit.
        let entries = vec![
            Entry::user("ab"),
            Entry::assistant("long middle message"),
            Entry::user("recent"),
        ];

        let result = builder(10).build(&entries);
        assert_eq!(result, vec![Entry::user("recent")]);
    }

    #[test]
    fn excluded_prefix_drops_entry() {
        let entries = vec![Entry::user("!!secret"), Entry::user("visible")];
        let config = ContextWindowConfig::new(100).excluded_prefix("!!");

        let result = ContextWindowBuilder::new(config).build(&entries);
        assert_eq!(result, vec![Entry::user("visible")]);
    }

    #[test]
    fn exclusion_matches_after_trimming_whitespace() {
        let entries = vec![Entry::user("  !!padded"), Entry::user("kept")];
        let config = ContextWindowConfig::new(100).excluded_prefix("!!");

        let result = ContextWindowBuilder::new(config).build(&entries);
        assert_eq!(result, vec![Entry::user("kept")]);
    }

    #[test]
    fn zero_budget_yields_empty_window() {
        let entries = vec![Entry::user("hi")];
        assert!(builder(0).build(&entries).is_empty());
    }

    #[test]
    fn total_length_never_exceeds_budget() {
        let entries: Vec<Entry> = (0..20)
            .map(|i| Entry::user(format!("message number {}", i)))
            .collect();

        for max_chars in [0, 5, 17, 40, 100, 10_000] {
            let result = builder(max_chars).build(&entries);
            let total: usize =
                result.iter().map(|e| e.content.chars().count()).sum();
            assert!(total <= max_chars);
        }
    }

    #[test]
    fn result_is_contiguous_suffix_of_filtered_input() {
        let entries: Vec<Entry> = (0..10)
            .map(|i| Entry::user(format!("unique message {}", i)))
            .collect();

        let result = builder(60).build(&entries);
        assert!(!result.is_empty());

        // The selection must be exactly the tail of the input.
        let suffix = &entries[entries.len() - result.len()..];
        assert_eq!(result, suffix);
    }

    #[test]
    fn dedup_can_be_disabled() {
        let entries = vec![Entry::user("hi"), Entry::user("hi")];
        let config = ContextWindowConfig::new(100).dedup(false);

        let result = ContextWindowBuilder::new(config).build(&entries);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        // Four characters, twelve bytes.
        let entries = vec![Entry::user("日本語だ")];
        let result = builder(4).build(&entries);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn render_joins_contents_with_newlines() {
        let entries = vec![Entry::user("one"), Entry::assistant("two")];
        assert_eq!(render_context(&entries), "one\ntwo");
        assert_eq!(render_context(&[]), "");
    }
}
