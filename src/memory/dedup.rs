use super::Entry;
use std::collections::HashSet;

/// Remove duplicate-content entries from a sequence, keeping the first
/// occurrence of each distinct content string in scan order.
///
/// Matching is exact and case-sensitive, and ignores the entry role.
/// The output is a stable subsequence of the input. Callers that want
/// "most recent occurrence wins" feed the sequence in newest-first
/// order, which is what the context window builder does.
pub fn dedup_by_content(entries: &[Entry]) -> Vec<Entry> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());
    let mut kept = Vec::with_capacity(entries.len());

    for entry in entries {
        if seen.insert(entry.content.as_str()) {
            kept.push(entry.clone());
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence_in_scan_order() {
        let entries = vec![
            Entry::user("hi"),
            Entry::assistant("hello"),
            Entry::user("hi"),
        ];

        let result = dedup_by_content(&entries);
        assert_eq!(result, vec![Entry::user("hi"), Entry::assistant("hello")]);
    }

    #[test]
    fn matches_regardless_of_role() {
        let entries = vec![Entry::user("same"), Entry::assistant("same")];

        let result = dedup_by_content(&entries);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].role, crate::memory::Role::User);
    }

    #[test]
    fn is_case_sensitive() {
        let entries = vec![Entry::user("Hi"), Entry::user("hi")];
        assert_eq!(dedup_by_content(&entries).len(), 2);
    }

    #[test]
    fn is_idempotent() {
        let entries = vec![
            Entry::user("a"),
            Entry::user("b"),
            Entry::user("a"),
            Entry::assistant("c"),
            Entry::assistant("b"),
        ];

        let once = dedup_by_content(&entries);
        let twice = dedup_by_content(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn does_not_mutate_input() {
        let entries = vec![Entry::user("x"), Entry::user("x")];
        let _ = dedup_by_content(&entries);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(dedup_by_content(&[]).is_empty());
    }
}
