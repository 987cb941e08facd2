use super::entry::HistoryEntry;

/// Entries whose preview contains `query` as a literal, case-sensitive substring
///
/// Order is preserved. An empty query matches every entry.
pub fn filter<'a>(entries: &'a [HistoryEntry], query: &str) -> Vec<&'a HistoryEntry> {
    entries
        .iter()
        .filter(|entry| entry.preview.contains(query))
        .collect()
}
