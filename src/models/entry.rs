use std::collections::HashSet;

/// A single clipboard history record as printed by `cliphist list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Opaque identifier understood only by the history tool
    pub id: String,
    /// Possibly truncated preview, used for display and filtering
    pub preview: String,
    /// Exact original line bytes (without the trailing newline)
    /// The history tool's delete operation matches on these
    pub raw: Vec<u8>,
}

impl HistoryEntry {
    /// Build an entry from its two fields, joining them the way the tool prints them
    pub fn new(id: impl Into<String>, preview: impl Into<String>) -> Self {
        let id = id.into();
        let preview = preview.into();
        let raw = format!("{}\t{}", id, preview).into_bytes();
        HistoryEntry { id, preview, raw }
    }

    /// Parse one raw line. Returns None when the line has no TAB or an empty id
    pub fn parse_line(line: &[u8]) -> Option<Self> {
        let tab = line.iter().position(|&b| b == b'\t')?;
        let (id, rest) = line.split_at(tab);
        if id.is_empty() {
            return None;
        }

        Some(HistoryEntry {
            id: String::from_utf8_lossy(id).into_owned(),
            preview: String::from_utf8_lossy(&rest[1..]).into_owned(),
            raw: line.to_vec(),
        })
    }

    /// Preview truncated to at most `max_len` characters, ellipsis included
    pub fn display_preview(&self, max_len: usize) -> String {
        let char_count = self.preview.chars().count();
        if char_count <= max_len {
            return self.preview.clone();
        }
        if max_len < 3 {
            return self.preview.chars().take(max_len).collect();
        }
        let mut out: String = self.preview.chars().take(max_len - 3).collect();
        out.push_str("...");
        out
    }
}

/// Why a listing line was skipped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("line {line}: expected `<id>\\t<preview>`")]
    Malformed { line: usize },

    #[error("line {line}: duplicate id {id}")]
    DuplicateId { line: usize, id: String },
}

/// Result of parsing a full `list` output
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Listing {
    pub entries: Vec<HistoryEntry>,
    pub errors: Vec<LineError>,
}

impl Listing {
    /// Split `list` output into entries, collecting per-line errors
    /// Line numbers in errors are 1-based
    pub fn parse(output: &[u8]) -> Self {
        let mut listing = Listing::default();
        let mut seen = HashSet::new();

        let mut lines: Vec<&[u8]> = output.split(|&b| b == b'\n').collect();
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        for (idx, line) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            match HistoryEntry::parse_line(line) {
                Some(entry) => {
                    if seen.insert(entry.id.clone()) {
                        listing.entries.push(entry);
                    } else {
                        listing.errors.push(LineError::DuplicateId {
                            line: line_no,
                            id: entry.id,
                        });
                    }
                }
                None => listing.errors.push(LineError::Malformed { line: line_no }),
            }
        }

        listing
    }
}
