use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use super::{HistoryError, HistoryTool};

/// In-memory stand-in for cliphist
/// Records which operations were invoked so tests can assert on them
#[derive(Debug, Default)]
pub struct FakeHistory {
    /// (listing line, decoded payload), newest first
    /// Decode and delete match on the exact line
    pub records: Vec<(Vec<u8>, Vec<u8>)>,
    /// Extra bytes appended to the listing (for malformed-line tests)
    pub listing_suffix: Vec<u8>,
    pub fail_list: bool,
    pub fail_wipe: bool,
    pub delete_calls: Vec<Vec<u8>>,
    pub wipe_calls: usize,
    pub decode_calls: RefCell<Vec<String>>,
    pub overrides: HashMap<String, Vec<u8>>,
}

impl FakeHistory {
    pub fn with_text(lines: &[(&str, &str)]) -> Self {
        let records = lines
            .iter()
            .map(|(id, text)| {
                (format!("{}\t{}", id, text).into_bytes(), text.as_bytes().to_vec())
            })
            .collect();
        FakeHistory {
            records,
            ..Default::default()
        }
    }

    /// Replace the decoded payload of `id` (e.g. with image bytes)
    pub fn set_payload(&mut self, id: &str, payload: Vec<u8>) {
        self.overrides.insert(id.to_string(), payload);
    }

    fn id_of(line: &[u8]) -> String {
        let end = line.iter().position(|&b| b == b'\t').unwrap_or(line.len());
        String::from_utf8_lossy(&line[..end]).into_owned()
    }

    fn failure(op: &'static str) -> HistoryError {
        HistoryError::Spawn {
            program: "fake".to_string(),
            op,
            source: io::Error::other("simulated failure"),
        }
    }
}

impl HistoryTool for FakeHistory {
    fn list(&self) -> Result<Vec<u8>, HistoryError> {
        if self.fail_list {
            return Err(Self::failure("list"));
        }
        let mut out = Vec::new();
        for (line, _) in &self.records {
            out.extend_from_slice(line);
            out.push(b'\n');
        }
        out.extend_from_slice(&self.listing_suffix);
        Ok(out)
    }

    fn decode(&self, raw_line: &[u8]) -> Result<Vec<u8>, HistoryError> {
        let id = Self::id_of(raw_line);
        self.decode_calls.borrow_mut().push(id.clone());
        if let Some(payload) = self.overrides.get(&id) {
            return Ok(payload.clone());
        }
        Ok(self
            .records
            .iter()
            .find(|(line, _)| line.as_slice() == raw_line)
            .map(|(_, payload)| payload.clone())
            .unwrap_or_default())
    }

    fn delete(&mut self, raw_line: &[u8]) -> Result<(), HistoryError> {
        self.delete_calls.push(raw_line.to_vec());
        self.records.retain(|(line, _)| line.as_slice() != raw_line);
        Ok(())
    }

    fn wipe(&mut self) -> Result<(), HistoryError> {
        if self.fail_wipe {
            return Err(Self::failure("wipe"));
        }
        self.wipe_calls += 1;
        self.records.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}
