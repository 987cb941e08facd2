pub mod cliphist;
#[cfg(test)]
pub mod fake;

use std::process::ExitStatus;

pub use cliphist::CliphistTool;

/// Failure talking to the external history tool
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to run `{program} {op}`: {source}")]
    Spawn {
        program: String,
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program} {op}` exited with {status}")]
    Status {
        program: String,
        op: &'static str,
        status: ExitStatus,
    },
}

/// Trait for the clipboard history backend
/// The real history lives in an external tool; this is the narrow surface we use
pub trait HistoryTool {
    /// Raw newline-delimited `<id>\t<preview>` listing, newest first
    fn list(&self) -> Result<Vec<u8>, HistoryError>;

    /// Full original payload of the record listed as `raw_line`
    fn decode(&self, raw_line: &[u8]) -> Result<Vec<u8>, HistoryError>;

    /// Remove the record whose listing line is exactly `raw_line`
    fn delete(&mut self, raw_line: &[u8]) -> Result<(), HistoryError>;

    /// Remove every record
    fn wipe(&mut self) -> Result<(), HistoryError>;

    /// Backend name (for logging/debugging)
    fn name(&self) -> &str;
}
