use std::process::ExitCode;

/// Exit code for a fatal startup error (missing tools, broken vocabulary)
pub const FATAL: u8 = 1;

/// How an interactive session ended, surfaced to the invoking shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Closed without action (cancel key, Ctrl-C)
    Cancelled,
    /// An entry was copied to the clipboard
    Copied,
    /// The whole history was wiped
    Wiped,
    /// Interrupted by the given signal
    Signal(i32),
}

impl ExitStatus {
    /// Numeric process exit code
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Cancelled => 0,
            ExitStatus::Copied => 2,
            ExitStatus::Wiped => 3,
            ExitStatus::Signal(n) => 128u8.saturating_add(n.clamp(0, 127) as u8),
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
