use anyhow::Result;

/// Trait for clipboard backend abstraction
/// Write-only: the history itself is owned by the external history tool
pub trait ClipboardBackend: Send + Sync {
    /// Replace the clipboard contents with `data`
    fn write(&self, data: &[u8]) -> Result<()>;

    /// Get the backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}
