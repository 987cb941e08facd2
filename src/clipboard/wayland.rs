use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::backend::ClipboardBackend;

/// Wayland clipboard backend using wl-clipboard tools
/// Decoded bytes are piped to wl-copy, which detects the mime type itself
pub struct WaylandBackend {
    program: PathBuf,
}

impl WaylandBackend {
    /// Create a new Wayland clipboard backend, resolving `program` on PATH
    pub fn new(program: &str) -> Result<Self> {
        let program = which::which(program)
            .with_context(|| format!("{} not found. Install wl-clipboard package", program))?;

        log::debug!("WaylandBackend initialized with {:?}", program);
        Ok(WaylandBackend { program })
    }
}

impl ClipboardBackend for WaylandBackend {
    fn write(&self, data: &[u8]) -> Result<()> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn wl-copy")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(data)
                .context("Failed to write to wl-copy stdin")?;
        }

        let status = child.wait().context("Failed to wait for wl-copy")?;

        if !status.success() {
            return Err(anyhow!("wl-copy failed with status: {}", status));
        }

        log::debug!("Wrote {} bytes to clipboard", data.len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Wayland"
    }
}
