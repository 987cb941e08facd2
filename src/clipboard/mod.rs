pub mod backend;
pub mod wayland;

use anyhow::Result;
use std::env;

pub use backend::ClipboardBackend;
pub use wayland::WaylandBackend;

/// Create the clipboard backend around the configured copy utility
/// Only Wayland is supported; without WAYLAND_DISPLAY the copy will most likely fail
pub fn create_backend(program: &str) -> Result<WaylandBackend> {
    if env::var("WAYLAND_DISPLAY").is_ok() {
        log::info!("Detected Wayland display server");
    } else {
        log::warn!("WAYLAND_DISPLAY is not set, {} may not be able to reach a compositor", program);
    }

    WaylandBackend::new(program)
}

/// Clipboard that keeps every write in memory
#[cfg(test)]
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    pub writes: std::sync::Arc<std::sync::Mutex<Vec<Vec<u8>>>>,
    pub fail: bool,
}

#[cfg(test)]
impl RecordingClipboard {
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ClipboardBackend for RecordingClipboard {
    fn write(&self, data: &[u8]) -> Result<()> {
        if self.fail {
            anyhow::bail!("clipboard unavailable");
        }
        self.writes.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
