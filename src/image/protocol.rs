use image::DynamicImage;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

/// Image protocol handler for ratatui-based rendering
/// Uses ratatui-image library which integrates properly with ratatui's rendering
pub struct ImageProtocol {
    /// Protocol picker that auto-detects terminal capabilities
    pub picker: Picker,
}

impl ImageProtocol {
    /// Create a new image protocol handler
    /// Must run after the terminal is set up, since it queries stdio
    pub fn new() -> Self {
        let picker = Picker::from_query_stdio().unwrap_or_else(|e| {
            log::debug!("Terminal graphics query failed ({:?}), using halfblocks", e);
            Picker::from_fontsize((8, 12))
        });

        ImageProtocol { picker }
    }

    /// Wrap a decoded image into a resizable protocol state
    pub fn prepare(&mut self, img: DynamicImage) -> StatefulProtocol {
        self.picker.new_resize_protocol(img)
    }
}

impl Default for ImageProtocol {
    fn default() -> Self {
        Self::new()
    }
}
