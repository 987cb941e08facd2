pub mod protocol;

use image::DynamicImage;

pub use protocol::ImageProtocol;

/// Try to decode `data` as a raster image, downscaled to fit `max_px` on its longest side
///
/// Most clipboard entries are text, so `None` is the common outcome and not an error.
pub fn decode_bounded(data: &[u8], max_px: u32) -> Option<DynamicImage> {
    let format = image::guess_format(data).ok()?;

    match image::load_from_memory_with_format(data, format) {
        Ok(img) => {
            let max_px = max_px.max(1);
            if img.width() > max_px || img.height() > max_px {
                Some(img.thumbnail(max_px, max_px))
            } else {
                Some(img)
            }
        }
        Err(e) => {
            log::debug!("Payload looks like {:?} but failed to decode: {}", format, e);
            None
        }
    }
}

/// Create an image protocol handler using ratatui-image
///
/// Uses ratatui-image's Picker which auto-detects terminal capabilities:
/// - Kitty graphics protocol
/// - Sixel protocol
/// - iTerm2 protocol
/// - Halfblocks fallback (always works)
pub fn create_image_protocol() -> ImageProtocol {
    let protocol = ImageProtocol::new();
    log::debug!("Created ratatui-image protocol (auto-detected terminal capabilities)");
    protocol
}

/// Encode a blank PNG of the given size
#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
