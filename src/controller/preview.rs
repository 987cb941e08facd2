use image::DynamicImage;

/// Bounds applied when turning a decoded payload into something displayable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLimits {
    /// Maximum number of characters of text shown
    pub text_limit: usize,
    /// Longest side of a raster preview, in pixels
    pub image_max_px: u32,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        PreviewLimits {
            text_limit: 2048,
            image_max_px: 512,
        }
    }
}

/// What the preview panel shows for the selected entry
#[derive(Debug, Clone)]
pub enum Preview {
    /// Supported raster image, already downscaled
    Image(DynamicImage),
    /// Text payload, cut at the configured limit
    Text { text: String, truncated: bool },
    /// Empty, binary or otherwise unusable payload
    Unavailable,
}

impl Preview {
    /// Classify a decoded payload: image first, then text, else unavailable
    pub fn from_payload(data: &[u8], limits: PreviewLimits) -> Self {
        if data.is_empty() {
            return Preview::Unavailable;
        }

        if let Some(img) = crate::image::decode_bounded(data, limits.image_max_px) {
            return Preview::Image(img);
        }

        let Ok(text) = std::str::from_utf8(data) else {
            return Preview::Unavailable;
        };
        if text.trim().is_empty() {
            return Preview::Unavailable;
        }

        let mut chars = text.char_indices();
        match chars.nth(limits.text_limit) {
            Some((cut, _)) => Preview::Text {
                text: text[..cut].to_string(),
                truncated: true,
            },
            None => Preview::Text {
                text: text.to_string(),
                truncated: false,
            },
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Preview::Image(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(text_limit: usize) -> PreviewLimits {
        PreviewLimits {
            text_limit,
            image_max_px: 64,
        }
    }

    #[test]
    fn test_text_payload() {
        match Preview::from_payload(b"line one\nline two", limits(100)) {
            Preview::Text { text, truncated } => {
                assert_eq!(text, "line one\nline two");
                assert!(!truncated);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_text_capped_on_char_boundary() {
        match Preview::from_payload("ąęćźż".as_bytes(), limits(3)) {
            Preview::Text { text, truncated } => {
                assert_eq!(text, "ąęć");
                assert!(truncated);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_text_exactly_at_limit_is_not_truncated() {
        match Preview::from_payload(b"abc", limits(3)) {
            Preview::Text { truncated, .. } => assert!(!truncated),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_unusable_payloads() {
        assert!(matches!(
            Preview::from_payload(b"", limits(10)),
            Preview::Unavailable
        ));
        assert!(matches!(
            Preview::from_payload(b"  \n\t", limits(10)),
            Preview::Unavailable
        ));
        assert!(matches!(
            Preview::from_payload(&[0xff, 0xfe, 0x00, 0x81], limits(10)),
            Preview::Unavailable
        ));
    }

    #[test]
    fn test_image_payload() {
        let preview = Preview::from_payload(&crate::image::png_bytes(200, 50), limits(10));
        match preview {
            Preview::Image(img) => assert!(img.width() <= 64),
            other => panic!("expected image, got {:?}", other),
        }
    }
}
