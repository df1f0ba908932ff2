use anyhow::Result;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

/// One captured video frame (RGB8, interleaved).
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Raw pixel data, 3 bytes per pixel
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Milliseconds since the source was acquired
    pub timestamp_ms: u64,
}

impl VideoFrame {
    /// Encode the frame as JPEG for recognition submission.
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
        encoder.encode(
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::Rgb8,
        )?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_rgb_frame_to_jpeg() {
        let frame = VideoFrame {
            pixels: vec![128u8; 16 * 8 * 3],
            width: 16,
            height: 8,
            timestamp_ms: 0,
        };

        let jpeg = frame.to_jpeg(80).unwrap();
        assert!(!jpeg.is_empty());
        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
