//! PNG encoding and still-sequence export.

use crate::delivery::FileSink;
use crate::renderer::{RenderError, RenderResult};
use flipbook_core::{EncoderError, Layer, StillSink, Surface};
use std::sync::Arc;

/// Encode a flattened frame as an 8-bit RGB PNG. Alpha is dropped.
pub fn encode_png(frame: &Layer) -> RenderResult<Vec<u8>> {
    let (width, height) = (frame.width(), frame.height());
    let rgb: Vec<u8> = frame
        .pixels()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Encode(format!("Failed to write PNG header: {e}")))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| RenderError::Encode(format!("Failed to write PNG data: {e}")))?;
        writer
            .finish()
            .map_err(|e| RenderError::Encode(format!("Failed to finish PNG: {e}")))?;
    }
    Ok(png_data)
}

/// Writes each frame of a still export as its own PNG file.
pub struct PngSequenceWriter {
    sink: Arc<dyn FileSink>,
    written: usize,
}

impl PngSequenceWriter {
    pub fn new(sink: Arc<dyn FileSink>) -> Self {
        Self { sink, written: 0 }
    }

    /// Files written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl StillSink for PngSequenceWriter {
    fn write_still(&mut self, filename: &str, frame: &Layer) -> Result<(), EncoderError> {
        let bytes = encode_png(frame).map_err(|e| EncoderError::Encode(e.to_string()))?;
        self.sink.deliver(filename, &bytes)?;
        self.written += 1;
        log::info!("PNG export: {} ({} bytes)", filename, bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::MemorySink;
    use flipbook_core::Rgba;
    use kurbo::Point;

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn test_encode_png_is_rgb() {
        let mut layer = Layer::new(8, 4);
        layer.fill(Rgba::WHITE);
        layer.circle(Point::new(2.0, 2.0), 4.0, Rgba::opaque(200, 10, 20));

        let bytes = encode_png(&layer).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let (info, pixels) = decode(&bytes);
        assert_eq!((info.width, info.height), (8, 4));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!(pixels.len(), 8 * 4 * 3);
        assert_eq!(&pixels[(2 * 8 + 2) * 3..(2 * 8 + 2) * 3 + 3], &[200, 10, 20]);
        assert_eq!(&pixels[pixels.len() - 3..], &[255, 255, 255]);
    }

    #[test]
    fn test_sequence_writer_delivers() {
        let sink = Arc::new(MemorySink::new());
        let mut writer = PngSequenceWriter::new(sink.clone());
        let mut layer = Layer::new(4, 4);
        layer.fill(Rgba::WHITE);

        writer.write_still("flip_frame_000.png", &layer).unwrap();
        writer.write_still("flip_frame_001.png", &layer).unwrap();
        assert_eq!(writer.written(), 2);
        assert_eq!(sink.names(), vec!["flip_frame_000.png", "flip_frame_001.png"]);
    }
}
