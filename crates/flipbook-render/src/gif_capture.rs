//! Animated GIF export on a background thread.
//!
//! Frames are copied into an mpsc channel as the editor captures them; the
//! worker encodes them, hands the file to a [`FileSink`] and reports the
//! outcome on a one-shot channel that [`GifCapture::poll_completion`] drains
//! without blocking.

use crate::delivery::FileSink;
use flipbook_core::{CaptureOptions, CaptureSink, EncoderError, Layer, Surface};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

/// Encoder speed passed to the GIF quantizer (1 = best, 30 = fastest).
const ENCODE_SPEED: i32 = 10;

type Completion = Result<String, EncoderError>;

/// Frame feed of the running capture.
struct Feed {
    frames: Sender<Layer>,
    remaining: usize,
}

/// [`CaptureSink`] producing looping GIF files.
pub struct GifCapture {
    sink: Arc<dyn FileSink>,
    feed: Option<Feed>,
    completion: Option<Receiver<Completion>>,
}

impl GifCapture {
    pub fn new(sink: Arc<dyn FileSink>) -> Self {
        Self {
            sink,
            feed: None,
            completion: None,
        }
    }

    /// Whether a capture is still being fed or encoded.
    pub fn is_busy(&self) -> bool {
        self.feed.is_some() || self.completion.is_some()
    }

    /// Block until the running capture has been encoded and delivered.
    ///
    /// Returns `None` when no capture was started.
    pub fn wait_completion(&mut self) -> Option<Completion> {
        self.feed = None;
        let receiver = self.completion.take()?;
        Some(receiver.recv().unwrap_or(Err(EncoderError::Disconnected)))
    }
}

impl CaptureSink for GifCapture {
    fn start(&mut self, name: &str, frame_count: usize, options: &CaptureOptions) -> Result<(), EncoderError> {
        if self.is_busy() {
            return Err(EncoderError::Busy);
        }
        if frame_count == 0 {
            return Err(EncoderError::Start("no frames to encode".into()));
        }

        let (frame_tx, frame_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        let filename = format!("{name}.gif");
        let sink = Arc::clone(&self.sink);
        let options = *options;

        thread::Builder::new()
            .name("gif-encoder".into())
            .spawn(move || {
                let result = encode_frames(&frame_rx, frame_count, &options).and_then(|bytes| {
                    sink.deliver(&filename, &bytes)?;
                    log::info!("GIF export complete: {} ({} bytes)", filename, bytes.len());
                    Ok(filename)
                });
                if let Err(err) = &result {
                    log::error!("GIF export failed: {err}");
                }
                let _ = done_tx.send(result);
            })
            .map_err(|e| EncoderError::Start(e.to_string()))?;

        log::debug!("GIF capture started: {frame_count} frames at {} fps", options.fps);
        self.feed = Some(Feed {
            frames: frame_tx,
            remaining: frame_count,
        });
        self.completion = Some(done_rx);
        Ok(())
    }

    fn push_frame(&mut self, frame: &Layer) -> Result<(), EncoderError> {
        let Some(feed) = self.feed.as_mut() else {
            return Err(EncoderError::Frame("no capture running".into()));
        };
        if feed.frames.send(frame.clone()).is_err() {
            self.feed = None;
            return Err(EncoderError::Disconnected);
        }
        feed.remaining -= 1;
        if feed.remaining == 0 {
            // Dropping the sender lets the worker finish the file.
            self.feed = None;
        }
        Ok(())
    }

    fn poll_completion(&mut self) -> Option<Completion> {
        let receiver = self.completion.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(EncoderError::Disconnected),
        };
        self.feed = None;
        self.completion = None;
        Some(result)
    }
}

/// Encode frames until the feed closes; fails if fewer than `expected` arrive.
fn encode_frames(frames: &Receiver<Layer>, expected: usize, options: &CaptureOptions) -> Result<Vec<u8>, EncoderError> {
    let delay = Delay::from_numer_denom_ms(1000, options.fps.max(1));
    let mut bytes = Vec::new();
    let mut encoded = 0;
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, ENCODE_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| EncoderError::Encode(e.to_string()))?;

        for layer in frames.iter().take(expected) {
            let flat = layer.flatten_over(options.background);
            let (width, height) = (flat.width(), flat.height());
            let buffer = RgbaImage::from_raw(width, height, flat.into_pixels())
                .ok_or_else(|| EncoderError::Frame(format!("bad pixel buffer for {width}x{height} frame")))?;
            encoder
                .encode_frame(Frame::from_parts(buffer, 0, 0, delay))
                .map_err(|e| EncoderError::Encode(e.to_string()))?;
            encoded += 1;
        }
    }

    if encoded < expected {
        return Err(EncoderError::Encode(format!("capture ended after {encoded} of {expected} frames")));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::MemorySink;
    use flipbook_core::Rgba;
    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use kurbo::Point;
    use std::io::Cursor;

    fn options() -> CaptureOptions {
        CaptureOptions {
            fps: 10,
            delay_ms: 0,
            background: Rgba::WHITE,
        }
    }

    fn frame(x: f64) -> Layer {
        let mut layer = Layer::new(16, 12);
        layer.circle(Point::new(x, 6.0), 4.0, Rgba::BLACK);
        layer
    }

    #[test]
    fn test_encodes_all_frames() {
        let sink = Arc::new(MemorySink::new());
        let mut capture = GifCapture::new(sink.clone());

        capture.start("flipbook_test", 3, &options()).unwrap();
        assert!(capture.is_busy());
        for x in [3.0, 8.0, 13.0] {
            capture.push_frame(&frame(x)).unwrap();
        }
        assert_eq!(capture.wait_completion(), Some(Ok("flipbook_test.gif".to_string())));
        assert!(!capture.is_busy());

        let bytes = sink.get("flipbook_test.gif").unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
        let decoder = GifDecoder::new(Cursor::new(bytes)).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].delay().numer_denom_ms(), (100, 1));

        // Background is composited in, so the corner is opaque white.
        let first = frames[0].buffer();
        assert_eq!(first.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_poll_reports_once() {
        let sink = Arc::new(MemorySink::new());
        let mut capture = GifCapture::new(sink);
        assert_eq!(capture.poll_completion(), None);

        capture.start("once", 1, &options()).unwrap();
        capture.push_frame(&frame(5.0)).unwrap();

        let mut result = None;
        for _ in 0..500 {
            result = capture.poll_completion();
            if result.is_some() {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(result, Some(Ok("once.gif".to_string())));
        assert_eq!(capture.poll_completion(), None);
    }

    #[test]
    fn test_busy_and_unstarted() {
        let mut capture = GifCapture::new(Arc::new(MemorySink::new()));
        assert!(matches!(capture.push_frame(&frame(1.0)), Err(EncoderError::Frame(_))));
        assert!(matches!(capture.start("x", 0, &options()), Err(EncoderError::Start(_))));

        capture.start("x", 2, &options()).unwrap();
        assert_eq!(capture.start("y", 2, &options()), Err(EncoderError::Busy));
    }

    #[test]
    fn test_short_feed_fails() {
        let sink = Arc::new(MemorySink::new());
        let mut capture = GifCapture::new(sink.clone());
        capture.start("short", 3, &options()).unwrap();
        capture.push_frame(&frame(2.0)).unwrap();
        assert!(matches!(capture.wait_completion(), Some(Err(EncoderError::Encode(_)))));
        assert!(sink.is_empty());
    }
}
