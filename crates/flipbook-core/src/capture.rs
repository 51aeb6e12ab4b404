//! Collaborator interfaces for exports and confirmations.
//!
//! The editor drives these; concrete encoders and file delivery live in the
//! render crate.

use crate::color::Rgba;
use crate::layer::Layer;
use thiserror::Error;

/// Encoder and delivery failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("Encoder could not start: {0}")]
    Start(String),
    #[error("An export is already running.")]
    Busy,
    #[error("Frame rejected: {0}")]
    Frame(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Could not save file: {0}")]
    Delivery(String),
    #[error("Encoder stopped unexpectedly.")]
    Disconnected,
}

/// Options handed to the animation encoder when a capture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Output frame rate.
    pub fps: u32,
    /// Delay between entering record mode and the first counted frame.
    pub delay_ms: u64,
    /// Opaque color frames are composited over.
    pub background: Rgba,
}

impl CaptureOptions {
    /// Display time of a single frame.
    pub fn frame_delay_ms(&self) -> u32 {
        1000 / self.fps.max(1)
    }
}

/// Animated export backend.
///
/// The editor calls [`start`](CaptureSink::start) once, then
/// [`push_frame`](CaptureSink::push_frame) exactly `frame_count` times, one
/// frame per render tick. Completion of the encoded file is reported later
/// through [`poll_completion`](CaptureSink::poll_completion), which must
/// never block.
pub trait CaptureSink {
    /// Begin a capture named `name` that will receive `frame_count` frames.
    fn start(&mut self, name: &str, frame_count: usize, options: &CaptureOptions) -> Result<(), EncoderError>;

    /// Feed the next frame, in sequence order.
    fn push_frame(&mut self, frame: &Layer) -> Result<(), EncoderError>;

    /// Result of a finished capture: the delivered file name or the failure.
    fn poll_completion(&mut self) -> Option<Result<String, EncoderError>>;
}

/// Still image export backend (one file per frame).
pub trait StillSink {
    /// Encode and deliver one opaque frame.
    fn write_still(&mut self, filename: &str, frame: &Layer) -> Result<(), EncoderError>;
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Base name for exported files: `flipbook_YYYYMMDD_HHMMSS` in local time.
pub fn export_base_name() -> String {
    format!("flipbook_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// File name of frame `index` in a still sequence.
pub fn still_filename(base: &str, index: usize) -> String {
    format!("{base}_frame_{index:03}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_filename_padding() {
        assert_eq!(still_filename("flipbook_x", 0), "flipbook_x_frame_000.png");
        assert_eq!(still_filename("flipbook_x", 42), "flipbook_x_frame_042.png");
        assert_eq!(still_filename("flipbook_x", 1234), "flipbook_x_frame_1234.png");
    }

    #[test]
    fn test_export_base_name_shape() {
        let name = export_base_name();
        let stamp = name.strip_prefix("flipbook_").unwrap();
        assert_eq!(stamp.len(), "YYYYMMDD_HHMMSS".len());
        assert_eq!(stamp.as_bytes()[8], b'_');
    }

    #[test]
    fn test_frame_delay() {
        let options = CaptureOptions {
            fps: 12,
            delay_ms: 0,
            background: Rgba::WHITE,
        };
        assert_eq!(options.frame_delay_ms(), 83);
    }

    #[test]
    fn test_closure_confirm() {
        let mut asked = Vec::new();
        let mut confirm = |prompt: &str| {
            asked.push(prompt.to_string());
            false
        };
        assert!(!Confirm::confirm(&mut confirm, "Sure?"));
        assert_eq!(asked, vec!["Sure?".to_string()]);
    }
}
