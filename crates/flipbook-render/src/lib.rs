//! Flipbook Render Library
//!
//! Composes editor views into pixel buffers and implements the export
//! backends: PNG still sequences and animated GIFs encoded off the UI thread.

pub mod delivery;
mod gif_capture;
mod png_export;
mod renderer;

pub use delivery::{DeliveryError, DeliveryResult, DirectorySink, FileSink, MemorySink};
pub use gif_capture::GifCapture;
pub use png_export::{PngSequenceWriter, encode_png};
pub use renderer::{CpuRenderer, RenderContext, RenderError, RenderResult, Renderer};
