//! Renderer trait abstraction and the CPU compositor.

use flipbook_core::{Layer, Rgba, Surface, View};
use kurbo::Size;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid output size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Context for a single composed frame.
pub struct RenderContext<'a> {
    /// What the editor wants shown.
    pub view: &'a View<'a>,
    /// Opaque color under everything.
    pub background: Rgba,
    /// Whether onion frames are drawn at all.
    pub show_onion: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with a white background.
    pub fn new(view: &'a View<'a>) -> Self {
        Self {
            view,
            background: Rgba::WHITE,
            show_onion: true,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    /// Hide onion frames.
    pub fn without_onion(mut self) -> Self {
        self.show_onion = false;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Compose the frame described by `ctx`.
    fn build_frame(&mut self, ctx: &RenderContext<'_>);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext<'_>) -> Rgba {
        ctx.background
    }
}

/// Composes views into an owned RGBA buffer at base resolution.
pub struct CpuRenderer {
    target: Layer,
}

impl CpuRenderer {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        Ok(Self {
            target: Layer::new(width, height),
        })
    }

    pub fn size(&self) -> Size {
        self.target.size()
    }

    /// The last composed frame.
    pub fn frame(&self) -> &Layer {
        &self.target
    }
}

impl Renderer for CpuRenderer {
    fn build_frame(&mut self, ctx: &RenderContext<'_>) {
        let background = self.background_color(ctx);
        self.target.fill(background);
        match ctx.view {
            View::Draw { onion, active } => {
                if ctx.show_onion {
                    for frame in onion {
                        self.target.image(frame.layer, frame.opacity);
                    }
                }
                self.target.image(active, 1.0);
            }
            View::Frame(frame) => self.target.image(frame, 1.0),
        }
    }
}
