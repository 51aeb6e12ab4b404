//! Drawing surface abstraction.
//!
//! The editor only ever draws through these primitives, so any raster backend
//! can stand in for the CPU [`Layer`](crate::layer::Layer) implementation.

use crate::color::Rgba;
use crate::layer::Layer;
use kurbo::Point;

/// Minimal set of raster operations used by strokes and compositing.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Stroke a straight line with round caps.
    fn line(&mut self, from: Point, to: Point, width: f64, color: Rgba);

    /// Fill a disc of the given diameter.
    fn circle(&mut self, center: Point, diameter: f64, color: Rgba);

    /// Composite another layer over this surface, stretched to fit, at the
    /// given opacity in `[0, 1]`.
    fn image(&mut self, source: &Layer, opacity: f64);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Copy of the pixels as straight-alpha RGBA8, row-major.
    fn to_pixel_buffer(&self) -> Vec<u8>;
}
