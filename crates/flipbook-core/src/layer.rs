//! Fixed-size raster layers.

use crate::color::Rgba;
use crate::surface::Surface;
use kurbo::{Point, Size};

/// A straight-alpha RGBA8 pixel buffer at base resolution.
///
/// Pixel `(x, y)` covers the unit square whose center is `(x + 0.5, y + 0.5)`
/// in base space.
#[derive(Clone, PartialEq, Eq)]
pub struct Layer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Layer {
    /// Create a blank (fully transparent) layer. Dimensions are clamped to at least 1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Color of a single pixel, or `None` outside the layer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// True if every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_array());
        }
    }

    /// Composite this layer over an opaque background into a new layer.
    pub fn flatten_over(&self, background: Rgba) -> Layer {
        let mut out = Layer::new(self.width, self.height);
        out.fill(Rgba { a: 255, ..background });
        out.image(self, 1.0);
        out
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Source-over blend of `color` scaled by `coverage` into pixel `(x, y)`.
    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f64) {
        let src_a = color.alpha_f64() * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let i = self.offset(x, y);
        let dst = &mut self.pixels[i..i + 4];
        let dst_a = f64::from(dst[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            dst.fill(0);
            return;
        }
        let src = color.to_array();
        for c in 0..3 {
            let value = (f64::from(src[c]) * src_a + f64::from(dst[c]) * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Pixel range covering `[min, max]` in one axis, clamped to `0..limit`.
    fn span(min: f64, max: f64, limit: u32) -> std::ops::Range<u32> {
        let start = min.floor().max(0.0);
        let end = (max.ceil() + 1.0).min(f64::from(limit));
        if !(start < end) {
            return 0..0;
        }
        start as u32..end as u32
    }

    /// Rasterize a round-capped capsule of half-width `radius` from `a` to `b`.
    fn fill_capsule(&mut self, a: Point, b: Point, radius: f64, color: Rgba) {
        if radius <= 0.0 || color.a == 0 {
            return;
        }
        let pad = radius + 1.0;
        let xs = Self::span(a.x.min(b.x) - pad, a.x.max(b.x) + pad, self.width);
        let ys = Self::span(a.y.min(b.y) - pad, a.y.max(b.y) + pad, self.height);
        for y in ys {
            for x in xs.clone() {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let coverage = radius + 0.5 - distance_to_segment(center, a, b);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}

/// Euclidean distance from `p` to the segment `a`–`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for Layer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        self.fill_capsule(from, to, width / 2.0, color);
    }

    fn circle(&mut self, center: Point, diameter: f64, color: Rgba) {
        self.fill_capsule(center, center, diameter / 2.0, color);
    }

    fn image(&mut self, source: &Layer, opacity: f64) {
        if opacity <= 0.0 {
            return;
        }
        let (dw, dh) = (u64::from(self.width), u64::from(self.height));
        let (sw, sh) = (u64::from(source.width), u64::from(source.height));
        for y in 0..self.height {
            let sy = (u64::from(y) * sh / dh) as u32;
            for x in 0..self.width {
                let sx = (u64::from(x) * sw / dw) as u32;
                let i = source.offset(sx, sy);
                let px = &source.pixels[i..i + 4];
                if px[3] == 0 {
                    continue;
                }
                self.blend(x, y, Rgba::new(px[0], px[1], px[2], px[3]), opacity);
            }
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn to_pixel_buffer(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layer_is_blank() {
        let layer = Layer::new(4, 3);
        assert!(layer.is_blank());
        assert_eq!(layer.pixels().len(), 4 * 3 * 4);
        assert_eq!(Layer::new(0, 0).size(), Size::new(1.0, 1.0));
    }

    #[test]
    fn test_circle_coverage() {
        let mut layer = Layer::new(40, 40);
        layer.circle(Point::new(20.0, 20.0), 6.0, Rgba::BLACK);

        assert_eq!(layer.pixel(19, 19), Some(Rgba::BLACK));
        assert_eq!(layer.pixel(20, 20), Some(Rgba::BLACK));
        assert_eq!(layer.pixel(25, 20).map(|c| c.a), Some(0));
        assert_eq!(layer.pixel(20, 14).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_line_covers_path() {
        let mut layer = Layer::new(50, 20);
        layer.line(Point::new(5.0, 10.0), Point::new(45.0, 10.0), 4.0, Rgba::opaque(255, 0, 0));

        for x in 5..45 {
            assert_eq!(layer.pixel(x, 9), Some(Rgba::opaque(255, 0, 0)), "gap at x={x}");
        }
        assert_eq!(layer.pixel(25, 2).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_drawing_outside_bounds_is_clipped() {
        let mut layer = Layer::new(10, 10);
        layer.circle(Point::new(-50.0, -50.0), 10.0, Rgba::BLACK);
        layer.line(Point::new(100.0, 5.0), Point::new(200.0, 5.0), 3.0, Rgba::BLACK);
        assert!(layer.is_blank());
    }

    #[test]
    fn test_flatten_over_is_opaque() {
        let mut layer = Layer::new(8, 8);
        layer.circle(Point::new(4.0, 4.0), 4.0, Rgba::new(0, 0, 255, 128));
        let flat = layer.flatten_over(Rgba::WHITE);

        assert!(flat.pixels().chunks_exact(4).all(|px| px[3] == 255));
        assert_eq!(flat.pixel(0, 0), Some(Rgba::WHITE));
        let center = flat.pixel(4, 4).unwrap();
        assert!(center.b == 255 && center.r < 255);
    }

    #[test]
    fn test_image_with_opacity() {
        let mut source = Layer::new(2, 2);
        source.fill(Rgba::BLACK);
        let mut target = Layer::new(2, 2);
        target.fill(Rgba::WHITE);
        target.image(&source, 0.5);

        let px = target.pixel(0, 0).unwrap();
        assert_eq!(px.a, 255);
        assert!((126..=129).contains(&px.r));
    }

    #[test]
    fn test_image_scales_to_fit() {
        let mut source = Layer::new(1, 1);
        source.fill(Rgba::BLACK);
        let mut target = Layer::new(4, 4);
        target.image(&source, 1.0);
        assert_eq!(target.pixel(3, 3), Some(Rgba::BLACK));
    }
}
