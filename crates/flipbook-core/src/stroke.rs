//! Freehand strokes and their rasterization.

use crate::color::Rgba;
use crate::surface::Surface;
use kurbo::Point;

/// A freehand stroke: a polyline in base space with a fixed color and width.
///
/// A stroke always holds at least one point. A single point renders as a
/// filled dot, more points render as a round-capped polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Color captured when the stroke began.
    pub color: Rgba,
    /// Brush diameter in base pixels.
    pub width: f64,
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `start`.
    pub fn new(start: Point, width: f64, color: Rgba) -> Self {
        Self {
            color,
            width,
            points: vec![start],
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A tap gesture: exactly one point.
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    pub fn last_point(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Append `point` if it is at least `sqrt(min_distance_sq)` away from the
    /// last point. Returns whether the point was kept.
    pub fn push_point(&mut self, point: Point, min_distance_sq: f64) -> bool {
        if point.distance_squared(self.last_point()) < min_distance_sq {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Draw only the newest segment (second-last to last point).
    pub fn draw_last_segment<S: Surface + ?Sized>(&self, surface: &mut S, spacing: f64) {
        if let [.., a, b] = self.points.as_slice() {
            self.draw_segment(surface, *a, *b, spacing);
        }
    }

    /// Draw the dot of a single-point stroke. Does nothing for polylines.
    pub fn draw_dot<S: Surface + ?Sized>(&self, surface: &mut S) {
        if let [p] = self.points.as_slice() {
            surface.circle(*p, self.width, self.color);
        }
    }

    /// Draw the complete stroke exactly as incremental drawing produced it.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, spacing: f64) {
        if self.is_dot() {
            self.draw_dot(surface);
            return;
        }
        for pair in self.points.windows(2) {
            self.draw_segment(surface, pair[0], pair[1], spacing);
        }
    }

    fn draw_segment<S: Surface + ?Sized>(&self, surface: &mut S, a: Point, b: Point, spacing: f64) {
        for (from, to) in subdivide(a, b, spacing) {
            surface.line(from, to, self.width, self.color);
        }
    }
}

/// Number of sub-lines used for a segment of `length`.
pub fn subdivision_steps(length: f64, spacing: f64) -> usize {
    if spacing <= 0.0 || !length.is_finite() {
        return 1;
    }
    ((length / spacing).floor() as usize).max(1)
}

/// Split `a`–`b` into consecutive sub-lines no longer than roughly `spacing`.
pub fn subdivide(a: Point, b: Point, spacing: f64) -> impl Iterator<Item = (Point, Point)> {
    let steps = subdivision_steps(a.distance(b), spacing);
    (1..=steps).map(move |i| {
        let t0 = (i - 1) as f64 / steps as f64;
        let t1 = i as f64 / steps as f64;
        (a.lerp(b, t0), a.lerp(b, t1))
    })
}
