//! Captures pointer input into strokes on the active layer.

use crate::color::Rgba;
use crate::store::ActiveLayer;
use crate::stroke::Stroke;
use kurbo::Point;

/// Turns pointer samples into strokes, drawing them incrementally.
///
/// Gating by mode and UI region is the caller's job; the recorder only deals
/// with geometry and history.
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    open: Option<Stroke>,
    interp_spacing: f64,
    min_point_distance_sq: f64,
}

impl StrokeRecorder {
    pub fn new(interp_spacing: f64, min_point_distance_sq: f64) -> Self {
        Self {
            open: None,
            interp_spacing,
            min_point_distance_sq,
        }
    }

    /// The stroke currently being drawn, if any.
    pub fn open_stroke(&self) -> Option<&Stroke> {
        self.open.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.open.is_some()
    }

    /// Open a new stroke at `point`. A stroke still open is finished first.
    pub fn begin(&mut self, active: &mut ActiveLayer, point: Point, width: f64, color: Rgba) {
        if self.open.is_some() {
            self.end(active);
        }
        self.open = Some(Stroke::new(point, width, color));
    }

    /// Append a sample and draw only the newly added segment.
    ///
    /// Returns false when there is no open stroke or the sample was too close
    /// to the previous point.
    pub fn extend(&mut self, active: &mut ActiveLayer, point: Point) -> bool {
        let Some(stroke) = self.open.as_mut() else {
            return false;
        };
        if !stroke.push_point(point, self.min_point_distance_sq) {
            return false;
        }
        stroke.draw_last_segment(active.draw_target(), self.interp_spacing);
        true
    }

    /// Close the open stroke and move it into the layer's history.
    ///
    /// A single-point stroke is drawn as a dot here. Returns the number of
    /// points in the finished stroke.
    pub fn end(&mut self, active: &mut ActiveLayer) -> Option<usize> {
        let stroke = self.open.take()?;
        if stroke.is_dot() {
            stroke.draw_dot(active.draw_target());
        }
        let len = stroke.len();
        active.push_stroke(stroke);
        Some(len)
    }

    /// Drop the open stroke without recording it.
    pub fn cancel(&mut self) {
        self.open = None;
    }

    /// Remove the newest stroke and rebuild the layer from the remaining ones.
    ///
    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self, active: &mut ActiveLayer) -> bool {
        if active.pop_stroke().is_none() {
            return false;
        }
        active.rebuild(self.interp_spacing);
        true
    }
}
