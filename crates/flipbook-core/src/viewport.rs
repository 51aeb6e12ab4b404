//! Mapping between the on-screen viewport and base space.

use kurbo::{Point, Rect, Size};

/// Viewport manages the linear transform from screen coordinates to the fixed
/// base space all layers live in.
///
/// Layers are never re-rasterized on resize; only the mapping changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Fixed layer resolution.
    base: Size,
    /// Current on-screen size of the drawing area.
    screen: Size,
    /// Screen-space rectangle covered by the control panel.
    ui_region: Option<Rect>,
}

impl Viewport {
    /// Create a viewport whose screen size initially equals the base size.
    pub fn new(base: Size) -> Self {
        let base = Size::new(base.width.max(1.0), base.height.max(1.0));
        Self {
            base,
            screen: base,
            ui_region: None,
        }
    }

    pub fn base_size(&self) -> Size {
        self.base
    }

    pub fn screen_size(&self) -> Size {
        self.screen
    }

    /// Update the on-screen size (window resize).
    pub fn resize(&mut self, width: f64, height: f64) {
        self.screen = Size::new(width, height);
    }

    /// Set the rectangle in which pointer input must be ignored.
    pub fn set_ui_region(&mut self, region: Option<Rect>) {
        self.ui_region = region;
    }

    pub fn ui_region(&self) -> Option<Rect> {
        self.ui_region
    }

    /// Whether a screen point lies inside the control panel.
    pub fn is_over_ui(&self, screen_point: Point) -> bool {
        self.ui_region.is_some_and(|r| r.contains(screen_point))
    }

    /// Convert a screen point to base space.
    pub fn screen_to_base(&self, screen_point: Point) -> Point {
        Point::new(
            screen_point.x / self.screen.width.max(1.0) * self.base.width,
            screen_point.y / self.screen.height.max(1.0) * self.base.height,
        )
    }
}
