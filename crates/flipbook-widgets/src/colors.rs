//! Color swatches and the quick palette.

use egui::{Color32, CursorIcon, Rect, Sense, Stroke, Ui, vec2};

use crate::{sizing, theme};

/// Quick-pick drawing colors.
pub const PALETTE: &[(&str, Color32)] = &[
    ("Black", Color32::from_rgb(0, 0, 0)),
    ("Gray", Color32::from_rgb(107, 114, 128)),
    ("Red", Color32::from_rgb(239, 68, 68)),
    ("Orange", Color32::from_rgb(249, 115, 22)),
    ("Yellow", Color32::from_rgb(234, 179, 8)),
    ("Green", Color32::from_rgb(34, 197, 94)),
    ("Blue", Color32::from_rgb(59, 130, 246)),
    ("Purple", Color32::from_rgb(168, 85, 247)),
];

/// Check if two colors match, ignoring alpha.
pub fn colors_match(a: Color32, b: Color32) -> bool {
    a.r() == b.r() && a.g() == b.g() && a.b() == b.b()
}

/// A clickable circular color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
}

impl<'a> ColorSwatch<'a> {
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
        }
    }

    /// Set whether this swatch is selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(vec2(sizing::SWATCH, sizing::SWATCH), Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;
            ui.painter().circle_filled(center, radius, self.color);
            ui.painter()
                .circle_stroke(center, radius, Stroke::new(1.0, theme::BORDER));

            if self.selected {
                // Inner ring, white on dark colors so it stays visible.
                let ring = if luminance(self.color) < 0.4 {
                    Color32::WHITE
                } else {
                    Color32::from_gray(30)
                };
                ui.painter()
                    .circle_stroke(center, radius - 3.0, Stroke::new(2.0, ring));
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

/// Show the palette as a row of swatches. Returns the color clicked, if any.
pub fn palette_row(ui: &mut Ui, current: Color32) -> Option<Color32> {
    let mut picked = None;
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        for &(name, color) in PALETTE {
            let (clicked, _) = ColorSwatch::new(color, name)
                .selected(colors_match(color, current))
                .show(ui);
            if clicked {
                picked = Some(color);
            }
        }
    });
    picked
}

/// Relative luminance in 0..=1.
fn luminance(color: Color32) -> f32 {
    (0.2126 * f32::from(color.r()) + 0.7152 * f32::from(color.g()) + 0.0722 * f32::from(color.b())) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_match_ignores_alpha() {
        assert!(colors_match(
            Color32::from_rgba_unmultiplied(10, 20, 30, 255),
            Color32::from_rgba_unmultiplied(10, 20, 30, 255)
        ));
        assert!(!colors_match(Color32::BLACK, Color32::WHITE));
    }

    #[test]
    fn test_palette_starts_with_black() {
        assert_eq!(PALETTE[0].1, Color32::BLACK);
        assert!(luminance(Color32::BLACK) < 0.4);
        assert!(luminance(Color32::WHITE) > 0.9);
    }
}
