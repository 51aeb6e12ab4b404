//! Button components: toggle buttons and action buttons.

use egui::{Align2, Color32, CornerRadius, CursorIcon, Pos2, Sense, Ui, vec2};

use crate::{sizing, theme};

/// A toggle button with text label.
/// Uses solid blue background when selected.
pub struct ToggleButton<'a> {
    label: &'a str,
    selected: bool,
    min_width: Option<f32>,
    font_size: f32,
}

impl<'a> ToggleButton<'a> {
    /// Create a new toggle button.
    pub fn new(label: &'a str, selected: bool) -> Self {
        Self {
            label,
            selected,
            min_width: None,
            font_size: 12.0,
        }
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = egui::FontId::proportional(self.font_size);
        let galley = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
        let text_width = galley.size().x + 16.0;
        let width = self.min_width.unwrap_or(text_width).max(text_width);

        let (rect, response) = ui.allocate_exact_size(vec2(width, sizing::BUTTON_HEIGHT), Sense::click());

        if ui.is_rect_visible(rect) {
            let (bg_color, text_color) = if self.selected {
                (theme::ACCENT, Color32::WHITE)
            } else if response.hovered() {
                (theme::HOVER_BG, Color32::from_gray(80))
            } else {
                (theme::BUTTON_BG, Color32::from_gray(80))
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = response.clicked();
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A full-width action button with an optional shortcut hint.
pub struct ActionButton<'a> {
    label: &'a str,
    shortcut: Option<&'a str>,
    enabled: bool,
    danger: bool,
}

impl<'a> ActionButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            shortcut: None,
            enabled: true,
            danger: false,
        }
    }

    /// Add a shortcut hint.
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Draw the label in the destructive color.
    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }

    /// Show the button and return true if clicked while enabled.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(ui.available_width(), sizing::BUTTON_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.enabled && response.hovered() {
                theme::HOVER_BG
            } else {
                theme::BUTTON_BG
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

            let text_color = match (self.enabled, self.danger) {
                (false, _) => Color32::from_gray(180),
                (true, true) => theme::DANGER,
                (true, false) => theme::TEXT,
            };
            ui.painter().text(
                Pos2::new(rect.left() + 8.0, rect.center().y),
                Align2::LEFT_CENTER,
                self.label,
                egui::FontId::proportional(12.0),
                text_color,
            );

            if let Some(shortcut) = self.shortcut {
                ui.painter().text(
                    Pos2::new(rect.right() - 8.0, rect.center().y),
                    Align2::RIGHT_CENTER,
                    shortcut,
                    egui::FontId::proportional(11.0),
                    theme::TEXT_MUTED,
                );
            }
        }

        let clicked = response.clicked();
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        self.enabled && clicked
    }
}
