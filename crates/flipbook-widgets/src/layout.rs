//! Layout helpers: separators, section labels, sliders, status text.

use egui::{Color32, RichText, Stroke, Ui};
use std::ops::RangeInclusive;

use crate::{sizing, theme};

/// Draw a horizontal separator line.
pub fn separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let y = rect.top() + 4.0;
    ui.painter().line_segment(
        [egui::Pos2::new(rect.left(), y), egui::Pos2::new(rect.right(), y)],
        Stroke::new(1.0, Color32::from_gray(230)),
    );
    ui.add_space(8.0);
}

/// Draw a section label (small, muted text).
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_MUTED));
}

/// Wrapped status text; `highlight` draws it in the recording color.
pub fn status_text(ui: &mut Ui, text: &str, highlight: bool) {
    let color = if highlight { theme::RECORDING } else { theme::TEXT };
    ui.add(egui::Label::new(RichText::new(text).size(11.0).color(color)).wrap());
}

/// A slider with a label above it and the current value on the right.
pub struct LabeledSlider<'a, T: egui::emath::Numeric> {
    label: &'a str,
    value: &'a mut T,
    range: RangeInclusive<T>,
    suffix: &'a str,
    enabled: bool,
}

impl<'a, T: egui::emath::Numeric> LabeledSlider<'a, T> {
    pub fn new(label: &'a str, value: &'a mut T, range: RangeInclusive<T>) -> Self {
        Self {
            label,
            value,
            range,
            suffix: "",
            enabled: true,
        }
    }

    /// Unit appended to the displayed value.
    pub fn suffix(mut self, suffix: &'a str) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the slider and return true if the value changed.
    pub fn show(self, ui: &mut Ui) -> bool {
        section_label(ui, self.label);
        let slider = egui::Slider::new(self.value, self.range)
            .integer()
            .suffix(self.suffix)
            .trailing_fill(true);
        ui.spacing_mut().slider_width = sizing::PANEL_WIDTH - 60.0;
        ui.add_enabled(self.enabled, slider).changed()
    }
}
