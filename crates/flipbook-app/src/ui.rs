//! Control panel using egui.

use egui::{Align2, Color32, Context, Rect, Vec2};
use flipbook_core::config::{BRUSH_WIDTH_RANGE, FPS_RANGE};
use flipbook_core::{Command, Mode, Rgba};
use flipbook_widgets::{
    ActionButton, LabeledSlider, ToggleButton, palette_row, panel_frame, section_label, separator, sizing,
    status_text,
};

use crate::shortcuts::ShortcutRegistry;

/// Widget-side copies of the session settings.
#[derive(Debug, Clone)]
pub struct UiState {
    pub brush_width: f64,
    pub fps: u32,
    pub color: Color32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            brush_width: 6.0,
            fps: 12,
            color: Color32::BLACK,
        }
    }
}

/// Read-only facts the panel displays.
pub struct PanelInfo<'a> {
    pub mode: Mode,
    pub summary: &'a str,
    pub status: &'a str,
    pub frame_count: usize,
    pub has_strokes: bool,
}

/// Actions triggered by the control panel.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SetBrushWidth(f64),
    SetFps(u32),
    SetColor(Color32),
    Run(Command),
}

/// What the panel produced this frame.
pub struct UiOutput {
    pub action: Option<UiAction>,
    /// Screen rectangle covered by the panel.
    pub panel_rect: Rect,
}

pub fn to_rgba(color: Color32) -> Rgba {
    Rgba::from(color.to_srgba_unmultiplied())
}

pub fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Render the control panel and return any triggered action.
pub fn render_ui(ctx: &Context, state: &mut UiState, info: &PanelInfo<'_>) -> UiOutput {
    let mut action = None;
    let editing = info.mode == Mode::Draw;
    let idle = info.mode != Mode::Record;

    let response = egui::Area::new(egui::Id::new("controls"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(sizing::PANEL_WIDTH);
                ui.spacing_mut().item_spacing = Vec2::new(4.0, 4.0);

                status_text(ui, info.summary, info.mode == Mode::Record);
                separator(ui);

                if LabeledSlider::new("Brush", &mut state.brush_width, BRUSH_WIDTH_RANGE.0..=BRUSH_WIDTH_RANGE.1)
                    .suffix(" px")
                    .show(ui)
                {
                    action = Some(UiAction::SetBrushWidth(state.brush_width));
                }
                if LabeledSlider::new("Speed", &mut state.fps, FPS_RANGE.0..=FPS_RANGE.1)
                    .suffix(" fps")
                    .enabled(idle)
                    .show(ui)
                {
                    action = Some(UiAction::SetFps(state.fps));
                }

                section_label(ui, "Color");
                if let Some(color) = palette_row(ui, state.color) {
                    state.color = color;
                    action = Some(UiAction::SetColor(color));
                }
                ui.horizontal(|ui| {
                    if egui::color_picker::color_edit_button_srgba(
                        ui,
                        &mut state.color,
                        egui::color_picker::Alpha::OnlyBlend,
                    )
                    .changed()
                    {
                        action = Some(UiAction::SetColor(state.color));
                    }
                    section_label(ui, "Custom");
                });
                separator(ui);

                ui.horizontal(|ui| {
                    let playing = info.mode == Mode::Play;
                    let label = if playing { "Pause" } else { "Play" };
                    if ToggleButton::new(label, playing).min_width(70.0).show(ui) && idle {
                        action = Some(UiAction::Run(Command::TogglePlay));
                    }
                    let recording = info.mode == Mode::Record;
                    let label = if recording { "Recording…" } else { "Export GIF" };
                    if ToggleButton::new(label, recording).min_width(100.0).show(ui) && idle {
                        action = Some(UiAction::Run(Command::ExportAnimation));
                    }
                });

                let buttons = [
                    (Command::Commit, editing),
                    (Command::Undo, editing && info.has_strokes),
                    (Command::DeleteLastFrame, idle && info.frame_count > 0),
                    (Command::ClearCurrent, editing),
                    (Command::ExportImages, idle && info.frame_count > 0),
                    (Command::ClearAll, idle),
                ];
                for (command, enabled) in buttons {
                    let hint = ShortcutRegistry::hint(command);
                    let mut button = ActionButton::new(command.label()).enabled(enabled);
                    if let Some(hint) = hint.as_deref() {
                        button = button.shortcut(hint);
                    }
                    if command == Command::ClearAll {
                        button = button.danger();
                    }
                    if button.show(ui) {
                        action = Some(UiAction::Run(command));
                    }
                }

                if !info.status.is_empty() {
                    separator(ui);
                    status_text(ui, info.status, false);
                }
            });
        });

    UiOutput {
        action,
        panel_rect: response.response.rect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion() {
        let rgba = Rgba::new(10, 200, 30, 128);
        assert_eq!(to_rgba(to_color32(rgba)).a, 128);
        assert_eq!(to_rgba(Color32::BLACK), Rgba::BLACK);
        assert_eq!(to_color32(Rgba::WHITE), Color32::WHITE);
    }
}
