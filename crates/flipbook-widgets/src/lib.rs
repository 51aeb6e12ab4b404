//! Reusable egui widget components for the Flipbook control panel.
//!
//! - **Buttons**: toggle buttons and action buttons with shortcut hints
//! - **Colors**: swatches and the quick color palette
//! - **Layout**: section labels, separators, labeled sliders
//! - **Panel**: the floating panel frame

pub mod buttons;
pub mod colors;
pub mod layout;
pub mod panel;

pub use buttons::{ActionButton, ToggleButton};
pub use colors::{ColorSwatch, PALETTE, colors_match, palette_row};
pub use layout::{LabeledSlider, section_label, separator, status_text};
pub use panel::panel_frame;

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Color swatch diameter
    pub const SWATCH: f32 = 20.0;
    /// Button height
    pub const BUTTON_HEIGHT: f32 = 26.0;
    /// Width of the control panel contents
    pub const PANEL_WIDTH: f32 = 220.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Destructive action color
    pub const DANGER: Color32 = Color32::from_rgb(220, 38, 38);
    /// Recording indicator
    pub const RECORDING: Color32 = Color32::from_rgb(239, 68, 68);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(235, 235, 235);
    /// Idle button background
    pub const BUTTON_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 245);
}
