//! Flipbook Application
//!
//! The desktop shell: window, control panel, input routing and export
//! wiring around the core editor.

mod app;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, CONFIG_ENV, EXPORT_DIR_ENV};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{PanelInfo, UiAction, UiOutput, UiState, render_ui};
