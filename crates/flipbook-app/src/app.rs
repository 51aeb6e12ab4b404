//! Main application state and eframe integration.

use crate::shortcuts::ShortcutRegistry;
use crate::ui::{PanelInfo, UiAction, UiState, render_ui, to_color32, to_rgba};
use egui::{Color32, ColorImage, Context, Rect, Sense, TextureHandle, TextureOptions};
use flipbook_core::{Command, Confirm, Editor, EditorConfig, Key, Mode, PointerEvent, Services};
use flipbook_render::{
    CpuRenderer, DirectorySink, FileSink, GifCapture, MemorySink, PngSequenceWriter, RenderContext, Renderer,
};
use kurbo::Point;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "FLIPBOOK_CONFIG";
/// Environment variable overriding the export directory.
pub const EXPORT_DIR_ENV: &str = "FLIPBOOK_EXPORT_DIR";

const DEFAULT_CONFIG_FILE: &str = "flipbook.json";
const DEFAULT_EXPORT_DIR: &str = "exports";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub editor: EditorConfig,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Flipbook".to_string(),
            width: 1280,
            height: 800,
            editor: EditorConfig::default(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

impl AppConfig {
    /// Build the configuration from `flipbook.json` (or `$FLIPBOOK_CONFIG`)
    /// and `$FLIPBOOK_EXPORT_DIR`. A broken config file falls back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if path.exists() {
            match EditorConfig::load(&path) {
                Ok(editor) => {
                    log::info!("Loaded config from {}", path.display());
                    config.editor = editor;
                }
                Err(e) => log::warn!("Ignoring config {}: {}", path.display(), e),
            }
        }

        if let Some(dir) = std::env::var_os(EXPORT_DIR_ENV) {
            config.export_dir = PathBuf::from(dir);
        }
        config
    }
}

/// Open the export directory, keeping exports in memory if it cannot be created.
fn export_sink(dir: &Path) -> Arc<dyn FileSink> {
    match DirectorySink::new(dir) {
        Ok(sink) => {
            log::info!("Exporting to {}", sink.base_path().display());
            Arc::new(sink)
        }
        Err(e) => {
            log::error!("{e}; exports will not be written to disk");
            Arc::new(MemorySink::new())
        }
    }
}

/// Yes/no confirmation through a native dialog.
struct DialogConfirm;

impl Confirm for DialogConfirm {
    #[cfg(feature = "native")]
    fn confirm(&mut self, prompt: &str) -> bool {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Flipbook")
            .set_description(prompt)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes
    }

    #[cfg(not(feature = "native"))]
    fn confirm(&mut self, prompt: &str) -> bool {
        log::warn!("No dialog backend, declining: {prompt}");
        false
    }
}

/// The Flipbook application.
pub struct App {
    editor: Editor,
    renderer: CpuRenderer,
    texture: Option<TextureHandle>,
    gif: GifCapture,
    stills: PngSequenceWriter,
    confirm: DialogConfirm,
    ui_state: UiState,
    started: Instant,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self, flipbook_render::RenderError> {
        let editor = Editor::new(config.editor.clone());
        let base = editor.viewport().base_size();
        let renderer = CpuRenderer::new(base.width as u32, base.height as u32)?;
        let sink = export_sink(&config.export_dir);

        let settings = editor.settings();
        let ui_state = UiState {
            brush_width: settings.brush_width(),
            fps: settings.fps(),
            color: to_color32(settings.color()),
        };

        Ok(Self {
            renderer,
            texture: None,
            gif: GifCapture::new(Arc::clone(&sink)),
            stills: PngSequenceWriter::new(sink),
            confirm: DialogConfirm,
            ui_state,
            started: Instant::now(),
            editor,
        })
    }

    /// Run the native event loop.
    pub fn run(config: AppConfig) -> eframe::Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([config.width as f32, config.height as f32])
                .with_min_inner_size([480.0, 320.0])
                .with_title(config.title.clone()),
            ..Default::default()
        };

        eframe::run_native(
            "Flipbook",
            options,
            Box::new(move |_cc| {
                let app = App::new(&config)?;
                Ok(Box::new(app))
            }),
        )
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn run_command(&mut self, command: Command, now: u64) {
        let mut services = Services {
            capture: &mut self.gif,
            stills: &mut self.stills,
            confirm: &mut self.confirm,
        };
        // Failures are already on the status line.
        let _ = self.editor.execute(command, &mut services, now);
    }

    fn handle_keys(&mut self, ctx: &Context, now: u64) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let keys: Vec<Key> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } if !modifiers.command && !modifiers.alt => ShortcutRegistry::map_key(*key),
                    _ => None,
                })
                .collect()
        });

        for key in keys {
            if let Some(command) = Command::from_key(key) {
                self.run_command(command, now);
            }
        }
    }

    fn apply_ui_action(&mut self, action: UiAction, now: u64) {
        match action {
            UiAction::SetBrushWidth(width) => self.editor.set_brush_width(width),
            UiAction::SetFps(fps) => self.editor.set_fps(fps),
            UiAction::SetColor(color) => self.editor.set_color(to_rgba(color)),
            UiAction::Run(command) => self.run_command(command, now),
        }
    }

    /// Translate raw pointer state over the canvas into editor pointer events.
    fn handle_pointer(&mut self, ctx: &Context, canvas: Rect, hovered: bool) {
        let pointer = ctx.input(|i| i.pointer.clone());
        let Some(pos) = pointer.interact_pos() else {
            return;
        };
        let position = Point::new(f64::from(pos.x - canvas.min.x), f64::from(pos.y - canvas.min.y));
        let over_ui = !hovered;

        if pointer.primary_pressed() {
            self.editor.handle_pointer(PointerEvent::Down { position, over_ui });
        } else if pointer.primary_down() && pointer.delta() != egui::Vec2::ZERO {
            self.editor.handle_pointer(PointerEvent::Move { position, over_ui });
        }
        if pointer.primary_released() {
            self.editor.handle_pointer(PointerEvent::Up { position });
        }
    }

    fn upload_frame(&mut self, ctx: &Context) -> egui::TextureId {
        let view = self.editor.view();
        let background = self.editor.config().background;
        self.renderer
            .build_frame(&RenderContext::new(&view).with_background(background));

        let frame = self.renderer.frame();
        let size = self.renderer.size();
        let image = ColorImage::from_rgba_unmultiplied([size.width as usize, size.height as usize], frame.pixels());
        match &mut self.texture {
            Some(texture) => {
                texture.set(image, TextureOptions::LINEAR);
                texture.id()
            }
            None => {
                let texture = ctx.load_texture("flipbook-canvas", image, TextureOptions::LINEAR);
                let id = texture.id();
                self.texture = Some(texture);
                id
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = self.now_ms();
        self.handle_keys(ctx, now);

        // Control panel
        let settings = self.editor.settings();
        self.ui_state.brush_width = settings.brush_width();
        self.ui_state.fps = settings.fps();
        let summary = self.editor.summary();
        let status = self.editor.status(now).to_string();
        let info = PanelInfo {
            mode: self.editor.mode(),
            summary: &summary,
            status: &status,
            frame_count: self.editor.store().sequence_len(),
            has_strokes: !self.editor.store().active().strokes().is_empty(),
        };
        let output = render_ui(ctx, &mut self.ui_state, &info);
        if let Some(action) = output.action {
            self.apply_ui_action(action, now);
        }

        // Canvas
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::WHITE))
            .show(ctx, |ui| {
                let canvas = ui.max_rect();
                self.editor
                    .resize_viewport(f64::from(canvas.width()), f64::from(canvas.height()));
                let panel = output.panel_rect.translate(-canvas.min.to_vec2());
                self.editor.set_ui_region(Some(kurbo::Rect::new(
                    f64::from(panel.min.x),
                    f64::from(panel.min.y),
                    f64::from(panel.max.x),
                    f64::from(panel.max.y),
                )));

                let response = ui.allocate_rect(canvas, Sense::drag());
                self.handle_pointer(ctx, canvas, response.contains_pointer());

                self.editor.tick(now, &mut self.gif);

                let texture = self.upload_frame(ctx);
                ui.painter().image(
                    texture,
                    canvas,
                    Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            });

        if self.editor.mode() != Mode::Draw || self.gif.is_busy() {
            ctx.request_repaint();
        } else if !self.editor.status(now).is_empty() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
