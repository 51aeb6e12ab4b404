//! The flipbook editor: one instance owns every piece of session state.
//!
//! The host feeds it pointer events, commands and a render tick with the
//! current time in milliseconds, and reads back a [`View`] to draw.

use crate::capture::{CaptureOptions, CaptureSink, Confirm, StillSink, export_base_name, still_filename};
use crate::color::Rgba;
use crate::config::{EditorConfig, SessionSettings};
use crate::error::{EditorError, EditorResult, Rejection};
use crate::input::{Command, Key, PointerEvent};
use crate::layer::Layer;
use crate::mode::{Mode, ModeError, ModeEvent, ModeMachine};
use crate::recorder::StrokeRecorder;
use crate::sequencer::{Playback, RecordSession, RecordStep};
use crate::status::StatusLine;
use crate::store::{CommitOutcome, LayerStore};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size};
use std::sync::Arc;

const CLEAR_ALL_PROMPT: &str = "You really want to delete all frames?";
const HINT: &str = "ENTER commit · SPACE play · S export GIF · C clear current · Q clear all";
const HINT_HOLD_MS: u64 = 3000;
const LONG_HOLD_MS: u64 = 1800;

/// Collaborators needed by [`Editor::execute`].
pub struct Services<'a> {
    pub capture: &'a mut dyn CaptureSink,
    pub stills: &'a mut dyn StillSink,
    pub confirm: &'a mut dyn Confirm,
}

/// A faded committed frame drawn under the active layer.
#[derive(Debug, Clone, Copy)]
pub struct OnionFrame<'a> {
    pub layer: &'a Layer,
    pub opacity: f64,
}

/// What the canvas should show this frame, in base space.
#[derive(Debug, Clone)]
pub enum View<'a> {
    /// Onion frames (oldest first) under the active layer.
    Draw {
        onion: Vec<OnionFrame<'a>>,
        active: &'a Layer,
    },
    /// A single frame at full opacity (playback or capture).
    Frame(&'a Layer),
}

impl View<'_> {
    /// Number of onion frames in the view.
    pub fn onion_len(&self) -> usize {
        match self {
            View::Draw { onion, .. } => onion.len(),
            View::Frame(_) => 0,
        }
    }
}

pub struct Editor {
    config: EditorConfig,
    settings: SessionSettings,
    viewport: Viewport,
    store: LayerStore,
    recorder: StrokeRecorder,
    mode: ModeMachine,
    playback: Playback,
    recording: Option<RecordSession>,
    status: StatusLine,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let width = config.base_width.max(1);
        let height = config.base_height.max(1);
        let tuning = config.tuning;
        let mut status = StatusLine::default();
        status.set(HINT, HINT_HOLD_MS, 0);

        Self {
            settings: SessionSettings::from(&config),
            viewport: Viewport::new(Size::new(f64::from(width), f64::from(height))),
            store: LayerStore::new(width, height, tuning.commit_cooldown_ms),
            recorder: StrokeRecorder::new(tuning.interp_spacing, tuning.min_point_distance_sq),
            mode: ModeMachine::new(),
            playback: Playback::new(),
            recording: None,
            status,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The running capture, if any.
    pub fn recording(&self) -> Option<&RecordSession> {
        self.recording.as_ref()
    }

    pub fn play_index(&self) -> usize {
        self.playback.index()
    }

    /// Committed frames plus the active layer if it has content.
    pub fn sequence(&self) -> Vec<Arc<Layer>> {
        self.store.sequence()
    }

    /// Status message still held at `now_ms`.
    pub fn status(&self, now_ms: u64) -> &str {
        self.status.visible(now_ms)
    }

    /// `MODE · frames: N · fps: F · brush: B · color: #rrggbb`
    pub fn summary(&self) -> String {
        format!(
            "{} · frames: {} · fps: {} · brush: {} · color: {}",
            self.mode().label(),
            self.store.sequence_len(),
            self.settings.fps(),
            self.settings.brush_width(),
            self.settings.color().to_hex()
        )
    }

    // --- settings and viewport ---

    pub fn set_brush_width(&mut self, width: f64) {
        self.settings.set_brush_width(width);
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.settings.set_fps(fps);
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.settings.set_color(color);
    }

    /// The drawing area changed size on screen. Layers keep their resolution.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    /// Screen rectangle of the control panel; pointer input there is ignored.
    pub fn set_ui_region(&mut self, region: Option<Rect>) {
        self.viewport.set_ui_region(region);
    }

    // --- strokes ---

    /// Route a screen-space pointer event to the stroke recorder.
    ///
    /// Input outside Draw mode or over the control panel is dropped silently.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let over_ui = match event {
            PointerEvent::Down { position, over_ui } | PointerEvent::Move { position, over_ui } => {
                over_ui || self.viewport.is_over_ui(position)
            }
            PointerEvent::Up { .. } => false,
        };
        let point = self.viewport.screen_to_base(event.position());

        let result = match event {
            PointerEvent::Down { .. } if over_ui => return,
            PointerEvent::Down { .. } => {
                self.begin_stroke(point, self.settings.brush_width(), self.settings.color())
            }
            PointerEvent::Move { .. } if over_ui || !self.recorder.is_drawing() => return,
            PointerEvent::Move { .. } => self.extend_stroke(point).map(|_| ()),
            PointerEvent::Up { .. } => self.end_stroke().map(|_| ()),
        };
        if let Err(err) = result {
            log::trace!("Pointer input ignored: {err}");
        }
    }

    /// Open a stroke at a base-space point.
    pub fn begin_stroke(&mut self, point: Point, width: f64, color: Rgba) -> EditorResult<()> {
        self.require_stroke_input()?;
        self.recorder.begin(self.store.active_mut(), point, width, color);
        Ok(())
    }

    /// Add a base-space point to the open stroke. Returns whether it was kept.
    pub fn extend_stroke(&mut self, point: Point) -> EditorResult<bool> {
        self.require_stroke_input()?;
        Ok(self.recorder.extend(self.store.active_mut(), point))
    }

    /// Finish the open stroke. Returns its point count, or `None` if no stroke
    /// was open.
    pub fn end_stroke(&mut self) -> EditorResult<Option<usize>> {
        self.require_stroke_input()?;
        Ok(self.recorder.end(self.store.active_mut()))
    }

    /// Remove the newest stroke from the active layer.
    pub fn undo(&mut self, now_ms: u64) -> EditorResult<()> {
        let result = self.try_undo();
        if result.is_ok() {
            self.status.set("Undo.", self.config.tuning.status_hold_ms, now_ms);
        }
        self.report(result, now_ms)
    }

    fn try_undo(&mut self) -> EditorResult<()> {
        self.require_mode(Mode::Draw)?;
        self.finish_open_stroke();
        if !self.recorder.undo(self.store.active_mut()) {
            return Err(Rejection::NothingToUndo.into());
        }
        Ok(())
    }

    // --- layer store ---

    /// Freeze the active layer into the frame list.
    pub fn commit(&mut self, now_ms: u64) -> EditorResult<CommitOutcome> {
        let result = self.try_commit(now_ms);
        if let Ok(CommitOutcome::Committed { total }) = result {
            log::info!("Committed frame {total}");
            self.status
                .set(format!("Committed. Total frames: {total}"), self.config.tuning.status_hold_ms, now_ms);
        }
        self.report(result, now_ms)
    }

    fn try_commit(&mut self, now_ms: u64) -> EditorResult<CommitOutcome> {
        self.require_mode(Mode::Draw)?;
        self.finish_open_stroke();
        Ok(self.store.commit(now_ms)?)
    }

    /// Remove the most recently committed frame. Returns the remaining count.
    pub fn delete_last(&mut self, now_ms: u64) -> EditorResult<usize> {
        let result = self.try_delete_last();
        if let Ok(remaining) = result {
            log::info!("Deleted last frame, {remaining} left");
            self.status.set(
                format!("Deleted last frame. Total: {remaining}"),
                self.config.tuning.status_hold_ms,
                now_ms,
            );
        }
        self.report(result, now_ms)
    }

    fn try_delete_last(&mut self) -> EditorResult<usize> {
        self.reject_mode(Mode::Record)?;
        let remaining = self.store.delete_last()?;
        self.playback.rewind();
        Ok(remaining)
    }

    /// Discard the active layer. Not allowed while playing.
    pub fn clear_active(&mut self, now_ms: u64) -> EditorResult<()> {
        let result = self.try_clear_active();
        if result.is_ok() {
            self.status
                .set("Cleared current frame.", self.config.tuning.status_hold_ms, now_ms);
        }
        self.report(result, now_ms)
    }

    fn try_clear_active(&mut self) -> EditorResult<()> {
        match self.mode() {
            Mode::Draw => {}
            Mode::Play => return Err(Rejection::ClearDuringPlay.into()),
            Mode::Record => return Err(Rejection::WrongMode { mode: Mode::Record }.into()),
        }
        self.recorder.cancel();
        self.store.clear_active();
        Ok(())
    }

    /// Drop every frame after confirmation and return to Draw.
    ///
    /// Declining leaves frames, active layer and mode untouched.
    pub fn clear_all(&mut self, confirm: &mut dyn Confirm, now_ms: u64) -> EditorResult<()> {
        let result = self.try_clear_all(confirm);
        if result.is_ok() {
            log::info!("Cleared all frames");
            self.status
                .set("Everything cleared.", self.config.tuning.status_hold_ms, now_ms);
        }
        self.report(result, now_ms)
    }

    fn try_clear_all(&mut self, confirm: &mut dyn Confirm) -> EditorResult<()> {
        self.reject_mode(Mode::Record)?;
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            return Err(Rejection::ClearAllDeclined.into());
        }
        self.recorder.cancel();
        self.store.clear_all();
        self.playback.rewind();
        self.mode.apply(ModeEvent::Reset, 0)?;
        Ok(())
    }

    // --- playback and export ---

    /// Switch between Draw and Play. Returns the new mode.
    pub fn toggle_play(&mut self, now_ms: u64) -> EditorResult<Mode> {
        let result = self.try_toggle_play(now_ms);
        if let Ok(mode) = result {
            self.status
                .set(format!("{} mode.", mode.label()), self.config.tuning.status_hold_ms, now_ms);
        }
        self.report(result, now_ms)
    }

    fn try_toggle_play(&mut self, now_ms: u64) -> EditorResult<Mode> {
        self.finish_open_stroke();
        let next = match self.mode.apply(ModeEvent::TogglePlay, self.store.sequence_len()) {
            Ok(next) => next,
            Err(ModeError::EmptySequence) => return Err(Rejection::NothingToPlay.into()),
            Err(err) => return Err(err.into()),
        };
        if next == Mode::Play {
            self.playback.start(now_ms);
        } else {
            self.playback.rewind();
        }
        Ok(next)
    }

    /// Snapshot the sequence and start feeding it to `capture`, one frame per
    /// tick. Returns the number of frames to capture.
    pub fn export_animation(&mut self, capture: &mut dyn CaptureSink, now_ms: u64) -> EditorResult<usize> {
        let result = self.try_export_animation(capture, now_ms);
        if let Ok(total) = result {
            log::info!("Animation export started with {total} frames");
            self.status.set(format!("Exporting GIF… ({total} frames)"), 0, now_ms);
        }
        self.report(result, now_ms)
    }

    fn try_export_animation(&mut self, capture: &mut dyn CaptureSink, now_ms: u64) -> EditorResult<usize> {
        self.reject_mode(Mode::Record)?;
        self.finish_open_stroke();
        let snapshot = self.store.sequence();
        if snapshot.is_empty() {
            return Err(EditorError::EmptySequence);
        }

        let total = snapshot.len();
        let fps = self.settings.fps();
        let tuning = self.config.tuning;
        let Some(session) =
            RecordSession::new(snapshot, tuning.record_warmup_ticks, tuning.capture_delay_ms, now_ms)
        else {
            return Err(EditorError::EmptySequence);
        };

        self.mode.apply(ModeEvent::StartRecord, total)?;
        let options = CaptureOptions {
            fps,
            delay_ms: tuning.capture_delay_ms,
            background: self.config.background,
        };
        if let Err(err) = capture.start(&export_base_name(), total, &options) {
            self.finish_recording(now_ms);
            return Err(err.into());
        }
        self.recording = Some(session);
        self.playback.rewind();
        Ok(total)
    }

    /// Flatten every frame over the background and hand it to `stills`.
    /// Returns the number of files written.
    pub fn export_images(&mut self, stills: &mut dyn StillSink, now_ms: u64) -> EditorResult<usize> {
        let result = self.try_export_images(stills);
        if let Ok(count) = result {
            log::info!("Exported {count} PNG frames");
            self.status.set(format!("Saved {count} PNGs."), LONG_HOLD_MS, now_ms);
        }
        self.report(result, now_ms)
    }

    fn try_export_images(&mut self, stills: &mut dyn StillSink) -> EditorResult<usize> {
        self.reject_mode(Mode::Record)?;
        self.finish_open_stroke();
        let sequence = self.store.sequence();
        if sequence.is_empty() {
            return Err(EditorError::EmptySequence);
        }
        let base = export_base_name();
        for (index, frame) in sequence.iter().enumerate() {
            let flat = frame.flatten_over(self.config.background);
            stills.write_still(&still_filename(&base, index), &flat)?;
        }
        Ok(sequence.len())
    }

    /// Run a command from a button or shortcut. Everything is refused while
    /// recording.
    pub fn execute(&mut self, command: Command, services: &mut Services<'_>, now_ms: u64) -> EditorResult<()> {
        if self.mode() == Mode::Record {
            let err = EditorError::from(Rejection::WrongMode { mode: Mode::Record });
            return self.report(Err(err), now_ms);
        }
        log::debug!("Executing {command:?}");
        match command {
            Command::Commit => self.commit(now_ms).map(|_| ()),
            Command::Undo => self.undo(now_ms),
            Command::TogglePlay => self.toggle_play(now_ms).map(|_| ()),
            Command::DeleteLastFrame => self.delete_last(now_ms).map(|_| ()),
            Command::ClearCurrent => self.clear_active(now_ms),
            Command::ClearAll => self.clear_all(&mut *services.confirm, now_ms),
            Command::ExportAnimation => self.export_animation(&mut *services.capture, now_ms).map(|_| ()),
            Command::ExportImages => self.export_images(&mut *services.stills, now_ms).map(|_| ()),
        }
    }

    /// Run the shortcut bound to `key`, if any. Key repeats must be filtered
    /// by the caller.
    pub fn handle_key(&mut self, key: Key, services: &mut Services<'_>, now_ms: u64) -> Option<EditorResult<()>> {
        let command = Command::from_key(key)?;
        Some(self.execute(command, services, now_ms))
    }

    /// Advance playback or capture by one render tick and pick up encoder
    /// completion.
    pub fn tick(&mut self, now_ms: u64, capture: &mut dyn CaptureSink) {
        match self.mode() {
            Mode::Draw => {}
            Mode::Play => {
                self.playback
                    .tick(now_ms, self.settings.frame_interval_ms(), self.store.sequence_len());
            }
            Mode::Record => self.record_tick(now_ms, capture),
        }

        match capture.poll_completion() {
            Some(Ok(name)) => {
                log::info!("Saved {name}");
                self.status.set(format!("Saved {name}"), LONG_HOLD_MS, now_ms);
            }
            Some(Err(err)) => {
                let _ = self.report::<()>(Err(err.into()), now_ms);
            }
            None => {}
        }
    }

    fn record_tick(&mut self, now_ms: u64, capture: &mut dyn CaptureSink) {
        let Some(session) = self.recording.as_mut() else {
            log::warn!("Record mode without a capture session");
            self.finish_recording(now_ms);
            return;
        };

        let step = session.tick(now_ms);
        let (done, total) = (session.frames_done(), session.total_frames());
        let RecordStep::Captured { frame, index, finished } = step else {
            return;
        };

        if let Err(err) = capture.push_frame(&frame) {
            log::warn!("Encoder refused frame {index}");
            self.finish_recording(now_ms);
            let _ = self.report::<()>(Err(err.into()), now_ms);
        } else if finished {
            self.finish_recording(now_ms);
            self.status.set("GIF capture finished, encoding…", 0, now_ms);
        } else {
            log::trace!("Captured {done}/{total}");
            self.status.set(format!("Recording GIF… {done}/{total}"), 0, now_ms);
        }
    }

    /// Drop the capture session and restore the pre-export mode. Playback
    /// resumes from frame 0 with its clock reset to `now_ms`.
    fn finish_recording(&mut self, now_ms: u64) {
        self.recording = None;
        if let Err(err) = self.mode.apply(ModeEvent::RecordFinished, 0) {
            log::warn!("Could not leave record mode: {err}");
        }
        if self.mode() == Mode::Play {
            self.playback.start(now_ms);
        }
    }

    /// What to draw this frame.
    pub fn view(&self) -> View<'_> {
        match self.mode() {
            Mode::Draw => View::Draw {
                onion: self.onion_frames(),
                active: self.store.active().layer(),
            },
            Mode::Play => {
                let len = self.store.sequence_len();
                let frame = if len == 0 {
                    None
                } else {
                    self.store.frame(self.playback.index() % len)
                };
                View::Frame(frame.unwrap_or_else(|| self.store.active().layer()))
            }
            Mode::Record => match self.recording.as_ref().and_then(RecordSession::presented) {
                Some(frame) => View::Frame(frame.as_ref()),
                None => View::Frame(self.store.active().layer()),
            },
        }
    }

    fn onion_frames(&self) -> Vec<OnionFrame<'_>> {
        let onion = self.config.onion;
        let committed = self.store.committed();
        let shown = onion.count.min(committed.len());
        committed[committed.len() - shown..]
            .iter()
            .enumerate()
            .map(|(i, layer)| OnionFrame {
                layer: layer.as_ref(),
                opacity: onion.opacity(shown - 1 - i),
            })
            .collect()
    }

    // --- helpers ---

    fn require_mode(&self, mode: Mode) -> Result<(), Rejection> {
        let current = self.mode();
        if current == mode {
            Ok(())
        } else {
            Err(Rejection::WrongMode { mode: current })
        }
    }

    fn require_stroke_input(&self) -> Result<(), Rejection> {
        let current = self.mode();
        if current.accepts_strokes() {
            Ok(())
        } else {
            Err(Rejection::WrongMode { mode: current })
        }
    }

    fn reject_mode(&self, mode: Mode) -> Result<(), Rejection> {
        if self.mode() == mode {
            Err(Rejection::WrongMode { mode })
        } else {
            Ok(())
        }
    }

    /// Close an open stroke so history matches the pixels.
    fn finish_open_stroke(&mut self) {
        if self.recorder.is_drawing() {
            self.recorder.end(self.store.active_mut());
        }
    }

    /// Log a failed operation and show it on the status line.
    fn report<T>(&mut self, result: EditorResult<T>, now_ms: u64) -> EditorResult<T> {
        if let Err(err) = &result {
            match err {
                EditorError::Encoder(_) => log::warn!("{err}"),
                _ => log::debug!("Rejected: {err}"),
            }
            self.status.set(err.to_string(), self.config.tuning.status_hold_ms, now_ms);
        }
        result
    }
}
