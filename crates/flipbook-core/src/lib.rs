//! Flipbook Core Library
//!
//! Frame model, stroke recording, playback and export sequencing for the
//! Flipbook editor. Platform-agnostic: time comes in as milliseconds and all
//! encoders and dialogs are reached through traits.

pub mod capture;
pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod layer;
pub mod mode;
pub mod recorder;
pub mod sequencer;
pub mod status;
pub mod store;
pub mod stroke;
pub mod surface;
pub mod viewport;

pub use capture::{CaptureOptions, CaptureSink, Confirm, EncoderError, StillSink};
pub use color::Rgba;
pub use config::{ConfigError, EditorConfig, OnionSkin, SessionSettings, Tuning};
pub use editor::{Editor, OnionFrame, Services, View};
pub use error::{EditorError, EditorResult, Rejection};
pub use input::{Command, Key, PointerEvent};
pub use layer::Layer;
pub use mode::{Mode, ModeError, ModeEvent, ModeMachine, next_mode};
pub use recorder::StrokeRecorder;
pub use sequencer::{Playback, RecordSession, RecordStep};
pub use status::StatusLine;
pub use store::{ActiveLayer, CommitOutcome, LayerStore};
pub use stroke::Stroke;
pub use surface::Surface;
pub use viewport::Viewport;
