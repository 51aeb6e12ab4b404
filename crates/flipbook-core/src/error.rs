//! Editor error taxonomy.
//!
//! Nothing here is fatal: every error is reported on the status line and the
//! session continues.

use crate::capture::EncoderError;
use crate::mode::{Mode, ModeError};
use thiserror::Error;

/// Input the editor refused to act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Current frame is empty, nothing committed.")]
    EmptyLayer,
    #[error("Nothing to undo.")]
    NothingToUndo,
    #[error("No committed frames to delete.")]
    NoCommittedFrames,
    #[error("Stop PLAY to clear current.")]
    ClearDuringPlay,
    #[error("Clear all cancelled.")]
    ClearAllDeclined,
    #[error("Nothing to play.")]
    NothingToPlay,
    #[error("Not available in {mode} mode.")]
    WrongMode { mode: Mode },
    #[error("{0}")]
    Transition(#[from] ModeError),
}

/// Editor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("No frames to export.")]
    EmptySequence,
    #[error("Export failed: {0}")]
    Encoder(#[from] EncoderError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

impl From<ModeError> for EditorError {
    fn from(err: ModeError) -> Self {
        EditorError::Rejected(Rejection::Transition(err))
    }
}
