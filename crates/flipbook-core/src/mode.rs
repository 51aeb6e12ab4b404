//! Draw / play / record mode state machine.
//!
//! All legal transitions are decided by [`next_mode`]; the rest of the editor
//! only asks [`ModeMachine`] to apply events.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Editing the active layer, onion skins visible.
    #[default]
    Draw,
    /// Looping the frame sequence on screen.
    Play,
    /// Feeding the sequence snapshot to the animation encoder.
    Record,
}

impl Mode {
    /// Label used in the status line.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Draw => "DRAW",
            Mode::Play => "PLAY",
            Mode::Record => "RECORDING",
        }
    }

    /// Whether stroke editing is accepted in this mode.
    pub fn accepts_strokes(self) -> bool {
        self == Mode::Draw
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Draw => "DRAW",
            Mode::Play => "PLAY",
            Mode::Record => "RECORD",
        })
    }
}

/// Events that may change the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeEvent {
    /// Play/pause button or Space.
    TogglePlay,
    /// Animated export requested.
    StartRecord,
    /// The export sequencer finished or the encoder failed.
    RecordFinished,
    /// Confirmed clear-all.
    Reset,
}

impl fmt::Display for ModeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModeEvent::TogglePlay => "toggle play",
            ModeEvent::StartRecord => "start record",
            ModeEvent::RecordFinished => "record finished",
            ModeEvent::Reset => "reset",
        })
    }
}

/// Transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("Cannot {event} while in {from} mode.")]
    Illegal { from: Mode, event: ModeEvent },
    #[error("The frame sequence is empty.")]
    EmptySequence,
}

/// The transition table.
///
/// `resume` is the mode remembered when recording started; it is only
/// consulted for [`ModeEvent::RecordFinished`].
pub fn next_mode(
    from: Mode,
    event: ModeEvent,
    sequence_len: usize,
    resume: Option<Mode>,
) -> Result<Mode, ModeError> {
    use Mode::*;
    use ModeEvent::*;

    match (from, event) {
        (Draw, TogglePlay) if sequence_len == 0 => Err(ModeError::EmptySequence),
        (Draw, TogglePlay) => Ok(Play),
        (Play, TogglePlay) => Ok(Draw),
        (Draw | Play, StartRecord) if sequence_len == 0 => Err(ModeError::EmptySequence),
        (Draw | Play, StartRecord) => Ok(Record),
        (Record, RecordFinished) => Ok(match resume {
            Some(Play) => Play,
            _ => Draw,
        }),
        (Draw | Play, Reset) => Ok(Draw),
        (from, event) => Err(ModeError::Illegal { from, event }),
    }
}

/// Current mode plus the mode to restore after recording.
#[derive(Debug, Clone, Default)]
pub struct ModeMachine {
    current: Mode,
    resume: Option<Mode>,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    /// Mode that will be restored when the running capture ends.
    pub fn resume_mode(&self) -> Option<Mode> {
        self.resume
    }

    /// Apply an event, updating the mode atomically. Returns the new mode.
    pub fn apply(&mut self, event: ModeEvent, sequence_len: usize) -> Result<Mode, ModeError> {
        let next = next_mode(self.current, event, sequence_len, self.resume)?;
        match event {
            ModeEvent::StartRecord => self.resume = Some(self.current),
            ModeEvent::RecordFinished => self.resume = None,
            _ => {}
        }
        log::debug!("Mode {} -> {} on {}", self.current, next, event);
        self.current = next;
        Ok(next)
    }
}
