//! Timed walks over the frame sequence: on-screen looping and export capture.

use crate::layer::Layer;
use std::sync::Arc;

/// Looping playback position.
#[derive(Debug, Clone, Default)]
pub struct Playback {
    index: usize,
    last_tick_ms: u64,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from the first frame, timing from `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.index = 0;
        self.last_tick_ms = now_ms;
    }

    /// Jump back to the first frame without touching the tick clock.
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Current frame index (always `< len` after a tick with `len > 0`).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance by one frame if at least `interval_ms` has passed since the
    /// last advance. Returns the (possibly unchanged) index.
    pub fn tick(&mut self, now_ms: u64, interval_ms: f64, len: usize) -> usize {
        if len == 0 {
            self.index = 0;
            return 0;
        }
        if self.index >= len {
            self.index %= len;
        }
        let elapsed = now_ms.saturating_sub(self.last_tick_ms) as f64;
        if elapsed >= interval_ms {
            self.last_tick_ms = now_ms;
            self.index = (self.index + 1) % len;
        }
        self.index
    }
}

/// What happened on one capture tick.
#[derive(Debug, Clone)]
pub enum RecordStep {
    /// Frame presented but not counted (capture pipeline still warming up).
    Warmup { frame: Arc<Layer> },
    /// Frame presented and counted; it must be fed to the encoder.
    Captured {
        frame: Arc<Layer>,
        index: usize,
        finished: bool,
    },
}

/// A running animation export over a fixed sequence snapshot.
#[derive(Debug, Clone)]
pub struct RecordSession {
    snapshot: Vec<Arc<Layer>>,
    warmup_remaining: u32,
    started_ms: u64,
    delay_ms: u64,
    frames_done: usize,
    presented: Option<Arc<Layer>>,
}

impl RecordSession {
    /// Start capturing `snapshot`; later edits to the editor do not affect it.
    ///
    /// Returns `None` for an empty snapshot.
    pub fn new(snapshot: Vec<Arc<Layer>>, warmup_ticks: u32, delay_ms: u64, now_ms: u64) -> Option<Self> {
        if snapshot.is_empty() {
            return None;
        }
        Some(Self {
            snapshot,
            warmup_remaining: warmup_ticks,
            started_ms: now_ms,
            delay_ms,
            frames_done: 0,
            presented: None,
        })
    }

    pub fn total_frames(&self) -> usize {
        self.snapshot.len()
    }

    pub fn frames_done(&self) -> usize {
        self.frames_done
    }

    pub fn is_finished(&self) -> bool {
        self.frames_done >= self.snapshot.len()
    }

    /// Frame shown by the latest tick.
    pub fn presented(&self) -> Option<&Arc<Layer>> {
        self.presented.as_ref()
    }

    /// Present the next frame. Counting starts once the warm-up ticks are
    /// used up and the start delay has elapsed.
    pub fn tick(&mut self, now_ms: u64) -> RecordStep {
        let index = self.frames_done % self.snapshot.len();
        let frame = Arc::clone(&self.snapshot[index]);
        self.presented = Some(Arc::clone(&frame));

        let delay_pending = now_ms.saturating_sub(self.started_ms) < self.delay_ms;
        if self.warmup_remaining > 0 || delay_pending {
            self.warmup_remaining = self.warmup_remaining.saturating_sub(1);
            return RecordStep::Warmup { frame };
        }

        self.frames_done += 1;
        RecordStep::Captured {
            frame,
            index,
            finished: self.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<Arc<Layer>> {
        (0..n).map(|i| Arc::new(Layer::new(i as u32 + 1, 1))).collect()
    }

    #[test]
    fn test_playback_interval() {
        let mut playback = Playback::new();
        playback.start(0);
        assert_eq!(playback.tick(50, 100.0, 3), 0);
        assert_eq!(playback.tick(100, 100.0, 3), 1);
        assert_eq!(playback.tick(150, 100.0, 3), 1);
        assert_eq!(playback.tick(200, 100.0, 3), 2);
        assert_eq!(playback.tick(300, 100.0, 3), 0);
    }

    #[test]
    fn test_playback_measures_from_last_advance() {
        let mut playback = Playback::new();
        playback.start(0);
        // A late tick does not make the next one early.
        assert_eq!(playback.tick(180, 100.0, 5), 1);
        assert_eq!(playback.tick(250, 100.0, 5), 1);
        assert_eq!(playback.tick(280, 100.0, 5), 2);
    }

    #[test]
    fn test_playback_wraps_shrunken_sequence() {
        let mut playback = Playback::new();
        playback.start(0);
        playback.tick(100, 100.0, 5);
        playback.tick(200, 100.0, 5);
        playback.tick(300, 100.0, 5);
        assert_eq!(playback.index(), 3);
        assert_eq!(playback.tick(310, 100.0, 2), 1);
        assert_eq!(playback.tick(320, 100.0, 0), 0);
    }

    #[test]
    fn test_record_empty_snapshot() {
        assert!(RecordSession::new(Vec::new(), 2, 0, 0).is_none());
    }

    #[test]
    fn test_record_warmup_then_in_order() {
        let snapshot = frames(3);
        let mut session = RecordSession::new(snapshot.clone(), 2, 0, 0).unwrap();

        assert!(matches!(session.tick(1), RecordStep::Warmup { .. }));
        assert!(matches!(session.tick(2), RecordStep::Warmup { .. }));

        for k in 0..3 {
            match session.tick(3 + k as u64) {
                RecordStep::Captured { frame, index, finished } => {
                    assert_eq!(index, k);
                    assert!(Arc::ptr_eq(&frame, &snapshot[k]));
                    assert_eq!(finished, k == 2);
                }
                RecordStep::Warmup { .. } => panic!("unexpected warm-up tick"),
            }
        }
        assert!(session.is_finished());
    }

    #[test]
    fn test_record_delay_extends_warmup() {
        let mut session = RecordSession::new(frames(2), 1, 350, 1000).unwrap();
        assert!(matches!(session.tick(1016), RecordStep::Warmup { .. }));
        assert!(matches!(session.tick(1200), RecordStep::Warmup { .. }));
        assert!(matches!(session.tick(1349), RecordStep::Warmup { .. }));
        assert!(matches!(session.tick(1350), RecordStep::Captured { index: 0, .. }));
    }
}
