//! Committed frames and the active drawing layer.

use crate::error::Rejection;
use crate::layer::Layer;
use crate::stroke::Stroke;
use crate::surface::Surface;
use std::sync::Arc;

/// The layer currently being drawn on, with the strokes that produced it.
///
/// Replaying `strokes` in order onto a blank layer reproduces `layer` exactly.
#[derive(Debug, Clone)]
pub struct ActiveLayer {
    layer: Layer,
    strokes: Vec<Stroke>,
    has_content: bool,
}

impl ActiveLayer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layer: Layer::new(width, height),
            strokes: Vec::new(),
            has_content: false,
        }
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Finished strokes, oldest first.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Whether anything has been drawn since the last clear.
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Mutable access for incremental drawing; marks the layer as non-empty.
    pub(crate) fn draw_target(&mut self) -> &mut Layer {
        self.has_content = true;
        &mut self.layer
    }

    pub(crate) fn push_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub(crate) fn pop_stroke(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Rebuild the pixels from scratch by replaying every stroke.
    pub(crate) fn rebuild(&mut self, spacing: f64) {
        self.layer.clear();
        for stroke in &self.strokes {
            stroke.draw(&mut self.layer, spacing);
        }
        self.has_content = !self.strokes.is_empty();
    }

    /// Discard pixels and stroke history.
    pub(crate) fn clear(&mut self) {
        self.layer.clear();
        self.strokes.clear();
        self.has_content = false;
    }
}

/// Result of a commit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The active layer was appended; `total` committed frames now exist.
    Committed { total: usize },
    /// Collapsed into a commit requested moments earlier.
    Debounced,
}

/// Owns the ordered committed frames and the active layer.
///
/// Committed frames are immutable; the list only grows by commit and shrinks
/// by deleting the last frame or clearing everything.
#[derive(Debug, Clone)]
pub struct LayerStore {
    committed: Vec<Arc<Layer>>,
    active: ActiveLayer,
    commit_cooldown_ms: u64,
    last_commit_request: Option<u64>,
}

impl LayerStore {
    pub fn new(width: u32, height: u32, commit_cooldown_ms: u64) -> Self {
        Self {
            committed: Vec::new(),
            active: ActiveLayer::new(width, height),
            commit_cooldown_ms,
            last_commit_request: None,
        }
    }

    pub fn active(&self) -> &ActiveLayer {
        &self.active
    }

    pub(crate) fn active_mut(&mut self) -> &mut ActiveLayer {
        &mut self.active
    }

    pub fn committed(&self) -> &[Arc<Layer>] {
        &self.committed
    }

    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    /// Freeze a copy of the active layer into the frame list and clear it.
    pub fn commit(&mut self, now_ms: u64) -> Result<CommitOutcome, Rejection> {
        let debounced = self
            .last_commit_request
            .is_some_and(|last| now_ms.saturating_sub(last) < self.commit_cooldown_ms);
        if debounced {
            return Ok(CommitOutcome::Debounced);
        }
        self.last_commit_request = Some(now_ms);

        if !self.active.has_content() {
            return Err(Rejection::EmptyLayer);
        }
        self.committed.push(Arc::new(self.active.layer.clone()));
        self.active.clear();
        Ok(CommitOutcome::Committed {
            total: self.committed.len(),
        })
    }

    /// Remove the most recently committed frame. Returns the remaining count.
    pub fn delete_last(&mut self) -> Result<usize, Rejection> {
        self.committed.pop().ok_or(Rejection::NoCommittedFrames)?;
        Ok(self.committed.len())
    }

    /// Discard the active layer's pixels and strokes.
    pub fn clear_active(&mut self) {
        self.active.clear();
    }

    /// Drop every committed frame and clear the active layer.
    pub fn clear_all(&mut self) {
        self.committed.clear();
        self.active.clear();
    }

    /// Number of frames `sequence()` would return, without copying.
    pub fn sequence_len(&self) -> usize {
        self.committed.len() + usize::from(self.active.has_content())
    }

    /// Frame `index` of the sequence, borrowed.
    pub fn frame(&self, index: usize) -> Option<&Layer> {
        match self.committed.get(index) {
            Some(frame) => Some(frame.as_ref()),
            None if index == self.committed.len() && self.active.has_content() => Some(&self.active.layer),
            None => None,
        }
    }

    /// Committed frames followed by the active layer if it has content.
    ///
    /// Used by both playback and export, so what is previewed is what is
    /// exported.
    pub fn sequence(&self) -> Vec<Arc<Layer>> {
        let mut sequence = self.committed.clone();
        if self.active.has_content() {
            sequence.push(Arc::new(self.active.layer.clone()));
        }
        sequence
    }
}
