//! Transient status message shown in the control panel.

/// A single status message with an optional expiry.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    message: String,
    /// `None` keeps the message until it is replaced.
    hold_until: Option<u64>,
}

impl StatusLine {
    /// Replace the message. A `hold_ms` of 0 keeps it until the next update.
    pub fn set(&mut self, message: impl Into<String>, hold_ms: u64, now_ms: u64) {
        self.message = message.into();
        self.hold_until = (hold_ms > 0).then(|| now_ms.saturating_add(hold_ms));
    }

    /// The message if it is still being held at `now_ms`, otherwise empty.
    pub fn visible(&self, now_ms: u64) -> &str {
        match self.hold_until {
            Some(until) if now_ms > until => "",
            _ => &self.message,
        }
    }
}
