use crate::clock::Millis;

/// A cancellable one-shot deadline.
///
/// Scheduling replaces any pending deadline of the same timer, so timers of
/// one kind never stack. Cancelling an idle timer is a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Deadline {
    at: Option<Millis>,
}

impl Deadline {
    pub const IDLE: Deadline = Deadline { at: None };

    pub fn after(now: Millis, delay_ms: Millis) -> Self {
        Self {
            at: Some(now + delay_ms),
        }
    }

    /// Restart from `now`, dropping whatever was pending.
    pub fn schedule(&mut self, now: Millis, delay_ms: Millis) {
        self.at = Some(now + delay_ms);
    }

    /// Start only if nothing is pending yet.
    pub fn schedule_if_idle(&mut self, now: Millis, delay_ms: Millis) {
        if self.at.is_none() {
            self.schedule(now, delay_ms);
        }
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.at.is_some()
    }

    pub fn at(&self) -> Option<Millis> {
        self.at
    }

    pub fn is_due(&self, now: Millis) -> bool {
        matches!(self.at, Some(at) if now >= at)
    }

    /// Clear and report `true` when the deadline has passed.
    pub fn fire(&mut self, now: Millis) -> bool {
        if self.is_due(now) {
            self.at = None;
            true
        } else {
            false
        }
    }
}
