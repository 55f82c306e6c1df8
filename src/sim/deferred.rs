//! Deferred one-shot effects
//!
//! Cosmetic follow-ups (reopening eyes after a blink) are queued against a
//! monster id and a due tick. The target may be gone by the time they fire,
//! so whoever applies them has to look the monster up again.

use serde::{Deserialize, Serialize};

use super::monster::MonsterId;

/// What to do when the event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    OpenEyes,
}

/// A scheduled effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deferred {
    /// Tick on which the effect becomes due
    pub due_tick: u64,
    pub target: MonsterId,
    pub action: DeferredAction,
}

/// Pending effects, kept in scheduling order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeferredQueue {
    pending: Vec<Deferred>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` for `target`, `delay_ticks` after `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, target: MonsterId, action: DeferredAction) {
        self.pending.push(Deferred {
            due_tick: now + delay_ticks.max(1),
            target,
            action,
        });
    }

    /// Remove and return everything due at or before `now`, oldest first
    pub fn take_due(&mut self, now: u64) -> Vec<Deferred> {
        let mut due = Vec::new();
        self.pending.retain(|d| {
            if d.due_tick <= now {
                due.push(*d);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Ticks covering `seconds` at the given step
pub fn ticks_for(seconds: f32, dt: f32) -> u64 {
    if dt <= 0.0 {
        return 1;
    }
    ((seconds / dt).ceil() as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BLINK_SECONDS, SIM_DT};

    #[test]
    fn test_take_due_in_order() {
        let mut q = DeferredQueue::new();
        q.schedule(10, 5, MonsterId(1), DeferredAction::OpenEyes);
        q.schedule(11, 2, MonsterId(2), DeferredAction::OpenEyes);
        q.schedule(12, 9, MonsterId(3), DeferredAction::OpenEyes);

        assert!(q.take_due(12).is_empty());
        let due = q.take_due(15);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].target, MonsterId(1));
        assert_eq!(due[1].target, MonsterId(2));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_zero_delay_still_waits_a_tick() {
        let mut q = DeferredQueue::new();
        q.schedule(3, 0, MonsterId(9), DeferredAction::OpenEyes);
        assert!(q.take_due(3).is_empty());
        assert_eq!(q.take_due(4).len(), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn test_blink_duration_in_ticks() {
        assert_eq!(ticks_for(BLINK_SECONDS, SIM_DT), 9);
        assert_eq!(ticks_for(1.0, 0.0), 1);
    }
}
