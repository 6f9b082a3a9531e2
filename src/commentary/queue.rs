//! Pending clip queue
//!
//! Commentary never backs up: at most one clip waits while another plays.
//! The single slot makes that bound structural. High priority replaces
//! whatever is pending; normal priority only fills an empty slot and is
//! otherwise dropped.

use crate::commentary::clip::Priority;

/// A clip waiting to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClip {
    pub url: String,
    pub priority: Priority,
}

/// How an offered clip was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Placed into the empty slot.
    Queued,
    /// Displaced the previously pending clip.
    Replaced,
    /// Slot occupied and priority too low; clip discarded.
    Dropped,
}

/// Single-slot pending queue.
#[derive(Debug, Default)]
pub struct ClipQueue {
    slot: Option<PendingClip>,
}

impl ClipQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the arbitration policy to an offered clip.
    pub fn offer(&mut self, url: String, priority: Priority) -> EnqueueOutcome {
        match priority {
            Priority::High => {
                let displaced = self.slot.is_some();
                self.slot = Some(PendingClip { url, priority });
                if displaced {
                    EnqueueOutcome::Replaced
                } else {
                    EnqueueOutcome::Queued
                }
            }
            Priority::Normal => {
                if self.slot.is_none() {
                    self.slot = Some(PendingClip { url, priority });
                    EnqueueOutcome::Queued
                } else {
                    EnqueueOutcome::Dropped
                }
            }
        }
    }

    /// Remove and return the pending clip.
    pub fn take(&mut self) -> Option<PendingClip> {
        self.slot.take()
    }

    pub fn peek(&self) -> Option<&PendingClip> {
        self.slot.as_ref()
    }

    /// Discard the pending clip. Returns whether anything was discarded.
    pub fn clear(&mut self) -> bool {
        self.slot.take().is_some()
    }

    pub fn len(&self) -> usize {
        usize::from(self.slot.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
