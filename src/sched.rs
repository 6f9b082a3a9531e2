//! Timer scheduling for the engine core
//!
//! The engine never reads a wall clock. Pending work lives in a
//! [`TimerWheel`] keyed by [`TimerKind`], and the host advances engine time
//! explicitly (milliseconds since engine start), firing whatever came due.
//! This keeps every timing-sensitive path deterministic under test.

/// The schedulable timers. Arming a kind replaces any pending deadline of
/// the same kind, so at most one of each exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Dead time after a clip finishes.
    Cooldown,
    /// Delayed dispatch re-attempt after a playback start failure.
    RetryDispatch,
    /// Ambient idle commentary.
    Idle,
}

impl TimerKind {
    /// All kinds, in tie-breaking order for simultaneous deadlines.
    pub const ALL: [TimerKind; 3] = [
        TimerKind::Cooldown,
        TimerKind::RetryDispatch,
        TimerKind::Idle,
    ];

    fn slot(self) -> usize {
        match self {
            TimerKind::Cooldown => 0,
            TimerKind::RetryDispatch => 1,
            TimerKind::Idle => 2,
        }
    }
}

/// Deadline bookkeeping for the engine's timers.
///
/// Time is a monotonic `u64` of milliseconds. `now` only moves forward:
/// either onto a fired deadline or onto the advancement target.
#[derive(Debug, Default)]
pub struct TimerWheel {
    now_ms: u64,
    deadlines: [Option<u64>; 3],
}

impl TimerWheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current engine time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `kind` to fire `delay_ms` from now, replacing any pending
    /// deadline of the same kind.
    pub fn arm(&mut self, kind: TimerKind, delay_ms: u64) {
        self.deadlines[kind.slot()] = Some(self.now_ms + delay_ms);
    }

    /// Drop the pending deadline for `kind`, if any.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.deadlines[kind.slot()] = None;
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<u64> {
        self.deadlines[kind.slot()]
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.deadlines[kind.slot()].is_some()
    }

    /// Earliest pending deadline across all kinds.
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadlines.iter().flatten().copied().min()
    }

    /// Pop the earliest deadline at or before `target_ms`, moving `now`
    /// onto it. Returns `None` once nothing further is due, leaving `now`
    /// at `target_ms`. Ties fire in [`TimerKind::ALL`] order.
    pub fn pop_due(&mut self, target_ms: u64) -> Option<TimerKind> {
        let mut due: Option<(u64, TimerKind)> = None;
        for kind in TimerKind::ALL {
            if let Some(deadline) = self.deadlines[kind.slot()] {
                if deadline <= target_ms && due.map_or(true, |(best, _)| deadline < best) {
                    due = Some((deadline, kind));
                }
            }
        }
        match due {
            Some((deadline, kind)) => {
                self.deadlines[kind.slot()] = None;
                self.now_ms = self.now_ms.max(deadline);
                Some(kind)
            }
            None => {
                self.now_ms = self.now_ms.max(target_ms);
                None
            }
        }
    }
}
