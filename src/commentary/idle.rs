//! Idle tracking and ambient commentary scheduling
//!
//! Debounced quiet-period detection: every registered interaction pushes
//! the single pending idle timer back by the initial delay, and after each
//! firing the timer re-arms on a randomized interval so ambient commentary
//! never settles into a fixed cadence. All timer work goes through the
//! [`TimerWheel`]; the tracker never sees a wall clock.

use tracing::debug;

use crate::rng::RandomSource;
use crate::sched::{TimerKind, TimerWheel};

#[derive(Debug)]
pub struct IdleTracker {
    enabled: bool,
    last_interaction_ms: u64,
    initial_delay_ms: u64,
    interval_min_ms: u64,
    interval_max_ms: u64,
}

impl IdleTracker {
    pub fn new(initial_delay_ms: u64, interval_min_ms: u64, interval_max_ms: u64) -> Self {
        Self {
            enabled: false,
            last_interaction_ms: 0,
            initial_delay_ms,
            interval_min_ms,
            interval_max_ms,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_interaction_ms(&self) -> u64 {
        self.last_interaction_ms
    }

    /// Start tracking. Re-enabling re-baselines the interaction clock and
    /// re-arms the timer at the initial delay.
    pub fn enable(&mut self, wheel: &mut TimerWheel) {
        self.enabled = true;
        self.last_interaction_ms = wheel.now_ms();
        wheel.arm(TimerKind::Idle, self.initial_delay_ms);
        debug!(delay_ms = self.initial_delay_ms, "idle tracking enabled");
    }

    /// Stop tracking and cancel the pending timer.
    pub fn disable(&mut self, wheel: &mut TimerWheel) {
        self.enabled = false;
        wheel.cancel(TimerKind::Idle);
        debug!("idle tracking disabled");
    }

    /// Record user activity. While enabled this pushes the pending idle
    /// timer back by the full initial delay; while disabled only the
    /// timestamp moves.
    pub fn register_interaction(&mut self, wheel: &mut TimerWheel) {
        self.last_interaction_ms = wheel.now_ms();
        if self.enabled {
            wheel.arm(TimerKind::Idle, self.initial_delay_ms);
        }
    }

    /// Re-arm after a firing, uniformly within the configured band.
    pub fn reschedule(&mut self, wheel: &mut TimerWheel, rng: &mut dyn RandomSource) {
        let band = self.interval_max_ms.saturating_sub(self.interval_min_ms);
        let delay_ms = self.interval_min_ms + (rng.next_f64() * band as f64) as u64;
        wheel.arm(TimerKind::Idle, delay_ms);
        debug!(delay_ms, "idle timer rescheduled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRandom;

    fn tracker() -> IdleTracker {
        IdleTracker::new(5000, 6000, 10000)
    }

    #[test]
    fn test_enable_arms_initial_delay() {
        let mut wheel = TimerWheel::new();
        let mut tracker = tracker();
        tracker.enable(&mut wheel);
        assert!(tracker.is_enabled());
        assert_eq!(wheel.deadline(TimerKind::Idle), Some(5000));
    }

    #[test]
    fn test_interactions_debounce_the_timer() {
        let mut wheel = TimerWheel::new();
        let mut tracker = tracker();
        tracker.enable(&mut wheel);

        assert_eq!(wheel.pop_due(3000), None);
        tracker.register_interaction(&mut wheel);
        assert_eq!(wheel.deadline(TimerKind::Idle), Some(8000));
        assert_eq!(tracker.last_interaction_ms(), 3000);

        assert_eq!(wheel.pop_due(4500), None);
        tracker.register_interaction(&mut wheel);
        assert_eq!(wheel.deadline(TimerKind::Idle), Some(9500));
    }

    #[test]
    fn test_disable_cancels_pending_timer() {
        let mut wheel = TimerWheel::new();
        let mut tracker = tracker();
        tracker.enable(&mut wheel);
        tracker.disable(&mut wheel);
        assert!(!tracker.is_enabled());
        assert!(!wheel.is_armed(TimerKind::Idle));
    }

    #[test]
    fn test_interaction_while_disabled_arms_nothing() {
        let mut wheel = TimerWheel::new();
        let mut tracker = tracker();
        assert_eq!(wheel.pop_due(1200), None);
        tracker.register_interaction(&mut wheel);
        assert_eq!(tracker.last_interaction_ms(), 1200);
        assert!(!wheel.is_armed(TimerKind::Idle));
    }

    #[test]
    fn test_reschedule_spans_the_band() {
        let mut wheel = TimerWheel::new();
        let mut tracker = tracker();
        let mut rng = SequenceRandom::new(vec![0.0, 0.9999]);

        tracker.reschedule(&mut wheel, &mut rng);
        assert_eq!(wheel.deadline(TimerKind::Idle), Some(6000));

        tracker.reschedule(&mut wheel, &mut rng);
        let deadline = wheel.deadline(TimerKind::Idle).unwrap();
        assert!(deadline >= 6000 && deadline < 10000, "deadline {deadline}");
    }

    #[test]
    fn test_reenable_rebaselines() {
        let mut wheel = TimerWheel::new();
        let mut tracker = tracker();
        tracker.enable(&mut wheel);
        assert_eq!(wheel.pop_due(2000), None);
        tracker.enable(&mut wheel);
        assert_eq!(tracker.last_interaction_ms(), 2000);
        assert_eq!(wheel.deadline(TimerKind::Idle), Some(7000));
    }
}
