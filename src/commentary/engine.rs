//! Commentary engine orchestration
//!
//! [`CommentaryEngine`] wires the router, picker, queue, gate, and idle
//! tracker together. All mutation flows through [`dispatch`] or the timer
//! handlers invoked from [`advance_to`]; handlers run to completion before
//! the next event, and anything deferred (cooldown expiry, dispatch retry,
//! idle commentary) is a timer, never a nested call. The host maps
//! [`next_deadline`] onto its own clock.
//!
//! [`dispatch`]: CommentaryEngine::dispatch
//! [`advance_to`]: CommentaryEngine::advance_to
//! [`next_deadline`]: CommentaryEngine::next_deadline

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::audio::AudioSink;
use crate::commentary::clip::{ClipKind, ClipRequest, Priority};
use crate::commentary::gate::PlaybackGate;
use crate::commentary::idle::IdleTracker;
use crate::commentary::picker::ClipPicker;
use crate::commentary::queue::{ClipQueue, EnqueueOutcome};
use crate::commentary::router::Router;
use crate::commentary::state::{EngineStatus, PlaybackState};
use crate::config::EngineConfig;
use crate::events::{CommentaryEvent, DropReason, EventBus, SessionEvent};
use crate::rng::RandomSource;
use crate::sched::{TimerKind, TimerWheel};

const EVENT_BUS_CAPACITY: usize = 100;

pub struct CommentaryEngine {
    config: EngineConfig,
    router: Router,
    picker: ClipPicker,
    queue: ClipQueue,
    gate: PlaybackGate,
    idle: IdleTracker,
    wheel: TimerWheel,
    rng: Box<dyn RandomSource>,
    bus: EventBus,
    current_section: Option<String>,
}

impl CommentaryEngine {
    /// Create an engine. `sink: None` leaves playback inert while
    /// selection and queueing still run (missing audio element policy).
    pub fn new(
        config: EngineConfig,
        sink: Option<Box<dyn AudioSink>>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let idle = IdleTracker::new(
            config.idle_delay_ms,
            config.idle_interval_min_ms,
            config.idle_interval_max_ms,
        );
        info!(
            voice_profile = %config.voice_profile,
            cooldown_ms = config.cooldown_ms,
            idle_delay_ms = config.idle_delay_ms,
            "commentary engine initialized"
        );
        Self {
            config,
            router: Router::new(),
            picker: ClipPicker::new(),
            queue: ClipQueue::new(),
            gate: PlaybackGate::new(sink),
            idle,
            wheel: TimerWheel::new(),
            rng,
            bus: EventBus::new(EVENT_BUS_CAPACITY),
            current_section: None,
        }
    }

    /// Bus carrying [`CommentaryEvent`] notifications.
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Read-only snapshot of session state.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            playback_state: self.gate.state(),
            queue_len: self.queue.len(),
            muted: self.gate.is_muted(),
            enabled: self.idle.is_enabled(),
            current_section: self.current_section.clone(),
            last_interaction_ms: self.idle.last_interaction_ms(),
        }
    }

    // ------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------

    /// Current engine time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.wheel.now_ms()
    }

    /// Earliest pending timer deadline, for the host's sleep.
    pub fn next_deadline(&self) -> Option<u64> {
        self.wheel.next_deadline()
    }

    /// Move engine time forward to `now_ms`, firing due timers in
    /// deadline order. Timers armed by a firing are themselves fired if
    /// they fall within the advancement window.
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some(kind) = self.wheel.pop_due(now_ms) {
            match kind {
                TimerKind::Cooldown => self.on_cooldown_elapsed(),
                TimerKind::RetryDispatch => self.on_retry_dispatch(),
                TimerKind::Idle => self.on_idle(),
            }
        }
    }

    // ------------------------------------------------------------------
    // External interface
    // ------------------------------------------------------------------

    /// Feed one event through the engine. Runs to completion; never
    /// re-entered.
    pub fn dispatch(&mut self, event: SessionEvent) {
        debug!(event = event.event_type(), "dispatching session event");
        match event {
            SessionEvent::SectionEntered { section } => self.handle_section_entered(&section),
            SessionEvent::ProjectInteraction { project, kind } => {
                self.handle_project_interaction(&project, kind)
            }
            SessionEvent::GenericHover { section, element } => {
                self.handle_element_hover(&section, &element)
            }
            SessionEvent::Interaction => self.idle.register_interaction(&mut self.wheel),
            SessionEvent::Enable => self.handle_enable(),
            SessionEvent::Disable => self.handle_disable(),
            SessionEvent::SetMuted { muted } => self.handle_set_muted(muted),
            SessionEvent::OpeningGreeting => self.handle_opening_greeting(),
            SessionEvent::PlaybackStarted => {
                debug!(url = ?self.gate.current_url(), "playback start confirmed")
            }
            SessionEvent::PlaybackStartFailed { reason } => self.handle_start_failed(&reason),
            SessionEvent::ClipEnded => self.handle_clip_over(true),
            SessionEvent::ClipFailed { reason } => {
                warn!(%reason, "clip playback error");
                self.handle_clip_over(false)
            }
        }
    }

    /// Convenience wrappers over [`dispatch`](Self::dispatch).
    pub fn enable(&mut self) {
        self.dispatch(SessionEvent::Enable);
    }

    pub fn disable(&mut self) {
        self.dispatch(SessionEvent::Disable);
    }

    pub fn register_interaction(&mut self) {
        self.dispatch(SessionEvent::Interaction);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.dispatch(SessionEvent::SetMuted { muted });
    }

    pub fn on_section_enter(&mut self, section: &str) {
        self.dispatch(SessionEvent::SectionEntered {
            section: section.to_string(),
        });
    }

    pub fn on_project_interaction(&mut self, project: &str, kind: ClipKind) {
        self.dispatch(SessionEvent::ProjectInteraction {
            project: project.to_string(),
            kind,
        });
    }

    pub fn on_generic_hover(&mut self, section: &str, element: &str) {
        self.dispatch(SessionEvent::GenericHover {
            section: section.to_string(),
            element: element.to_string(),
        });
    }

    pub fn play_opening_greeting(&mut self) {
        self.dispatch(SessionEvent::OpeningGreeting);
    }

    /// Offer an already-rendered clip URL to the queue. Returns false only
    /// when muted; a normal-priority drop against an occupied slot still
    /// counts as accepted.
    pub fn enqueue(&mut self, url: String, priority: Priority) -> bool {
        if self.gate.is_muted() {
            debug!(%url, "muted, clip rejected");
            self.bus.emit_lossy(CommentaryEvent::ClipDropped {
                url,
                reason: DropReason::Muted,
                timestamp: Utc::now(),
            });
            return false;
        }
        match self.queue.offer(url.clone(), priority) {
            EnqueueOutcome::Queued => debug!(%url, priority = %priority, "clip queued"),
            EnqueueOutcome::Replaced => debug!(%url, "high priority clip displaced pending"),
            EnqueueOutcome::Dropped => {
                debug!(%url, "queue occupied, clip dropped");
                self.bus.emit_lossy(CommentaryEvent::ClipDropped {
                    url,
                    reason: DropReason::QueueOccupied,
                    timestamp: Utc::now(),
                });
                return true;
            }
        }
        self.try_dispatch();
        true
    }

    // ------------------------------------------------------------------
    // Event handlers
    // ------------------------------------------------------------------

    fn handle_enable(&mut self) {
        self.idle.enable(&mut self.wheel);
        info!("commentary enabled");
    }

    fn handle_disable(&mut self) {
        self.idle.disable(&mut self.wheel);
        info!("commentary disabled");
    }

    fn handle_set_muted(&mut self, muted: bool) {
        if muted == self.gate.is_muted() {
            return;
        }
        if muted {
            if self.queue.clear() {
                self.bus.emit_lossy(CommentaryEvent::QueueCleared {
                    timestamp: Utc::now(),
                });
            }
            self.wheel.cancel(TimerKind::RetryDispatch);
        }
        let old = self.gate.state();
        if let Some(url) = self.gate.set_muted(muted) {
            self.bus.emit_lossy(CommentaryEvent::ClipFinished {
                url,
                completed: false,
                timestamp: Utc::now(),
            });
            self.wheel.arm(TimerKind::Cooldown, self.config.cooldown_ms);
        }
        self.note_state_change(old);
        info!(muted, "mute changed");
        self.bus.emit_lossy(CommentaryEvent::MuteChanged {
            muted,
            timestamp: Utc::now(),
        });
    }

    fn handle_section_entered(&mut self, section: &str) {
        if !self.idle.is_enabled() {
            return;
        }
        self.idle.register_interaction(&mut self.wheel);
        self.current_section = Some(section.to_string());
        if self.queue.clear() {
            self.bus.emit_lossy(CommentaryEvent::QueueCleared {
                timestamp: Utc::now(),
            });
        }
        info!(section, "section entered");
        let request = self
            .router
            .section_enter(section, &mut self.picker, &mut *self.rng);
        self.enqueue_request(request, Priority::High);
    }

    fn handle_project_interaction(&mut self, project: &str, kind: ClipKind) {
        if !self.idle.is_enabled() {
            return;
        }
        self.idle.register_interaction(&mut self.wheel);
        let (request, priority) =
            self.router
                .project_interaction(project, kind, &mut self.picker, &mut *self.rng);
        self.enqueue_request(request, priority);
    }

    fn handle_element_hover(&mut self, section: &str, element: &str) {
        if !self.idle.is_enabled() {
            return;
        }
        self.idle.register_interaction(&mut self.wheel);
        let request =
            self.router
                .element_hover(section, element, &mut self.picker, &mut *self.rng);
        self.enqueue_request(request, Priority::Normal);
    }

    fn handle_opening_greeting(&mut self) {
        if !self.idle.is_enabled() {
            return;
        }
        let request = self.router.opening_greeting(&mut self.picker, &mut *self.rng);
        self.enqueue_request(request, Priority::High);
    }

    fn handle_start_failed(&mut self, reason: &str) {
        let old = self.gate.state();
        match self.gate.start_failed() {
            Some(url) => {
                warn!(%reason, %url, "playback start failed, clip lost; retry scheduled");
                self.note_state_change(old);
                self.wheel
                    .arm(TimerKind::RetryDispatch, self.config.dispatch_retry_ms);
            }
            None => warn!(%reason, "start failure reported with nothing in flight"),
        }
    }

    fn handle_clip_over(&mut self, completed: bool) {
        let old = self.gate.state();
        if let Some(url) = self.gate.clip_over() {
            debug!(%url, completed, "clip over");
            self.bus.emit_lossy(CommentaryEvent::ClipFinished {
                url,
                completed,
                timestamp: Utc::now(),
            });
            self.note_state_change(old);
            self.wheel.arm(TimerKind::Cooldown, self.config.cooldown_ms);
            // Audio counts as activity: idle commentary waits a full quiet
            // period after playback stops.
            self.idle.register_interaction(&mut self.wheel);
        }
    }

    // ------------------------------------------------------------------
    // Timer handlers
    // ------------------------------------------------------------------

    fn on_cooldown_elapsed(&mut self) {
        let old = self.gate.state();
        if self.gate.cooldown_elapsed() {
            self.note_state_change(old);
            self.try_dispatch();
        }
    }

    fn on_retry_dispatch(&mut self) {
        debug!("dispatch retry");
        self.try_dispatch();
    }

    fn on_idle(&mut self) {
        // An idle firing that raced a disable is dropped here.
        if !self.idle.is_enabled() {
            debug!("idle timer fired while disabled, ignoring");
            return;
        }
        if let Some(section) = self.current_section.clone() {
            self.bus.emit_lossy(CommentaryEvent::IdleTriggered {
                section: section.clone(),
                timestamp: Utc::now(),
            });
            let request = self.router.section_idle(
                &section,
                self.config.project_idle_bias,
                &mut self.picker,
                &mut *self.rng,
            );
            self.enqueue_request(request, Priority::Normal);
        } else {
            debug!("idle fired with no current section");
        }
        self.idle.reschedule(&mut self.wheel, &mut *self.rng);
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    fn enqueue_request(&mut self, request: ClipRequest, priority: Priority) {
        let url = request.url(&self.config.voice_profile, &self.config.clip_extension);
        self.enqueue(url, priority);
    }

    fn try_dispatch(&mut self) {
        if !self.gate.can_start() || self.queue.is_empty() {
            return;
        }
        let Some(pending) = self.queue.take() else {
            return;
        };
        let old = self.gate.state();
        if self.gate.begin(&pending.url) {
            debug!(url = %pending.url, priority = %pending.priority, "clip dispatched");
            self.note_state_change(old);
            self.bus.emit_lossy(CommentaryEvent::ClipDispatched {
                url: pending.url,
                priority: pending.priority,
                timestamp: Utc::now(),
            });
        } else {
            self.bus.emit_lossy(CommentaryEvent::ClipDropped {
                url: pending.url,
                reason: DropReason::SinkUnavailable,
                timestamp: Utc::now(),
            });
        }
    }

    fn note_state_change(&mut self, old_state: PlaybackState) {
        let new_state = self.gate.state();
        if old_state != new_state {
            debug!(%old_state, %new_state, "playback state changed");
            self.bus.emit_lossy(CommentaryEvent::StateChanged {
                old_state,
                new_state,
                timestamp: Utc::now(),
            });
        }
    }
}
