//! Event types and event bus for the commentary engine
//!
//! Communication follows a hybrid pattern:
//!
//! 1. **Inbound commands** ([`SessionEvent`]): UI adapters and the audio
//!    sink send events through a single mpsc channel, consumed one at a
//!    time by the engine task. This serializes all state mutation.
//! 2. **Outbound notifications** ([`CommentaryEvent`]): the engine
//!    broadcasts what happened via [`EventBus`]; any number of observers
//!    may subscribe, and slow observers only lose their own backlog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::commentary::clip::{ClipKind, Priority};
use crate::commentary::state::PlaybackState;

/// Inbound events consumed by the engine's dispatch entry point.
///
/// Everything that can change engine state arrives here: translated user
/// interactions, control toggles, and playback lifecycle reports from the
/// audio sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A page section scrolled into view.
    SectionEntered { section: String },

    /// Interaction with a project card.
    ProjectInteraction { project: String, kind: ClipKind },

    /// Hover-style interaction with a non-project element.
    GenericHover { section: String, element: String },

    /// Any raw user activity (scroll, mouse move, key press). Defers idle
    /// commentary without selecting a clip.
    Interaction,

    /// Turn clip selection on.
    Enable,

    /// Turn clip selection off.
    Disable,

    /// Change the mute flag.
    SetMuted { muted: bool },

    /// Queue the hero greeting played on first activation.
    OpeningGreeting,

    /// Sink report: playback of the dispatched clip began.
    PlaybackStarted,

    /// Sink report: the dispatched clip could not start.
    PlaybackStartFailed { reason: String },

    /// Sink report: the current clip played to completion.
    ClipEnded,

    /// Sink report: the current clip aborted with a playback error.
    ClipFailed { reason: String },
}

impl SessionEvent {
    /// Get event type as string for filtering and logging
    pub fn event_type(&self) -> &str {
        match self {
            SessionEvent::SectionEntered { .. } => "SectionEntered",
            SessionEvent::ProjectInteraction { .. } => "ProjectInteraction",
            SessionEvent::GenericHover { .. } => "GenericHover",
            SessionEvent::Interaction => "Interaction",
            SessionEvent::Enable => "Enable",
            SessionEvent::Disable => "Disable",
            SessionEvent::SetMuted { .. } => "SetMuted",
            SessionEvent::OpeningGreeting => "OpeningGreeting",
            SessionEvent::PlaybackStarted => "PlaybackStarted",
            SessionEvent::PlaybackStartFailed { .. } => "PlaybackStartFailed",
            SessionEvent::ClipEnded => "ClipEnded",
            SessionEvent::ClipFailed { .. } => "ClipFailed",
        }
    }
}

/// Why an offered clip never reached the queue slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropReason {
    /// Rejected at the door: session is muted.
    Muted,
    /// Normal priority with the slot already taken.
    QueueOccupied,
    /// No audio sink available; clip silently discarded at dispatch.
    SinkUnavailable,
}

/// Outbound notifications broadcast by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommentaryEvent {
    /// Playback gate transitioned.
    ///
    /// Triggers:
    /// - UI: update the announcer indicator
    StateChanged {
        old_state: PlaybackState,
        new_state: PlaybackState,
        timestamp: DateTime<Utc>,
    },

    /// A clip left the queue and was handed to the sink.
    ClipDispatched {
        url: String,
        priority: Priority,
        timestamp: DateTime<Utc>,
    },

    /// An offered clip was discarded instead of queued or played.
    ClipDropped {
        url: String,
        reason: DropReason,
        timestamp: DateTime<Utc>,
    },

    /// The in-flight clip is over (`completed` is false for playback
    /// errors and mute interruptions).
    ClipFinished {
        url: String,
        completed: bool,
        timestamp: DateTime<Utc>,
    },

    /// Pending clips were discarded (section change or mute).
    QueueCleared { timestamp: DateTime<Utc> },

    /// The idle timer elapsed and ambient commentary was requested.
    IdleTriggered {
        section: String,
        timestamp: DateTime<Utc>,
    },

    /// The mute flag changed.
    MuteChanged {
        muted: bool,
        timestamp: DateTime<Utc>,
    },
}

impl CommentaryEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            CommentaryEvent::StateChanged { .. } => "StateChanged",
            CommentaryEvent::ClipDispatched { .. } => "ClipDispatched",
            CommentaryEvent::ClipDropped { .. } => "ClipDropped",
            CommentaryEvent::ClipFinished { .. } => "ClipFinished",
            CommentaryEvent::QueueCleared { .. } => "QueueCleared",
            CommentaryEvent::IdleTriggered { .. } => "IdleTriggered",
            CommentaryEvent::MuteChanged { .. } => "MuteChanged",
        }
    }
}

/// Central event bus using tokio broadcast channel
///
/// Cloning is cheap and clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CommentaryEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use commentary_engine::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<CommentaryEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` otherwise.
    pub fn emit(
        &self,
        event: CommentaryEvent,
    ) -> Result<usize, broadcast::error::SendError<CommentaryEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// # Examples
    ///
    /// ```
    /// use commentary_engine::events::{CommentaryEvent, EventBus};
    ///
    /// let event_bus = EventBus::new(100);
    /// event_bus.emit_lossy(CommentaryEvent::MuteChanged {
    ///     muted: false,
    ///     timestamp: chrono::Utc::now(),
    /// });
    /// ```
    pub fn emit_lossy(&self, event: CommentaryEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
