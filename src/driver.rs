//! Async host for the commentary engine
//!
//! Runs a [`CommentaryEngine`] on a single tokio task. Inbound
//! [`SessionEvent`]s are serialized through an mpsc channel; the engine's
//! pending timer deadline is mapped onto `tokio::time`, so the task wakes
//! exactly when the engine needs the clock advanced. The engine itself
//! never blocks and never sees the runtime.
//!
//! The command channel is created ahead of engine construction (see
//! [`channel`]) so collaborators like audio sinks can hold a sender for
//! their lifecycle reports before the engine takes ownership of them.

use std::future;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info};

use crate::commentary::clip::ClipKind;
use crate::commentary::engine::CommentaryEngine;
use crate::events::{CommentaryEvent, EventBus, SessionEvent};

/// Create the command channel for a driver.
pub fn channel() -> (
    mpsc::UnboundedSender<SessionEvent>,
    mpsc::UnboundedReceiver<SessionEvent>,
) {
    mpsc::unbounded_channel()
}

/// Spawn the engine task. `tx` and `rx` come from [`channel`]; the
/// returned handle feeds events in and hands out bus subscriptions.
pub fn spawn(
    engine: CommentaryEngine,
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
) -> (CommentaryHandle, JoinHandle<()>) {
    let bus = engine.event_bus().clone();
    let handle = CommentaryHandle { tx, bus };
    let join = tokio::spawn(run(engine, rx));
    (handle, join)
}

/// Cloneable front door to a spawned engine.
#[derive(Clone)]
pub struct CommentaryHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
    bus: EventBus,
}

impl CommentaryHandle {
    /// Send a raw event. Dropped with a log line if the engine task is
    /// gone.
    pub fn send(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            debug!("engine task gone, event dropped");
        }
    }

    pub fn enable(&self) {
        self.send(SessionEvent::Enable);
    }

    pub fn disable(&self) {
        self.send(SessionEvent::Disable);
    }

    pub fn set_muted(&self, muted: bool) {
        self.send(SessionEvent::SetMuted { muted });
    }

    pub fn register_interaction(&self) {
        self.send(SessionEvent::Interaction);
    }

    pub fn section_enter(&self, section: &str) {
        self.send(SessionEvent::SectionEntered {
            section: section.to_string(),
        });
    }

    pub fn project_interaction(&self, project: &str, kind: ClipKind) {
        self.send(SessionEvent::ProjectInteraction {
            project: project.to_string(),
            kind,
        });
    }

    pub fn generic_hover(&self, section: &str, element: &str) {
        self.send(SessionEvent::GenericHover {
            section: section.to_string(),
            element: element.to_string(),
        });
    }

    pub fn opening_greeting(&self) {
        self.send(SessionEvent::OpeningGreeting);
    }

    /// Subscribe to the engine's notification bus.
    pub fn subscribe(&self) -> broadcast::Receiver<CommentaryEvent> {
        self.bus.subscribe()
    }

    /// Sender for collaborators reporting playback lifecycle events.
    pub fn event_sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.tx.clone()
    }
}

async fn run(mut engine: CommentaryEngine, mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
    let start = Instant::now();
    info!("commentary driver started");
    loop {
        engine.advance_to(start.elapsed().as_millis() as u64);
        let deadline = engine
            .next_deadline()
            .map(|ms| start + Duration::from_millis(ms));
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    engine.advance_to(start.elapsed().as_millis() as u64);
                    engine.dispatch(event);
                }
                None => break,
            },
            _ = sleep_until_or_never(deadline) => {}
        }
    }
    info!("commentary driver stopped");
}

async fn sleep_until_or_never(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}
