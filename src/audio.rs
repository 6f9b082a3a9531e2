//! Audio sink abstraction
//!
//! The engine drives a single playback element through [`AudioSink`]. The
//! trait is fire-and-forget: outcomes (start confirmation, start failure,
//! completion, mid-playback error) come back asynchronously as
//! [`SessionEvent`]s through the engine's command channel, never as return
//! values. That keeps the engine free of blocking calls and lets the real
//! element, a test recorder, or the simulator below plug in unchanged.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::events::SessionEvent;

/// Seam to the playback element.
pub trait AudioSink: Send {
    /// Point the element at a new clip URL.
    fn set_source(&mut self, url: &str);

    /// Begin playback of the current source. The outcome arrives later as
    /// `PlaybackStarted` or `PlaybackStartFailed`.
    fn play(&mut self);

    /// Pause playback. No completion event follows a pause.
    fn pause(&mut self);
}

/// Tokio-backed sink for headless runs.
///
/// Accepts every clip, reports a start, and synthesizes `ClipEnded` after
/// a fixed simulated duration. URLs containing `fail_marker` are rejected
/// at start, exercising the engine's retry path.
pub struct SimulatedSink {
    events: mpsc::UnboundedSender<SessionEvent>,
    clip_ms: u64,
    fail_marker: Option<String>,
    current: Option<String>,
    end_task: Option<JoinHandle<()>>,
}

impl SimulatedSink {
    pub fn new(
        events: mpsc::UnboundedSender<SessionEvent>,
        clip_ms: u64,
        fail_marker: Option<String>,
    ) -> Self {
        Self {
            events,
            clip_ms,
            fail_marker,
            current: None,
            end_task: None,
        }
    }

    fn cancel_end_task(&mut self) {
        if let Some(task) = self.end_task.take() {
            task.abort();
        }
    }
}

impl AudioSink for SimulatedSink {
    fn set_source(&mut self, url: &str) {
        self.current = Some(url.to_string());
    }

    fn play(&mut self) {
        self.cancel_end_task();

        let Some(url) = self.current.clone() else {
            let _ = self.events.send(SessionEvent::PlaybackStartFailed {
                reason: "no source set".to_string(),
            });
            return;
        };

        if let Some(marker) = &self.fail_marker {
            if url.contains(marker.as_str()) {
                info!(%url, "simulated start failure");
                let _ = self.events.send(SessionEvent::PlaybackStartFailed {
                    reason: format!("simulated failure for {url}"),
                });
                return;
            }
        }

        info!(%url, "playing");
        let _ = self.events.send(SessionEvent::PlaybackStarted);

        let events = self.events.clone();
        let clip_ms = self.clip_ms;
        self.end_task = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(clip_ms)).await;
            let _ = events.send(SessionEvent::ClipEnded);
        }));
    }

    fn pause(&mut self) {
        self.cancel_end_task();
        debug!("paused");
    }
}

impl Drop for SimulatedSink {
    fn drop(&mut self) {
        self.cancel_end_task();
    }
}
