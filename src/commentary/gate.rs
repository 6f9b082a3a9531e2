//! Playback gate
//!
//! Owns the mute flag, the Idle/Playing/Cooldown state, the URL in
//! flight, and the audio sink itself, so every sink call and every state
//! transition happens in one place. Transition methods return what the
//! caller needs for notices and timer arming; they never touch timers or
//! the event bus themselves.

use tracing::{debug, error, warn};

use crate::audio::AudioSink;
use crate::commentary::state::PlaybackState;

pub struct PlaybackGate {
    state: PlaybackState,
    muted: bool,
    current_url: Option<String>,
    sink: Option<Box<dyn AudioSink>>,
}

impl PlaybackGate {
    /// Create a gate around the playback element.
    ///
    /// With `sink: None` the gate is permanently inert: begin attempts are
    /// refused without a state change. Sessions start muted.
    pub fn new(sink: Option<Box<dyn AudioSink>>) -> Self {
        if sink.is_none() {
            error!("audio sink unavailable, commentary playback is inert");
        }
        Self {
            state: PlaybackState::Idle,
            muted: true,
            current_url: None,
            sink,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Whether a new clip may start right now.
    pub fn can_start(&self) -> bool {
        !self.muted && self.state == PlaybackState::Idle
    }

    /// Hand a clip to the sink and transition Idle to Playing.
    ///
    /// Returns false, leaving state untouched, when gating fails or there
    /// is no sink.
    pub fn begin(&mut self, url: &str) -> bool {
        if !self.can_start() {
            debug!(%url, state = %self.state, muted = self.muted, "begin refused");
            return false;
        }
        let Some(sink) = self.sink.as_mut() else {
            debug!(%url, "no audio sink, clip discarded");
            return false;
        };
        sink.set_source(url);
        sink.play();
        self.current_url = Some(url.to_string());
        self.state = PlaybackState::Playing;
        true
    }

    /// The sink refused to start: revert Playing to Idle.
    ///
    /// Returns the abandoned URL. The caller schedules the dispatch retry.
    pub fn start_failed(&mut self) -> Option<String> {
        if self.state != PlaybackState::Playing {
            warn!(state = %self.state, "start failure with nothing in flight");
            return None;
        }
        self.state = PlaybackState::Idle;
        self.current_url.take()
    }

    /// The clip is over (completed or errored): Playing to Cooldown.
    ///
    /// Returns the finished URL. The caller arms the cooldown timer.
    pub fn clip_over(&mut self) -> Option<String> {
        if self.state != PlaybackState::Playing {
            debug!(state = %self.state, "clip end with nothing in flight");
            return None;
        }
        self.state = PlaybackState::Cooldown;
        self.current_url.take()
    }

    /// The cooldown timer elapsed: Cooldown to Idle.
    pub fn cooldown_elapsed(&mut self) -> bool {
        if self.state != PlaybackState::Cooldown {
            warn!(state = %self.state, "cooldown expiry outside cooldown");
            return false;
        }
        self.state = PlaybackState::Idle;
        true
    }

    /// Change the mute flag. Setting the current value is a no-op.
    ///
    /// Muting pauses the sink; an in-flight clip is treated as over
    /// (Playing to Cooldown) and its URL is returned so the caller can
    /// report the interruption and arm the cooldown.
    pub fn set_muted(&mut self, muted: bool) -> Option<String> {
        if self.muted == muted {
            return None;
        }
        self.muted = muted;
        if !muted {
            return None;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.pause();
        }
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Cooldown;
            return self.current_url.take();
        }
        None
    }
}
