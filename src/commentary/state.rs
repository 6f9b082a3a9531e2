//! Playback state and status snapshots

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback gate state. Exactly one of these holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing in flight; dispatch may proceed.
    Idle,
    /// A clip has been handed to the sink and not yet finished.
    Playing,
    /// Post-clip dead time; dispatch blocked until the cooldown elapses.
    Cooldown,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Cooldown => write!(f, "cooldown"),
        }
    }
}

/// Read-only snapshot of session state, assembled on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub playback_state: PlaybackState,
    pub queue_len: usize,
    pub muted: bool,
    pub enabled: bool,
    pub current_section: Option<String>,
    /// Engine time of the most recent registered interaction.
    pub last_interaction_ms: u64,
}
