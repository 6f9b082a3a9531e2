//! # Commentary Engine
//!
//! Event-driven playback engine for scroll- and interaction-triggered
//! commentary clips.
//!
//! **Purpose:** Route page sections and element interactions to recorded
//! clip pools, pick clips with per-context recency memory, arbitrate a
//! single-slot priority queue, gate playback behind mute/cooldown state,
//! and schedule ambient idle commentary on a randomized interval.
//!
//! **Architecture:** Deterministic synchronous core (single dispatch entry
//! point plus an explicit timer wheel, injected randomness) hosted by a
//! tokio driver task that serializes inbound events and maps timer
//! deadlines onto the runtime clock.

pub mod audio;
pub mod commentary;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod rng;
pub mod sched;

pub use commentary::{ClipKind, CommentaryEngine, EngineStatus, PlaybackState, Priority};
pub use config::EngineConfig;
pub use driver::CommentaryHandle;
pub use error::{Error, Result};
pub use events::{CommentaryEvent, EventBus, SessionEvent};
