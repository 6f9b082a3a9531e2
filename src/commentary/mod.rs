//! Clip selection and playback management

pub mod clip;
pub mod engine;
pub mod gate;
pub mod idle;
pub mod picker;
pub mod queue;
pub mod router;
pub mod state;

pub use clip::{ClipKind, ClipRequest, Priority};
pub use engine::CommentaryEngine;
pub use gate::PlaybackGate;
pub use idle::IdleTracker;
pub use picker::ClipPicker;
pub use queue::ClipQueue;
pub use router::Router;
pub use state::{EngineStatus, PlaybackState};
