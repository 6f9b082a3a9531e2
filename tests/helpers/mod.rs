//! Shared test infrastructure for engine integration tests
//!
//! Provides a recording audio sink, pre-wired engine builders, and event
//! collection utilities used across the test files.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use commentary_engine::audio::AudioSink;
use commentary_engine::rng::SequenceRandom;
use commentary_engine::{CommentaryEngine, CommentaryEvent, EngineConfig};

/// One call observed by the [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    SetSource(String),
    Play,
    Pause,
}

/// Sink that records every call for later assertion. Clones share state.
#[derive(Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    source: Arc<Mutex<Option<String>>>,
    played: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// URLs in the order they were played.
    pub fn played_urls(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }

    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }

    pub fn pause_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == SinkCall::Pause)
            .count()
    }
}

impl AudioSink for RecordingSink {
    fn set_source(&mut self, url: &str) {
        *self.source.lock().unwrap() = Some(url.to_string());
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::SetSource(url.to_string()));
    }

    fn play(&mut self) {
        let url = self.source.lock().unwrap().clone().unwrap_or_default();
        self.played.lock().unwrap().push(url);
        self.calls.lock().unwrap().push(SinkCall::Play);
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(SinkCall::Pause);
    }
}

/// Engine with a recording sink and a scripted random sequence.
pub fn engine_with_sink(
    config: EngineConfig,
    rng_values: Vec<f64>,
) -> (CommentaryEngine, RecordingSink) {
    let sink = RecordingSink::default();
    let engine = CommentaryEngine::new(
        config,
        Some(Box::new(sink.clone())),
        Box::new(SequenceRandom::new(rng_values)),
    );
    (engine, sink)
}

/// Enabled, unmuted engine with default configuration.
pub fn activated(rng_values: Vec<f64>) -> (CommentaryEngine, RecordingSink) {
    let (mut engine, sink) = engine_with_sink(EngineConfig::default(), rng_values);
    engine.enable();
    engine.set_muted(false);
    (engine, sink)
}

/// Drain everything currently buffered on a bus subscription.
pub fn drain(rx: &mut broadcast::Receiver<CommentaryEvent>) -> Vec<CommentaryEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Count events of one type in a drained batch.
pub fn count_of(events: &[CommentaryEvent], event_type: &str) -> usize {
    events
        .iter()
        .filter(|event| event.event_type() == event_type)
        .count()
}

/// Trailing 1-based clip index parsed from a rendered URL.
pub fn clip_index(url: &str) -> u32 {
    url.rsplit('-')
        .next()
        .and_then(|tail| tail.split('.').next())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or_else(|| panic!("no clip index in {url}"))
}
