//! Commentary simulator (commentary-sim) - Main entry point
//!
//! Headless harness for the commentary engine: replays a scripted browsing
//! session (JSON lines of timed session events) against a real engine task
//! with a simulated audio sink, and logs every notification the engine
//! broadcasts. Useful for tuning pool tables and timing parameters without
//! a browser in the loop.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tokio::signal;
use tokio::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commentary_engine::audio::SimulatedSink;
use commentary_engine::driver;
use commentary_engine::rng::SeededRandom;
use commentary_engine::{ClipKind, CommentaryEngine, CommentaryEvent, EngineConfig, SessionEvent};

/// Command-line arguments for commentary-sim
#[derive(Parser, Debug)]
#[command(name = "commentary-sim")]
#[command(about = "Session simulator for the commentary playback engine")]
#[command(version)]
struct Args {
    /// TOML file with engine parameters (defaults used when omitted)
    #[arg(short, long, env = "COMMENTARY_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-lines event script; omit to run the built-in demo session
    #[arg(short, long, env = "COMMENTARY_SCRIPT")]
    script: Option<PathBuf>,

    /// RNG seed for reproducible runs (random when omitted)
    #[arg(long, env = "COMMENTARY_SEED")]
    seed: Option<u64>,

    /// Simulated clip duration in milliseconds
    #[arg(long, default_value = "1500")]
    clip_ms: u64,

    /// Clip URLs containing this marker fail to start (exercises retry)
    #[arg(long)]
    fail_marker: Option<String>,

    /// How long to keep running after the last scripted event
    #[arg(long, default_value = "8000")]
    tail_ms: u64,
}

/// One line of the event script.
#[derive(Debug, Deserialize)]
struct ScriptEntry {
    at_ms: u64,
    event: SessionEvent,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commentary_engine=debug,commentary_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let rng = match args.seed {
        Some(seed) => {
            info!(seed, "using fixed RNG seed");
            SeededRandom::new(seed)
        }
        None => SeededRandom::from_entropy(),
    };

    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => demo_script(),
    };
    info!(events = script.len(), "session script ready");

    let (tx, rx) = driver::channel();
    let sink = SimulatedSink::new(tx.clone(), args.clip_ms, args.fail_marker.clone());
    let engine = CommentaryEngine::new(config, Some(Box::new(sink)), Box::new(rng));
    let (handle, engine_task) = driver::spawn(engine, tx, rx);

    // Log every broadcast notification, counting dispatched clips.
    let clips_played = Arc::new(AtomicU64::new(0));
    let printer = {
        let mut events = handle.subscribe();
        let clips_played = clips_played.clone();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if matches!(event, CommentaryEvent::ClipDispatched { .. }) {
                    clips_played.fetch_add(1, Ordering::Relaxed);
                }
                match serde_json::to_string(&event) {
                    Ok(json) => info!(target: "commentary_sim::events", "{json}"),
                    Err(_) => info!(target: "commentary_sim::events", "{event:?}"),
                }
            }
        })
    };

    let replay = async {
        let start = Instant::now();
        for entry in script {
            tokio::time::sleep_until(start + Duration::from_millis(entry.at_ms)).await;
            handle.send(entry.event);
        }
        // Let trailing playback and idle commentary run out.
        tokio::time::sleep(Duration::from_millis(args.tail_ms)).await;
    };

    tokio::select! {
        _ = replay => info!("session script complete"),
        _ = shutdown_signal() => {},
    }

    engine_task.abort();
    printer.abort();
    info!(
        clips_played = clips_played.load(Ordering::Relaxed),
        "simulation finished"
    );
    Ok(())
}

fn load_script(path: &Path) -> Result<Vec<ScriptEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let entry: ScriptEntry = serde_json::from_str(line)
            .with_context(|| format!("script line {}", number + 1))?;
        entries.push(entry);
    }
    entries.sort_by_key(|entry| entry.at_ms);
    Ok(entries)
}

/// Built-in session: greeting, section tour, project interactions, a mute
/// round trip, and enough quiet to hear idle commentary.
fn demo_script() -> Vec<ScriptEntry> {
    let entry = |at_ms, event| ScriptEntry { at_ms, event };
    vec![
        entry(0, SessionEvent::Enable),
        entry(50, SessionEvent::SetMuted { muted: false }),
        entry(100, SessionEvent::OpeningGreeting),
        entry(400, SessionEvent::SectionEntered { section: "hero".into() }),
        entry(2600, SessionEvent::Interaction),
        entry(3600, SessionEvent::SectionEntered { section: "projects".into() }),
        entry(4200, SessionEvent::ProjectInteraction { project: "earth".into(), kind: ClipKind::Hover }),
        entry(5200, SessionEvent::ProjectInteraction { project: "earth".into(), kind: ClipKind::Click }),
        entry(7000, SessionEvent::ProjectInteraction { project: "platypus".into(), kind: ClipKind::Viewport }),
        entry(9000, SessionEvent::SectionEntered { section: "awards".into() }),
        entry(9500, SessionEvent::GenericHover { section: "awards".into(), element: "award-card".into() }),
        entry(12000, SessionEvent::SectionEntered { section: "faq".into() }),
        entry(12500, SessionEvent::GenericHover { section: "faq".into(), element: "faq-item".into() }),
        entry(14000, SessionEvent::SectionEntered { section: "about".into() }),
        entry(22000, SessionEvent::SetMuted { muted: true }),
        entry(23000, SessionEvent::SetMuted { muted: false }),
        entry(24000, SessionEvent::SectionEntered { section: "contact".into() }),
    ]
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_script_skips_blanks_and_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# warmup").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"at_ms": 100, "event": {{"type": "Enable"}}}}"#).unwrap();
        writeln!(
            file,
            r#"{{"at_ms": 50, "event": {{"type": "SectionEntered", "section": "hero"}}}}"#
        )
        .unwrap();

        let entries = load_script(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        // Sorted by time.
        assert_eq!(entries[0].at_ms, 50);
        assert_eq!(entries[1].at_ms, 100);
    }

    #[test]
    fn test_load_script_reports_bad_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{not json}}").unwrap();
        let error = load_script(file.path()).unwrap_err();
        assert!(error.to_string().contains("script line 1"));
    }

    #[test]
    fn test_demo_script_is_time_ordered() {
        let script = demo_script();
        assert!(!script.is_empty());
        assert!(script.windows(2).all(|pair| pair[0].at_ms <= pair[1].at_ms));
    }
}
