//! Idle commentary integration tests
//!
//! Debounced quiet-period detection, randomized rescheduling, section
//! routing of ambient clips, and the projects-section bias, exercised
//! through the engine's explicit clock.

mod helpers;

use commentary_engine::{CommentaryEvent, EngineConfig, SessionEvent};

/// Enable, enter a section while still muted (selection is burned but
/// nothing plays), then unmute. Leaves a clean slate for idle timing.
fn quiet_session_in(section: &str) -> (commentary_engine::CommentaryEngine, helpers::RecordingSink) {
    quiet_session_with(section, vec![0.0])
}

fn quiet_session_with(
    section: &str,
    rng_values: Vec<f64>,
) -> (commentary_engine::CommentaryEngine, helpers::RecordingSink) {
    let (mut engine, sink) = helpers::engine_with_sink(EngineConfig::default(), rng_values);
    engine.enable();
    engine.on_section_enter(section);
    engine.set_muted(false);
    (engine, sink)
}

// ============================================================================
// Quiet period and debounce
// ============================================================================

/// **Given:** an enabled session sitting in the hero section
/// **When:** the initial quiet period passes without interaction
/// **Then:** idle commentary fires exactly once, at the configured delay
#[test]
fn test_idle_fires_after_initial_quiet_period() {
    let (mut engine, sink) = quiet_session_in("hero");
    let mut rx = engine.event_bus().subscribe();

    engine.advance_to(4999);
    assert_eq!(sink.play_count(), 0);

    engine.advance_to(5000);
    assert_eq!(sink.play_count(), 1);
    assert!(sink.played_urls()[0].starts_with("/audio/sports-announcer/hero/hero-enter-"));

    let events = helpers::drain(&mut rx);
    assert_eq!(helpers::count_of(&events, "IdleTriggered"), 1);
}

/// **Given:** an enabled session with a pending idle timer
/// **When:** interactions keep arriving before the quiet period completes
/// **Then:** each one pushes the timer back by the full delay
#[test]
fn test_interactions_debounce_idle_timer() {
    let (mut engine, sink) = quiet_session_in("hero");
    let mut rx = engine.event_bus().subscribe();

    engine.advance_to(3000);
    engine.register_interaction();
    engine.advance_to(4500);
    engine.register_interaction();

    engine.advance_to(9499);
    assert_eq!(sink.play_count(), 0);
    assert_eq!(helpers::count_of(&helpers::drain(&mut rx), "IdleTriggered"), 0);

    engine.advance_to(9500);
    assert_eq!(sink.play_count(), 1);
    assert_eq!(helpers::count_of(&helpers::drain(&mut rx), "IdleTriggered"), 1);
}

/// **Given:** idle commentary that has just fired
/// **When:** the timer re-arms
/// **Then:** the next firing lands inside the randomized interval band
#[test]
fn test_idle_reschedules_inside_randomized_band() {
    // Draws: section entry pick, idle pick, reschedule 0.5, idle pick,
    // reschedule 0.9999.
    let (mut engine, _sink) = quiet_session_with("hero", vec![0.0, 0.0, 0.5, 0.0, 0.9999]);

    engine.advance_to(5000);
    // 6000 + 0.5 * 4000 after the firing.
    assert_eq!(engine.next_deadline(), Some(13000));

    engine.advance_to(13000);
    // 6000 + floor(0.9999 * 4000) after the second firing.
    assert_eq!(engine.next_deadline(), Some(22999));
}

/// **Given:** a clip that finishes playing
/// **When:** the completion lands
/// **Then:** idle commentary waits a full quiet period from that moment
#[test]
fn test_clip_completion_defers_idle() {
    let (mut engine, sink) = helpers::activated(vec![0.0]);
    engine.on_section_enter("hero");
    engine.advance_to(2000);
    engine.dispatch(SessionEvent::ClipEnded);

    engine.advance_to(3000);
    assert_eq!(engine.next_deadline(), Some(7000));

    engine.advance_to(6999);
    assert_eq!(sink.play_count(), 1);
    engine.advance_to(7000);
    assert_eq!(sink.play_count(), 2);
}

// ============================================================================
// Section routing of ambient clips
// ============================================================================

/// **Given:** idle firings in two different sections
/// **Then:** each voices the pool of the section the visitor is in
#[test]
fn test_idle_clip_follows_current_section() {
    let (mut engine, sink) = quiet_session_in("about");
    let mut rx = engine.event_bus().subscribe();

    engine.advance_to(5000);
    assert!(sink.played_urls()[0].starts_with("/audio/sports-announcer/about/about-enter-"));

    engine.dispatch(SessionEvent::ClipEnded);
    engine.advance_to(6000);
    engine.on_section_enter("faq");
    engine.dispatch(SessionEvent::ClipEnded);
    engine.advance_to(7000);

    engine.advance_to(11000);
    let last = sink.played_urls().last().cloned().unwrap();
    assert!(last.starts_with("/audio/sports-announcer/faq/faq-question-click-"));

    let sections: Vec<String> = helpers::drain(&mut rx)
        .into_iter()
        .filter_map(|event| match event {
            CommentaryEvent::IdleTriggered { section, .. } => Some(section),
            _ => None,
        })
        .collect();
    assert_eq!(sections, vec!["about".to_string(), "faq".to_string()]);
}

/// **Given:** the visitor idling in the projects section
/// **When:** the bias trial selects the project branch
/// **Then:** a random project's hover pool provides the ambient clip
#[test]
fn test_projects_idle_project_branch() {
    // Draws: entry pick, bias 0.1 (< 0.6), slug 0.5 (seventh project),
    // clip pick, reschedule.
    let (mut engine, sink) = quiet_session_with("projects", vec![0.0, 0.1, 0.5, 0.0, 0.0]);

    engine.advance_to(5000);
    assert_eq!(
        sink.played_urls(),
        vec!["/audio/sports-announcer/projects/projects-dreams-hover-1.mp3".to_string()]
    );
}

/// **Given:** the visitor idling in the projects section
/// **When:** the bias trial selects the section branch
/// **Then:** the projects entry pool provides the ambient clip, rotating
/// independently of actual section entries
#[test]
fn test_projects_idle_section_branch() {
    // Draws: entry pick, bias 0.9 (>= 0.6), clip pick, reschedule.
    let (mut engine, sink) = quiet_session_with("projects", vec![0.0, 0.9, 0.0, 0.0]);

    engine.advance_to(5000);
    assert_eq!(
        sink.played_urls(),
        vec!["/audio/sports-announcer/projects/projects-enter-1.mp3".to_string()]
    );
}

/// **Given:** the visitor idling in a section with no recorded pools
/// **Then:** the generic ambient pool speaks, sharing recency with every
/// other generic fallback
#[test]
fn test_unknown_section_idles_on_generic_pool() {
    let (mut engine, sink) = quiet_session_in("newsletter");

    engine.advance_to(5000);
    // The muted section entry already burned generic index 1.
    assert_eq!(
        sink.played_urls(),
        vec!["/audio/sports-announcer/generic/generic-idle-2.mp3".to_string()]
    );
}

// ============================================================================
// Enable and disable
// ============================================================================

/// **Given:** a session with a pending idle timer
/// **When:** commentary is disabled
/// **Then:** the timer is cancelled outright; re-enabling starts a fresh
/// quiet period
#[test]
fn test_disable_cancels_idle_and_reenable_rearms() {
    let (mut engine, sink) = helpers::engine_with_sink(EngineConfig::default(), vec![0.0]);
    engine.enable();
    engine.on_section_enter("hero");
    let mut rx = engine.event_bus().subscribe();

    engine.disable();
    assert_eq!(engine.next_deadline(), None);
    engine.advance_to(60000);
    assert_eq!(sink.play_count(), 0);
    assert_eq!(helpers::count_of(&helpers::drain(&mut rx), "IdleTriggered"), 0);

    engine.enable();
    assert_eq!(engine.next_deadline(), Some(65000));
    engine.advance_to(65000);
    // Still muted: the firing is reported but the clip is rejected.
    let events = helpers::drain(&mut rx);
    assert_eq!(helpers::count_of(&events, "IdleTriggered"), 1);
    assert_eq!(helpers::count_of(&events, "ClipDropped"), 1);
    assert_eq!(sink.play_count(), 0);
}

// ============================================================================
// Configuration
// ============================================================================

/// **Given:** a config with custom profile, extension, and timings
/// **Then:** URLs and every timer follow the configured values
#[test]
fn test_custom_config_drives_urls_and_timing() {
    let config = EngineConfig {
        voice_profile: "stadium-announcer".to_string(),
        clip_extension: "ogg".to_string(),
        cooldown_ms: 50,
        dispatch_retry_ms: 25,
        idle_delay_ms: 100,
        idle_interval_min_ms: 200,
        idle_interval_max_ms: 300,
        ..Default::default()
    };
    let (mut engine, sink) = helpers::engine_with_sink(config, vec![0.0]);
    engine.enable();
    engine.set_muted(false);

    engine.on_section_enter("hero");
    assert_eq!(
        sink.played_urls(),
        vec!["/audio/stadium-announcer/hero/hero-enter-1.ogg".to_string()]
    );

    engine.dispatch(SessionEvent::ClipEnded);
    engine.advance_to(50);
    engine.advance_to(100);
    assert_eq!(sink.play_count(), 2);
    // Rescheduled at the band minimum.
    assert_eq!(engine.next_deadline(), Some(300));
}
