//! Section and interaction routing
//!
//! Maps interaction context (section entered, element hovered, project
//! touched, idle firing) to a clip pool and draws from it through the
//! recency-aware picker. Pool contents mirror the recorded asset set:
//! per-section entry lines, per-section idle lines, short element hover
//! lines, three-way project lines, and a small generic pool that catches
//! everything unmapped.

use tracing::debug;

use crate::commentary::clip::{ClipKind, ClipRequest, Priority};
use crate::commentary::picker::ClipPicker;
use crate::rng::RandomSource;

/// A clip pool: filename label plus how many clips were recorded for it.
#[derive(Debug, Clone, Copy)]
struct Pool {
    kind: ClipKind,
    count: u32,
}

/// Entry pools per section. The FAQ section enters on its question lines;
/// every other mapped section has dedicated entry lines.
const ENTER_POOLS: &[(&str, Pool)] = &[
    ("hero", Pool { kind: ClipKind::Enter, count: 8 }),
    ("projects", Pool { kind: ClipKind::Enter, count: 6 }),
    ("process", Pool { kind: ClipKind::Enter, count: 4 }),
    ("awards", Pool { kind: ClipKind::Enter, count: 5 }),
    ("testimonials", Pool { kind: ClipKind::Enter, count: 4 }),
    ("about", Pool { kind: ClipKind::Enter, count: 5 }),
    ("faq", Pool { kind: ClipKind::QuestionClick, count: 7 }),
    ("contact", Pool { kind: ClipKind::Enter, count: 4 }),
];

/// Idle pools per section. Entry lines double as idle lines for most
/// sections; faq and contact voice their interaction lines instead. The
/// projects section is handled separately (see [`Router::section_idle`]).
const IDLE_POOLS: &[(&str, Pool)] = &[
    ("hero", Pool { kind: ClipKind::Enter, count: 8 }),
    ("process", Pool { kind: ClipKind::Enter, count: 4 }),
    ("awards", Pool { kind: ClipKind::Enter, count: 5 }),
    ("testimonials", Pool { kind: ClipKind::Enter, count: 4 }),
    ("about", Pool { kind: ClipKind::Enter, count: 5 }),
    ("faq", Pool { kind: ClipKind::QuestionClick, count: 7 }),
    ("contact", Pool { kind: ClipKind::FormFocus, count: 4 }),
];

/// Hover pools keyed by element kind, each owned by a section.
const HOVER_POOLS: &[(&str, (&str, Pool))] = &[
    ("award-card", ("awards", Pool { kind: ClipKind::Hover, count: 3 })),
    ("testimonial-card", ("testimonials", Pool { kind: ClipKind::Hover, count: 3 })),
    ("process-step", ("process", Pool { kind: ClipKind::Hover, count: 3 })),
    ("skill-item", ("about", Pool { kind: ClipKind::Hover, count: 3 })),
    ("contact-method", ("contact", Pool { kind: ClipKind::Hover, count: 3 })),
    ("faq-item", ("faq", Pool { kind: ClipKind::QuestionClick, count: 7 })),
];

/// The twelve project slugs with recorded commentary.
const PROJECTS: &[&str] = &[
    "universe",
    "earth",
    "platypus",
    "sunsets",
    "brain",
    "aurora",
    "dreams",
    "mountains",
    "coffee",
    "dogs",
    "fibonacci",
    "sleep",
];

const PROJECTS_SECTION: &str = "projects";
const GENERIC_SECTION: &str = "generic";
const GENERIC_POOL: Pool = Pool { kind: ClipKind::Idle, count: 4 };
const GENERIC_KEY: &str = "generic-idle";
const PROJECTS_ENTER_IDLE_KEY: &str = "projects-enter-idle";
const OPENING_KEY: &str = "opening-greeting";
const OPENING_POOL: Pool = Pool { kind: ClipKind::Enter, count: 8 };

fn table_get<'a, T>(table: &'a [(&'static str, T)], key: &str) -> Option<&'a T> {
    table.iter().find(|(name, _)| *name == key).map(|(_, value)| value)
}

/// Stateless resolver from interaction context to clip requests.
///
/// Recency state lives in the [`ClipPicker`] passed to each call; every
/// pool draws under its own key, so entry lines and idle lines over the
/// same files still rotate independently.
#[derive(Debug, Default)]
pub struct Router;

impl Router {
    pub fn new() -> Self {
        Self
    }

    /// Entry clip for a section. Unmapped sections fall back to the
    /// generic pool.
    pub fn section_enter(
        &self,
        section: &str,
        picker: &mut ClipPicker,
        rng: &mut dyn RandomSource,
    ) -> ClipRequest {
        match table_get(ENTER_POOLS, section) {
            Some(pool) => {
                let key = format!("{section}-section-enter");
                let index = picker.pick(&key, pool.count, rng);
                ClipRequest::section(section, pool.kind, index)
            }
            None => {
                debug!(section, "no enter pool, using generic");
                self.generic(picker, rng)
            }
        }
    }

    /// Idle clip for a section. The projects section runs a Bernoulli
    /// trial: with probability `project_bias` a random project clip,
    /// otherwise its own entry pool under a separate recency key.
    pub fn section_idle(
        &self,
        section: &str,
        project_bias: f64,
        picker: &mut ClipPicker,
        rng: &mut dyn RandomSource,
    ) -> ClipRequest {
        if section == PROJECTS_SECTION {
            if rng.next_f64() < project_bias {
                return self.project_idle(picker, rng);
            }
            let pool = table_get(ENTER_POOLS, PROJECTS_SECTION)
                .copied()
                .unwrap_or(GENERIC_POOL);
            let index = picker.pick(PROJECTS_ENTER_IDLE_KEY, pool.count, rng);
            return ClipRequest::section(PROJECTS_SECTION, pool.kind, index);
        }
        match table_get(IDLE_POOLS, section) {
            Some(pool) => {
                let key = format!("{section}-idle");
                let index = picker.pick(&key, pool.count, rng);
                ClipRequest::section(section, pool.kind, index)
            }
            None => {
                debug!(section, "no idle pool, using generic");
                self.generic(picker, rng)
            }
        }
    }

    /// Ambient clip for a random project.
    pub fn project_idle(&self, picker: &mut ClipPicker, rng: &mut dyn RandomSource) -> ClipRequest {
        let project = PROJECTS[rng.pick_index(PROJECTS.len())];
        let key = format!("idle-project-{project}");
        let index = picker.pick(&key, 3, rng);
        ClipRequest::project(project, ClipKind::Hover, index)
    }

    /// Clip and priority for a direct project interaction. Clicks are the
    /// only high-priority source.
    pub fn project_interaction(
        &self,
        project: &str,
        kind: ClipKind,
        picker: &mut ClipPicker,
        rng: &mut dyn RandomSource,
    ) -> (ClipRequest, Priority) {
        let count = match kind {
            ClipKind::Viewport => 1,
            _ => 3,
        };
        let key = format!("project-{project}-{kind}");
        let index = picker.pick(&key, count, rng);
        let priority = if kind == ClipKind::Click {
            Priority::High
        } else {
            Priority::Normal
        };
        (ClipRequest::project(project, kind, index), priority)
    }

    /// Clip for a hover on a non-project element. The pool's own section
    /// wins over the section the hover happened in; unmapped element kinds
    /// fall back to the generic pool.
    pub fn element_hover(
        &self,
        section: &str,
        element: &str,
        picker: &mut ClipPicker,
        rng: &mut dyn RandomSource,
    ) -> ClipRequest {
        match table_get(HOVER_POOLS, element) {
            Some((pool_section, pool)) => {
                let key = format!("{pool_section}-{element}");
                let index = picker.pick(&key, pool.count, rng);
                ClipRequest::section(pool_section, pool.kind, index)
            }
            None => {
                debug!(section, element, "no hover pool, using generic");
                self.generic(picker, rng)
            }
        }
    }

    /// Hero greeting for first activation, under its own recency key.
    pub fn opening_greeting(
        &self,
        picker: &mut ClipPicker,
        rng: &mut dyn RandomSource,
    ) -> ClipRequest {
        let index = picker.pick(OPENING_KEY, OPENING_POOL.count, rng);
        ClipRequest::section("hero", OPENING_POOL.kind, index)
    }

    fn generic(&self, picker: &mut ClipPicker, rng: &mut dyn RandomSource) -> ClipRequest {
        let index = picker.pick(GENERIC_KEY, GENERIC_POOL.count, rng);
        ClipRequest::section(GENERIC_SECTION, GENERIC_POOL.kind, index)
    }
}
