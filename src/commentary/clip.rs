//! Clip identity and URL resolution
//!
//! A commentary clip is addressed by section, optional project context,
//! interaction kind, and a 1-based index into its pool. URLs follow the
//! fixed asset convention
//! `/audio/{profile}/{section}/{section}-{label...}-{index}.{ext}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction kind, doubling as the label segment in clip filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipKind {
    Enter,
    Hover,
    Click,
    Viewport,
    QuestionClick,
    FormFocus,
    /// Generic ambient lines, not tied to an interaction.
    Idle,
}

impl ClipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipKind::Enter => "enter",
            ClipKind::Hover => "hover",
            ClipKind::Click => "click",
            ClipKind::Viewport => "viewport",
            ClipKind::QuestionClick => "question-click",
            ClipKind::FormFocus => "form-focus",
            ClipKind::Idle => "idle",
        }
    }
}

impl fmt::Display for ClipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Arbitration level for pending clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// A resolved clip selection, one step short of its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRequest {
    pub section: String,
    /// Project slug for project clips; `None` for plain section clips.
    pub context: Option<String>,
    pub kind: ClipKind,
    /// 1-based index within the pool.
    pub index: u32,
}

impl ClipRequest {
    /// Clip drawn from a section-level pool.
    pub fn section(section: &str, kind: ClipKind, index: u32) -> Self {
        Self {
            section: section.to_string(),
            context: None,
            kind,
            index,
        }
    }

    /// Clip drawn from a per-project pool under the projects section.
    pub fn project(project: &str, kind: ClipKind, index: u32) -> Self {
        Self {
            section: "projects".to_string(),
            context: Some(project.to_string()),
            kind,
            index,
        }
    }

    /// Render the asset URL for this clip.
    pub fn url(&self, voice_profile: &str, extension: &str) -> String {
        match &self.context {
            Some(context) => format!(
                "/audio/{}/{}/{}-{}-{}-{}.{}",
                voice_profile, self.section, self.section, context, self.kind, self.index, extension
            ),
            None => format!(
                "/audio/{}/{}/{}-{}-{}.{}",
                voice_profile, self.section, self.section, self.kind, self.index, extension
            ),
        }
    }
}
