//! Recency-aware clip selection
//!
//! Picks clip indices uniformly from those not yet played under a context
//! key. Memory is per key and session scoped: once every index in a key's
//! range has been handed out, the key resets and the full range becomes
//! available again. The only possible immediate repeat is across that
//! reset edge.

use std::collections::{HashMap, HashSet};

use crate::rng::RandomSource;

/// Per-context no-repeat clip picker.
#[derive(Debug, Default)]
pub struct ClipPicker {
    played: HashMap<String, HashSet<u32>>,
}

impl ClipPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose an index in `[1, max_index]` not yet recorded for this key.
    ///
    /// Keys are created lazily on first use. A `max_index` of zero is
    /// clamped to one.
    pub fn pick(&mut self, context_key: &str, max_index: u32, rng: &mut dyn RandomSource) -> u32 {
        let max_index = max_index.max(1);
        let played = self.played.entry(context_key.to_string()).or_default();

        let mut available: Vec<u32> = (1..=max_index).filter(|i| !played.contains(i)).collect();
        if available.is_empty() {
            played.clear();
            available = (1..=max_index).collect();
        }

        let chosen = available[rng.pick_index(available.len())];
        played.insert(chosen);
        chosen
    }

    /// Number of indices remembered for a key. Unknown keys report zero.
    pub fn played_count(&self, context_key: &str) -> usize {
        self.played.get(context_key).map_or(0, HashSet::len)
    }
}
