//! Priority-ordered keyword classification.
//!
//! One classifier instance per dimension (conflict type, sector), both the
//! same shape: an ordered list of `(label, triggers)` pairs evaluated
//! against normalized text by substring containment. The first label with
//! any trigger present wins; a text triggering nothing gets the fallback.
//!
//! Matching is substring containment, not word boundaries: a trigger
//! matching inside a larger word still counts.

use conflictometro_common::normalize;

/// Ordered rule list over labels of type `L`.
pub struct Classifier<L: Copy> {
    rules: Vec<(L, Vec<String>)>,
    fallback: L,
}

impl<L: Copy> Classifier<L> {
    /// Build a classifier. Triggers are normalized up front so lookups run
    /// against the same canonical form as the text; triggers that
    /// normalize to nothing are dropped (an empty trigger would match
    /// every text).
    pub fn new(rules: impl IntoIterator<Item = (L, Vec<String>)>, fallback: L) -> Self {
        let rules = rules
            .into_iter()
            .map(|(label, triggers)| {
                let triggers: Vec<String> = triggers
                    .iter()
                    .map(|t| normalize(t))
                    .filter(|t| !t.is_empty())
                    .collect();
                (label, triggers)
            })
            .collect();
        Self { rules, fallback }
    }

    /// Classify a text. Total: always returns exactly one label.
    pub fn classify(&self, text: &str) -> L {
        let text = normalize(text);
        for (label, triggers) in &self.rules {
            if triggers.iter().any(|t| text.contains(t.as_str())) {
                return *label;
            }
        }
        self.fallback
    }
}
