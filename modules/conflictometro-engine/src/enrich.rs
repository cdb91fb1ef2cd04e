//! Entity enrichment seam.
//!
//! The pipeline consumes an [`EntityExtractor`] as an opaque collaborator:
//! whatever it returns lands in the record's enrichment sets, and whatever
//! goes wrong degrades to empty sets. Classification and dedup never depend
//! on it.

use anyhow::Result;
use regex::Regex;

use conflictometro_common::{normalize, ConflictometroError, Enrichment};

use crate::lexicon::Lexicon;
use crate::territory::capitalize;

/// Extracts entities, labor actors and place mentions from raw text.
pub trait EntityExtractor {
    fn extract(&self, text: &str) -> Result<Enrichment>;
}

/// Extractor used when no NLP collaborator is available: every record gets
/// empty enrichment sets.
pub struct NoopExtractor;

impl EntityExtractor for NoopExtractor {
    fn extract(&self, _text: &str) -> Result<Enrichment> {
        Ok(Enrichment::default())
    }
}

/// Rule-based extractor: known labor organizations become actors, gazetteer
/// localities become place mentions, both found by whole-word match on the
/// normalized text. Everything detected also lands in the combined entity
/// set.
pub struct LexiconExtractor {
    organizations: Vec<(String, Regex)>,
    places: Vec<(String, Regex)>,
}

impl LexiconExtractor {
    pub fn new(lexicon: &Lexicon) -> Result<Self, ConflictometroError> {
        let mut organizations = Vec::with_capacity(lexicon.organizations.len());
        for display in &lexicon.organizations {
            if let Some(pattern) = word_pattern(display)? {
                organizations.push((display.clone(), pattern));
            }
        }

        let mut places = Vec::new();
        for entry in &lexicon.gazetteer {
            for raw in &entry.localities {
                if let Some(pattern) = word_pattern(raw)? {
                    places.push((capitalize(&normalize(raw)), pattern));
                }
            }
        }

        Ok(Self { organizations, places })
    }
}

fn word_pattern(raw: &str) -> Result<Option<Regex>, ConflictometroError> {
    let canonical = normalize(raw);
    if canonical.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!(r"\b{}\b", regex::escape(&canonical)))
        .map(Some)
        .map_err(|e| ConflictometroError::Enrichment(format!("Invalid pattern for {raw:?}: {e}")))
}

impl EntityExtractor for LexiconExtractor {
    fn extract(&self, text: &str) -> Result<Enrichment> {
        let text = normalize(text);
        let mut enrichment = Enrichment::default();
        for (display, pattern) in &self.organizations {
            if pattern.is_match(&text) {
                enrichment.actors.insert(display.clone());
                enrichment.entities.insert(display.clone());
            }
        }
        for (display, pattern) in &self.places {
            if pattern.is_match(&text) {
                enrichment.places.insert(display.clone());
                enrichment.entities.insert(display.clone());
            }
        }
        Ok(enrichment)
    }
}
