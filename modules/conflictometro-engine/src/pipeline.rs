//! Batch processing: classification, territory resolution, enrichment and
//! dedup, in that order, over a fully materialized batch.

use std::collections::BTreeMap;

use tracing::{info, warn};

use conflictometro_common::{Article, ConflictType, ConflictometroError, Enrichment, Sector};

use crate::classify::Classifier;
use crate::dedup::{dedup_exact, dedup_fuzzy, DEFAULT_FUZZY_THRESHOLD};
use crate::enrich::EntityExtractor;
use crate::lexicon::Lexicon;
use crate::territory::TerritoryResolver;

/// The single pass a batch takes between ingestion and merge.
pub struct Pipeline {
    conflict: Classifier<ConflictType>,
    sector: Classifier<Sector>,
    territory: TerritoryResolver,
    extractor: Box<dyn EntityExtractor>,
    fuzzy_threshold: f64,
    skip_fuzzy: bool,
}

impl Pipeline {
    pub fn new(
        lexicon: &Lexicon,
        extractor: Box<dyn EntityExtractor>,
    ) -> Result<Self, ConflictometroError> {
        Ok(Self {
            conflict: lexicon.conflict_classifier(),
            sector: lexicon.sector_classifier(),
            territory: TerritoryResolver::new(&lexicon.gazetteer)?,
            extractor,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            skip_fuzzy: false,
        })
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn with_skip_fuzzy(mut self, skip: bool) -> Self {
        self.skip_fuzzy = skip;
        self
    }

    /// Classify, resolve, enrich and dedup a batch. Classification fields
    /// are populated here exactly once; dedup runs after so the surviving
    /// representative carries its own labels.
    pub fn process(&self, mut batch: Vec<Article>, stats: &mut RunStats) -> Vec<Article> {
        for article in &mut batch {
            article.conflict_type = self.conflict.classify(&article.body);
            article.sector = self.sector.classify(&article.body);
            let (territory, locality) = self.territory.resolve(&article.body, &article.outlet);
            article.territory = territory;
            article.locality = locality;
            article.enrichment = match self.extractor.extract(&article.body) {
                Ok(enrichment) => enrichment,
                Err(e) => {
                    warn!(
                        error = %e,
                        title = article.title.as_str(),
                        "Enrichment failed, keeping empty sets"
                    );
                    Enrichment::default()
                }
            };
        }

        stats.rows_processed += batch.len() as u32;

        let (batch, exact) = dedup_exact(batch);
        if exact > 0 {
            info!(eliminated = exact, "Removed exact duplicates by identity key");
        }

        let (batch, fuzzy) = if self.skip_fuzzy {
            (batch, 0)
        } else {
            dedup_fuzzy(batch, self.fuzzy_threshold)
        };
        if fuzzy > 0 {
            info!(
                eliminated = fuzzy,
                threshold = self.fuzzy_threshold,
                "Removed near-duplicate titles"
            );
        }

        stats.exact_eliminated += exact as u32;
        stats.fuzzy_eliminated += fuzzy as u32;
        batch
    }
}

/// Counters from one pipeline run, plus the dataset distributions printed
/// at the end.
#[derive(Debug, Default)]
pub struct RunStats {
    pub sources_read: u32,
    pub sources_missing: u32,
    pub rows_ingested: u32,
    pub rows_processed: u32,
    pub exact_eliminated: u32,
    pub fuzzy_eliminated: u32,
    pub admitted: u32,
    pub dataset_total: u32,
    pub by_conflict_type: Vec<(String, u32)>,
    pub by_sector: Vec<(String, u32)>,
    pub by_territory: Vec<(String, u32)>,
}

impl RunStats {
    /// Recompute the distribution tables from the persisted dataset.
    pub fn tally_distributions(&mut self, dataset: &[Article]) {
        self.dataset_total = dataset.len() as u32;
        self.by_conflict_type =
            distribution(dataset.iter().map(|a| a.conflict_type.to_string()));
        self.by_sector = distribution(dataset.iter().map(|a| a.sector.to_string()));
        self.by_territory = distribution(dataset.iter().map(|a| a.territory.clone()));
    }
}

/// Count occurrences, most frequent first; ties break alphabetically so
/// output is deterministic.
fn distribution(labels: impl Iterator<Item = String>) -> Vec<(String, u32)> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut out: Vec<(String, u32)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Batch Run Complete ===")?;
        writeln!(f, "Sources read:      {}", self.sources_read)?;
        writeln!(f, "Sources missing:   {}", self.sources_missing)?;
        writeln!(f, "Rows ingested:     {}", self.rows_ingested)?;
        writeln!(f, "Exact duplicates:  {}", self.exact_eliminated)?;
        writeln!(f, "Near duplicates:   {}", self.fuzzy_eliminated)?;
        writeln!(f, "New records:       {}", self.admitted)?;
        writeln!(f, "Dataset total:     {}", self.dataset_total)?;
        if !self.by_conflict_type.is_empty() {
            writeln!(f, "\nBy conflict type:")?;
            for (label, count) in &self.by_conflict_type {
                writeln!(f, "  {label}: {count}")?;
            }
        }
        if !self.by_sector.is_empty() {
            writeln!(f, "\nBy sector:")?;
            for (label, count) in &self.by_sector {
                writeln!(f, "  {label}: {count}")?;
            }
        }
        if !self.by_territory.is_empty() {
            writeln!(f, "\nBy territory:")?;
            for (label, count) in &self.by_territory {
                writeln!(f, "  {label}: {count}")?;
            }
        }
        Ok(())
    }
}
