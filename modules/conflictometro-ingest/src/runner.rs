//! One full batch run: load declared sources, process, merge into the
//! persisted dataset, write it back.

use anyhow::Result;
use tracing::{info, warn};

use conflictometro_common::Config;
use conflictometro_engine::{
    merge_incremental, Lexicon, LexiconExtractor, Pipeline, RunStats,
};

use crate::store;

pub fn run(config: &Config, lexicon: &Lexicon) -> Result<RunStats> {
    let mut stats = RunStats::default();

    let batch = store::load_sources(&config.source_files, &mut stats);
    if batch.is_empty() {
        warn!("No input data: all declared sources were empty or missing");
        return Ok(stats);
    }

    let extractor = LexiconExtractor::new(lexicon)?;
    let pipeline = Pipeline::new(lexicon, Box::new(extractor))?
        .with_fuzzy_threshold(config.fuzzy_threshold)
        .with_skip_fuzzy(config.skip_fuzzy);

    let processed = pipeline.process(batch, &mut stats);

    let existing = store::read_dataset(&config.dataset_path)?;
    let existing_count = existing.len();
    let (dataset, admitted) = merge_incremental(existing, processed);
    stats.admitted = admitted as u32;
    info!(
        admitted,
        existing = existing_count,
        total = dataset.len(),
        "Merged batch into dataset"
    );

    store::write_dataset(&config.dataset_path, &dataset)?;
    stats.tally_distributions(&dataset);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn config(sources: Vec<PathBuf>, dataset: PathBuf) -> Config {
        Config {
            source_files: sources,
            dataset_path: dataset,
            lexicon_path: None,
            fuzzy_threshold: 90.0,
            skip_fuzzy: false,
        }
    }

    fn write_source(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn full_run_classifies_dedups_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(
            dir.path(),
            "batch.csv",
            "titulo,medio,texto\n\
             Docentes de Rafaela exigen aumento salarial,El Litoral,Los docentes de Rafaela exigen un aumento salarial\n\
             Docentes de Rafaela piden aumento de salario,El Diario,Docentes de Rafaela piden aumento\n\
             Cierre de la metalúrgica en Paraná,El Once,despido de 200 trabajadores en la fábrica metalúrgica de Paraná\n",
        );
        let dataset_path = dir.path().join("out/dataset.csv");

        let stats = run(&config(vec![source], dataset_path.clone()), &Lexicon::builtin()).unwrap();

        assert_eq!(stats.rows_ingested, 3);
        assert_eq!(stats.fuzzy_eliminated, 1);
        assert_eq!(stats.admitted, 2);
        assert_eq!(stats.dataset_total, 2);

        let dataset = store::read_dataset(&dataset_path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.iter().any(|a| a.territory == "Santa Fe"));
        assert!(dataset.iter().any(|a| a.territory == "Entre Ríos"));
    }

    #[test]
    fn second_run_admits_only_new_records() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_source(
            dir.path(),
            "first.csv",
            "titulo,medio,texto\nParo de ATE en Paraná,El Once,ATE anunció un paro en Paraná\n",
        );
        let dataset_path = dir.path().join("dataset.csv");
        run(&config(vec![first.clone()], dataset_path.clone()), &Lexicon::builtin()).unwrap();

        let second = write_source(
            dir.path(),
            "second.csv",
            "titulo,medio,texto\n\
             Paro de ATE en Paraná,El Once,ATE anunció un paro en Paraná\n\
             Asamblea de municipales en Santa Fe,Rosario3,Los municipales realizaron una asamblea en Santa Fe\n",
        );
        let stats = run(&config(vec![second], dataset_path.clone()), &Lexicon::builtin()).unwrap();

        assert_eq!(stats.admitted, 1);
        assert_eq!(stats.dataset_total, 2);
    }

    #[test]
    fn run_with_no_sources_reports_and_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("dataset.csv");
        let stats = run(
            &config(vec![PathBuf::from("/nonexistent/a.csv")], dataset_path.clone()),
            &Lexicon::builtin(),
        )
        .unwrap();
        assert_eq!(stats.sources_missing, 1);
        assert_eq!(stats.rows_ingested, 0);
        assert!(!dataset_path.exists(), "empty run must not create the dataset");
    }
}
