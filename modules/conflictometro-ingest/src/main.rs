use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use conflictometro_common::Config;
use conflictometro_engine::Lexicon;
use conflictometro_ingest::runner;

#[derive(Parser, Debug)]
#[command(
    name = "conflictometro",
    about = "Classify and deduplicate labor-conflict press coverage"
)]
struct Args {
    /// Source CSV batch, repeatable; processed in order
    #[arg(long = "source", value_name = "FILE")]
    sources: Vec<PathBuf>,

    /// Persisted dataset to merge into
    #[arg(long, value_name = "FILE")]
    dataset: Option<PathBuf>,

    /// Fuzzy similarity threshold, 0-100
    #[arg(long)]
    threshold: Option<f64>,

    /// TOML lexicon overriding the built-in dictionaries
    #[arg(long, value_name = "FILE")]
    lexicon: Option<PathBuf>,

    /// Skip fuzzy near-duplicate clustering
    #[arg(long)]
    skip_fuzzy: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("conflictometro=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if !args.sources.is_empty() {
        config.source_files = args.sources;
    }
    if let Some(dataset) = args.dataset {
        config.dataset_path = dataset;
    }
    if let Some(threshold) = args.threshold {
        config.fuzzy_threshold = threshold;
    }
    if let Some(lexicon) = args.lexicon {
        config.lexicon_path = Some(lexicon);
    }
    if args.skip_fuzzy {
        config.skip_fuzzy = true;
    }

    let lexicon = match &config.lexicon_path {
        Some(path) => Lexicon::from_toml_file(path)?,
        None => Lexicon::default(),
    };

    info!(
        sources = config.source_files.len(),
        dataset = %config.dataset_path.display(),
        threshold = config.fuzzy_threshold,
        "Starting batch run"
    );

    let stats = runner::run(&config, &lexicon)?;
    info!("Batch run finished. {stats}");
    Ok(())
}
