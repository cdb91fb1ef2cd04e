//! CSV ingestion and persistence.
//!
//! Source batches provide at least `titulo` and `medio`; everything else is
//! optional and defaults rather than failing. The persisted dataset carries
//! the full column set; legacy files without a `uid` column get their keys
//! recomputed on load.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use conflictometro_common::{
    Article, ConflictType, ConflictometroError, Enrichment, Sector, NO_LOCALITY,
    UNKNOWN_TERRITORY,
};
use conflictometro_engine::RunStats;

/// One dataset row. Every field is a string so a half-filled or legacy file
/// never fails a whole run; parsing into typed fields happens afterward,
/// with defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CsvRow {
    #[serde(default)]
    titulo: String,
    #[serde(default)]
    medio: String,
    #[serde(default)]
    texto: String,
    #[serde(default)]
    fecha_relevamiento: String,
    #[serde(default)]
    longitud_texto: String,
    #[serde(default)]
    uid: String,
    #[serde(default)]
    tipo_conflicto: String,
    #[serde(default)]
    sector: String,
    #[serde(default)]
    territorio: String,
    #[serde(default)]
    localidad: String,
    #[serde(default)]
    entidades_detectadas: String,
    #[serde(default)]
    actores_nlp: String,
    #[serde(default)]
    geos_detectadas: String,
}

/// Read one source batch. Classification columns in the file are ignored;
/// the pipeline assigns them fresh.
pub fn read_batch(path: &Path) -> Result<Vec<Article>, ConflictometroError> {
    let rows = read_rows(path)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let mut article = Article::new(row.titulo, row.medio, row.texto);
            article.surveyed_at = parse_survey_date(&row.fecha_relevamiento);
            if let Some(length) = parse_length(&row.longitud_texto) {
                article.text_length = length;
            }
            article
        })
        .collect())
}

/// Read the persisted dataset. A missing file is an empty dataset, not an
/// error. Rows keep their classification fields; empty or unknown values
/// fall back to the dimension defaults, and missing identity keys are
/// recomputed from title and outlet.
pub fn read_dataset(path: &Path) -> Result<Vec<Article>, ConflictometroError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let rows = read_rows(path)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let mut article = Article::new(row.titulo, row.medio, row.texto);
            if !row.uid.is_empty() {
                article.uid = row.uid;
            }
            article.surveyed_at = parse_survey_date(&row.fecha_relevamiento);
            if let Some(length) = parse_length(&row.longitud_texto) {
                article.text_length = length;
            }
            article.conflict_type =
                ConflictType::from_label(&row.tipo_conflicto).unwrap_or_default();
            article.sector = Sector::from_label(&row.sector).unwrap_or_default();
            article.territory = if row.territorio.is_empty() {
                UNKNOWN_TERRITORY.to_string()
            } else {
                row.territorio
            };
            article.locality = if row.localidad.is_empty() {
                NO_LOCALITY.to_string()
            } else {
                row.localidad
            };
            article.enrichment = Enrichment {
                entities: parse_set(&row.entidades_detectadas),
                actors: parse_set(&row.actores_nlp),
                places: parse_set(&row.geos_detectadas),
            };
            article
        })
        .collect())
}

/// Write the full dataset, creating parent directories as needed.
pub fn write_dataset(path: &Path, dataset: &[Article]) -> Result<(), ConflictometroError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConflictometroError::Io(format!("{}: {e}", parent.display())))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| ConflictometroError::Csv(format!("{}: {e}", path.display())))?;
    for article in dataset {
        let row = CsvRow {
            titulo: article.title.clone(),
            medio: article.outlet.clone(),
            texto: article.body.clone(),
            fecha_relevamiento: article
                .surveyed_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            longitud_texto: article.text_length.to_string(),
            uid: article.uid.clone(),
            tipo_conflicto: article.conflict_type.to_string(),
            sector: article.sector.to_string(),
            territorio: article.territory.clone(),
            localidad: article.locality.clone(),
            entidades_detectadas: join_set(&article.enrichment.entities),
            actores_nlp: join_set(&article.enrichment.actors),
            geos_detectadas: join_set(&article.enrichment.places),
        };
        writer
            .serialize(row)
            .map_err(|e| ConflictometroError::Csv(format!("{}: {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| ConflictometroError::Io(format!("{}: {e}", path.display())))?;
    Ok(())
}

/// Load every declared source, skipping missing or unreadable files with a
/// warning. An empty result is a valid zero-output run.
pub fn load_sources(paths: &[PathBuf], stats: &mut RunStats) -> Vec<Article> {
    let mut batch = Vec::new();
    for path in paths {
        if !path.exists() {
            warn!(path = %path.display(), "Source file not found, skipping");
            stats.sources_missing += 1;
            continue;
        }
        match read_batch(path) {
            Ok(rows) => {
                info!(path = %path.display(), rows = rows.len(), "Loaded source batch");
                stats.sources_read += 1;
                stats.rows_ingested += rows.len() as u32;
                batch.extend(rows);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read source, skipping");
                stats.sources_missing += 1;
            }
        }
    }
    batch
}

fn read_rows(path: &Path) -> Result<Vec<CsvRow>, ConflictometroError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| ConflictometroError::Csv(format!("{}: {e}", path.display())))?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping malformed row"),
        }
    }
    Ok(rows)
}

/// Survey dates arrive in whatever shape the scraper emitted; try the known
/// formats and give up quietly.
fn parse_survey_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Lengths written by earlier tooling sometimes carry a float suffix
/// ("534.0"); accept both.
fn parse_length(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().map(|f| f.max(0.0) as usize)
}

fn parse_set(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn read_batch_with_minimal_columns() {
        let file = write_file("titulo,medio\nParo docente,El Litoral\n");
        let batch = read_batch(file.path()).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].title, "Paro docente");
        assert_eq!(batch[0].outlet, "El Litoral");
        assert_eq!(batch[0].body, "");
        assert!(batch[0].surveyed_at.is_none());
        assert!(!batch[0].uid.is_empty());
    }

    #[test]
    fn read_batch_parses_dates_and_lengths() {
        let file = write_file(
            "titulo,medio,texto,fecha_relevamiento,longitud_texto\n\
             Paro,El Litoral,cuerpo,2024-03-08,534.0\n\
             Otro,El Once,cuerpo,08/03/2024,\n",
        );
        let batch = read_batch(file.path()).unwrap();
        assert_eq!(
            batch[0].surveyed_at,
            Some(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap())
        );
        assert_eq!(batch[0].text_length, 534);
        assert_eq!(
            batch[1].surveyed_at,
            Some(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap())
        );
        // No length column value: derived from the body
        assert_eq!(batch[1].text_length, "cuerpo".chars().count());
    }

    #[test]
    fn read_batch_tolerates_garbage_date() {
        let file = write_file("titulo,medio,fecha_relevamiento\nParo,El Litoral,ayer\n");
        let batch = read_batch(file.path()).unwrap();
        assert!(batch[0].surveyed_at.is_none());
    }

    #[test]
    fn missing_dataset_is_empty() {
        let dataset = read_dataset(Path::new("/nonexistent/dataset.csv")).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn dataset_round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");

        let mut article = Article::new("Paro docente en Rafaela", "El Litoral", "cuerpo del texto");
        article.conflict_type = ConflictType::Reivindicativo;
        article.sector = Sector::Educacion;
        article.territory = "Santa Fe".to_string();
        article.locality = "Rafaela".to_string();
        article.enrichment.actors.insert("AMSAFE".to_string());
        article.enrichment.entities.insert("AMSAFE".to_string());
        article.enrichment.places.insert("Rafaela".to_string());
        article.enrichment.entities.insert("Rafaela".to_string());
        let article = article.with_surveyed_at(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());

        write_dataset(&path, &[article.clone()]).unwrap();
        let restored = read_dataset(&path).unwrap();

        assert_eq!(restored.len(), 1);
        let r = &restored[0];
        assert_eq!(r.uid, article.uid);
        assert_eq!(r.conflict_type, ConflictType::Reivindicativo);
        assert_eq!(r.sector, Sector::Educacion);
        assert_eq!(r.territory, "Santa Fe");
        assert_eq!(r.locality, "Rafaela");
        assert_eq!(r.surveyed_at, article.surveyed_at);
        assert!(r.enrichment.actors.contains("AMSAFE"));
        assert!(r.enrichment.places.contains("Rafaela"));
        assert_eq!(r.enrichment.entities.len(), 2);
    }

    #[test]
    fn legacy_dataset_without_uid_gets_keys_recomputed() {
        let file = write_file(
            "titulo,medio,texto,tipo_conflicto\n\
             Paro docente,El Litoral,cuerpo,Reivindicativo\n",
        );
        let dataset = read_dataset(file.path()).unwrap();
        assert_eq!(
            dataset[0].uid,
            conflictometro_common::identity_key("Paro docente", "El Litoral")
        );
        assert_eq!(dataset[0].conflict_type, ConflictType::Reivindicativo);
    }

    #[test]
    fn unknown_labels_fall_back_to_defaults() {
        let file = write_file(
            "titulo,medio,tipo_conflicto,sector,territorio,localidad\n\
             Paro,El Litoral,CategoríaVieja,minería,,\n",
        );
        let dataset = read_dataset(file.path()).unwrap();
        assert_eq!(dataset[0].conflict_type, ConflictType::Indeterminado);
        assert_eq!(dataset[0].sector, Sector::General);
        assert_eq!(dataset[0].territory, UNKNOWN_TERRITORY);
        assert_eq!(dataset[0].locality, NO_LOCALITY);
    }

    #[test]
    fn load_sources_skips_missing_files() {
        let file = write_file("titulo,medio\nParo docente,El Litoral\n");
        let mut stats = RunStats::default();
        let batch = load_sources(
            &[
                file.path().to_path_buf(),
                PathBuf::from("/nonexistent/batch.csv"),
            ],
            &mut stats,
        );
        assert_eq!(batch.len(), 1);
        assert_eq!(stats.sources_read, 1);
        assert_eq!(stats.sources_missing, 1);
        assert_eq!(stats.rows_ingested, 1);
    }

    #[test]
    fn empty_source_yields_empty_batch() {
        let file = write_file("titulo,medio\n");
        let batch = read_batch(file.path()).unwrap();
        assert!(batch.is_empty());
    }
}
