//! Incremental union of a processed batch into the persisted dataset.

use std::collections::HashSet;

use conflictometro_common::Article;

/// Append to `existing` the batch records whose identity key is not yet
/// present. Existing records are never touched, so the dataset only grows
/// and stays exact-duplicate-free by uid. Returns the merged dataset and
/// the admitted count.
///
/// Fuzzy near-duplicates across batches are NOT reconciled here; fuzzy
/// dedup runs within a batch only. Known limitation, kept on purpose.
pub fn merge_incremental(mut existing: Vec<Article>, batch: Vec<Article>) -> (Vec<Article>, usize) {
    let known: HashSet<String> = existing.iter().map(|a| a.uid.clone()).collect();
    let fresh: Vec<Article> = batch
        .into_iter()
        .filter(|a| !known.contains(&a.uid))
        .collect();
    let admitted = fresh.len();
    existing.extend(fresh);
    (existing, admitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, outlet: &str) -> Article {
        Article::new(title, outlet, title)
    }

    #[test]
    fn known_record_is_skipped_new_record_admitted() {
        let existing = vec![article("Paro docente en Rafaela", "El Litoral")];
        let batch = vec![
            article("Paro docente en Rafaela", "El Litoral"),
            article("Despidos en la metalúrgica", "El Once"),
        ];
        let before = existing.len();
        let (merged, admitted) = merge_incremental(existing, batch);
        assert_eq!(admitted, 1);
        assert_eq!(merged.len(), before + 1);
    }

    #[test]
    fn empty_existing_admits_everything() {
        let batch = vec![
            article("Paro docente en Rafaela", "El Litoral"),
            article("Despidos en la metalúrgica", "El Once"),
        ];
        let (merged, admitted) = merge_incremental(Vec::new(), batch);
        assert_eq!(admitted, 2);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn existing_records_stay_unchanged_and_in_order() {
        let mut old = article("Paro docente en Rafaela", "El Litoral");
        old.territory = "Santa Fe".to_string();
        let existing = vec![old.clone(), article("Otro título", "El Diario")];

        let mut updated = article("Paro docente en Rafaela", "El Litoral");
        updated.territory = "Entre Ríos".to_string();

        let (merged, admitted) = merge_incremental(existing, vec![updated]);
        assert_eq!(admitted, 0);
        assert_eq!(merged[0].territory, "Santa Fe");
        assert_eq!(merged[1].title, "Otro título");
    }

    #[test]
    fn merge_is_idempotent() {
        let batch = vec![article("Paro docente en Rafaela", "El Litoral")];
        let (merged, _) = merge_incremental(Vec::new(), batch.clone());
        let (merged_again, admitted) = merge_incremental(merged, batch);
        assert_eq!(admitted, 0);
        assert_eq!(merged_again.len(), 1);
    }

    #[test]
    fn near_duplicate_with_distinct_uid_is_admitted() {
        // Cross-batch fuzzy duplicates are not reconciled; only identity
        // keys gate admission.
        let existing = vec![article("Docentes de Rafaela exigen aumento salarial", "El Litoral")];
        let batch = vec![article("Docentes de Rafaela piden aumento de salario", "El Litoral")];
        let (merged, admitted) = merge_incremental(existing, batch);
        assert_eq!(admitted, 1);
        assert_eq!(merged.len(), 2);
    }
}
