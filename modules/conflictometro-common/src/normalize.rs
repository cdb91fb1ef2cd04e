//! Text canonicalization and identity keys.
//!
//! Every matching surface in the pipeline (classification triggers,
//! gazetteer lookups, dedup titles, identity keys) goes through the same
//! normalization, so two spellings that canonicalize identically are the
//! same string everywhere downstream.

/// Canonicalize free text for matching: lowercase, keep ASCII alphanumerics
/// plus Spanish accented vowels and `ñ`/`ü`, turn everything else into
/// spaces, collapse whitespace runs, trim.
///
/// Total: any input yields a (possibly empty) string.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || matches!(c, 'á' | 'é' | 'í' | 'ó' | 'ú' | 'ü' | 'ñ') {
            out.push(c);
        } else {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize an optional field. Absent input normalizes to the empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Deterministic exact-duplicate key: SHA-256 over the normalized title
/// concatenated with the normalized outlet, hex-encoded.
///
/// A content hash, stable across runs and process restarts. Two records
/// whose title and outlet normalize identically always collide; that is the
/// dedup contract, not a defect.
pub fn identity_key(title: &str, outlet: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(normalize(title).as_bytes());
    hasher.update(normalize(outlet).as_bytes());
    hex::encode(hasher.finalize())
}
