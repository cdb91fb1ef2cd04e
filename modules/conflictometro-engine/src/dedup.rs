//! Exact and fuzzy deduplication.
//!
//! Exact dedup removes records sharing an identity key. Fuzzy dedup then
//! clusters near-duplicate titles: records are visited most-recent and
//! most-informative first, and each unvisited record absorbs every other
//! record whose title similarity reaches the threshold. Absorbed records
//! never become representatives themselves, so clusters cannot overlap.
//! Greedy, not globally optimal, O(n²) in batch size.

use std::collections::HashSet;

use conflictometro_common::{normalize, Article};

/// Similarity threshold (0-100) at which two titles count as the same
/// story.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 90.0;

/// Remove exact duplicates by identity key, keeping the first occurrence
/// in insertion order. Returns the survivors and the eliminated count.
pub fn dedup_exact(articles: Vec<Article>) -> (Vec<Article>, usize) {
    let before = articles.len();
    let mut seen = HashSet::new();
    let kept: Vec<Article> = articles
        .into_iter()
        .filter(|a| seen.insert(a.uid.clone()))
        .collect();
    let eliminated = before - kept.len();
    (kept, eliminated)
}

/// Cluster near-duplicate titles above `threshold` and keep one
/// representative per cluster. Returns the survivors and the eliminated
/// count.
///
/// Representative order: descending by `(surveyed_at, text_length)`, with
/// undated records after all dated ones and insertion order preserved on
/// ties (stable sort). Records whose title normalizes to nothing neither
/// absorb nor get absorbed.
pub fn dedup_fuzzy(mut articles: Vec<Article>, threshold: f64) -> (Vec<Article>, usize) {
    articles.sort_by(|a, b| {
        b.surveyed_at
            .cmp(&a.surveyed_at)
            .then_with(|| b.text_length.cmp(&a.text_length))
    });

    let keys: Vec<String> = articles
        .iter()
        .map(|a| sorted_unique_tokens(&normalize(&a.title)))
        .collect();
    let lengths: Vec<usize> = keys.iter().map(|k| k.chars().count()).collect();

    let mut eliminated: HashSet<usize> = HashSet::new();
    for i in 0..articles.len() {
        if eliminated.contains(&i) || keys[i].is_empty() {
            continue;
        }
        for j in 0..articles.len() {
            if j == i || eliminated.contains(&j) || keys[j].is_empty() {
                continue;
            }
            // Length bound: indel distance is at least the length gap, so
            // the pair cannot reach the threshold when the gap alone
            // exceeds the allowed distance.
            let (li, lj) = (lengths[i], lengths[j]);
            let best_possible = 100.0 * (1.0 - li.abs_diff(lj) as f64 / (li + lj) as f64);
            if best_possible < threshold {
                continue;
            }
            if indel_similarity(&keys[i], &keys[j]) * 100.0 >= threshold {
                eliminated.insert(j);
            }
        }
    }

    let count = eliminated.len();
    let kept = articles
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !eliminated.contains(idx))
        .map(|(_, a)| a)
        .collect();
    (kept, count)
}

/// Title similarity on a 0-100 scale: both titles are normalized, their
/// unique tokens sorted and rejoined, and the results compared by
/// normalized indel distance (insert/delete edit distance). Token order
/// and token repetition never affect the score.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let ka = sorted_unique_tokens(&normalize(a));
    let kb = sorted_unique_tokens(&normalize(b));
    indel_similarity(&ka, &kb) * 100.0
}

fn sorted_unique_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens.join(" ")
}

/// Normalized indel similarity in [0, 1]: `2·LCS(a, b) / (|a| + |b|)`,
/// equivalently `1 - indel_distance / (|a| + |b|)`. Two empty strings are
/// identical by convention.
fn indel_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for i in 0..a.len() {
        for j in 0..b.len() {
            cur[j + 1] = if a[i] == b[j] {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    let lcs = prev[b.len()];
    2.0 * lcs as f64 / (a.len() + b.len()) as f64
}
