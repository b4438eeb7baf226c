//! Similarity scoring

use std::collections::HashSet;
use strsim::{jaro_winkler, normalized_levenshtein};

use super::normalization::normalize_title;

/// Title similarity in [0, 100] over raw titles
pub fn title_similarity(a: &str, b: &str) -> f64 {
    normalized_title_similarity(&normalize_title(a), &normalize_title(b))
}

/// Title similarity in [0, 100] over already-normalized titles.
///
/// Jaro-Winkler catches word-level reshuffling and truncation; Levenshtein
/// anchors on exact character agreement. The blend follows 0.6/0.4.
pub fn normalized_title_similarity(norm_a: &str, norm_b: &str) -> f64 {
    if norm_a.is_empty() || norm_b.is_empty() {
        return 0.0;
    }

    let jw = jaro_winkler(norm_a, norm_b);
    let lev = normalized_levenshtein(norm_a, norm_b);

    (jw * 0.6 + lev * 0.4) * 100.0
}

/// Jaccard similarity over two sets
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}
