//! Duplicate detection
//!
//! Duplicates are always reported, never auto-merged; merging is a human
//! decision. Pairs that already share an identifier index key are flagged at
//! index-build time; this module finds the remaining content-level pairs by
//! fuzzy title and author comparison.

pub mod normalization;
pub mod similarity;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::index::IndexKind;
use recite_domain::Entry;

/// How a duplicate pair was detected
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DuplicateKind {
    /// Both entries normalized to the same key in an identifier index
    SharedIdentifier(IndexKind),
    /// Near-identical title plus strong author overlap
    SimilarContent,
}

/// A reported duplicate pair. Neither entry is removed or altered.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DuplicateFlag {
    pub kind: DuplicateKind,
    pub entry_a: String,
    pub entry_b: String,
    /// Title similarity in [0, 100], for content duplicates
    pub title_score: Option<f64>,
    /// Author-surname Jaccard overlap in [0, 1], for content duplicates
    pub author_overlap: Option<f64>,
}

/// Find `DUPLICATE_CONTENT` pairs among entries not already joined by an
/// identifier index.
///
/// `already_same` holds position pairs (low, high) that shared an identifier
/// key during indexing; those are skipped here since they are already
/// flagged with higher confidence.
pub fn find_content_duplicates(
    entries: &[Entry],
    already_same: &HashSet<(usize, usize)>,
    config: &MatchConfig,
) -> Vec<DuplicateFlag> {
    let normalized_titles: Vec<String> = entries
        .iter()
        .map(|e| normalization::normalize_title(&e.title))
        .collect();
    let surname_sets: Vec<HashSet<String>> = entries
        .iter()
        .map(normalization::surname_set)
        .collect();

    let mut flags = Vec::new();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            if already_same.contains(&(i, j)) {
                continue;
            }

            let title_score =
                similarity::normalized_title_similarity(&normalized_titles[i], &normalized_titles[j]);
            if title_score < config.duplicate_title_threshold {
                continue;
            }

            let overlap = similarity::jaccard(&surname_sets[i], &surname_sets[j]);
            if overlap < config.duplicate_author_overlap {
                continue;
            }

            flags.push(DuplicateFlag {
                kind: DuplicateKind::SimilarContent,
                entry_a: entries[i].id.clone(),
                entry_b: entries[j].id.clone(),
                title_score: Some(title_score),
                author_overlap: Some(overlap),
            });
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use recite_domain::{Author, EntryType};

    fn entry(id: &str, title: &str, surnames: &[&str]) -> Entry {
        let mut e = Entry::with_id(id, title, EntryType::JournalArticle);
        e.authors = surnames.iter().map(|s| Author::new(*s)).collect();
        e
    }

    #[test]
    fn test_similar_pair_flagged_not_merged() {
        let entries = vec![
            entry(
                "a",
                "Deep Learning for Natural Language Processing",
                &["Smith", "Doe", "Khan", "Lee", "Park"],
            ),
            entry(
                "b",
                "Deep learning for natural language processing",
                &["Smith", "Doe", "Khan", "Lee"],
            ),
        ];
        let flags = find_content_duplicates(&entries, &HashSet::new(), &MatchConfig::default());
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].kind, DuplicateKind::SimilarContent);
        assert_eq!(flags[0].entry_a, "a");
        assert_eq!(flags[0].entry_b, "b");
        assert!(flags[0].title_score.unwrap() >= 92.0);
        assert!(flags[0].author_overlap.unwrap() >= 0.8);
        // input untouched
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_different_authors_not_flagged() {
        let entries = vec![
            entry("a", "A Study of Things", &["Smith"]),
            entry("b", "A Study of Things", &["Jones"]),
        ];
        let flags = find_content_duplicates(&entries, &HashSet::new(), &MatchConfig::default());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_different_titles_not_flagged() {
        let entries = vec![
            entry("a", "Graph Neural Networks", &["Smith"]),
            entry("b", "Convolutional Networks for Vision", &["Smith"]),
        ];
        let flags = find_content_duplicates(&entries, &HashSet::new(), &MatchConfig::default());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_identifier_joined_pair_skipped() {
        let entries = vec![
            entry("a", "Same Paper Title", &["Smith"]),
            entry("b", "Same Paper Title", &["Smith"]),
        ];
        let mut already = HashSet::new();
        already.insert((0usize, 1usize));
        let flags = find_content_duplicates(&entries, &already, &MatchConfig::default());
        assert!(flags.is_empty());
    }
}
