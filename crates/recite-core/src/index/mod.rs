//! Lookup index construction
//!
//! Five independent key indices are built once from a fixed entry list and
//! are read-only afterward. Collision policy: first entry wins; later
//! entries landing on an occupied key are recorded per key, never silently
//! dropped or overwritten. Recorded collisions feed the duplicate report
//! (identifier indices) and ambiguity detection (author-year index).

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::config::MatchConfig;
use crate::dedup::{self, DuplicateFlag, DuplicateKind};
use recite_domain::Entry;
use recite_identifiers::{base_key, canonical_arxiv_id, normalize_doi, normalize_isbn, normalize_url};

/// Which of the five indices a key belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    Doi,
    Arxiv,
    Isbn,
    Url,
    AuthorYear,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Doi => "doi",
            IndexKind::Arxiv => "arxiv",
            IndexKind::Isbn => "isbn",
            IndexKind::Url => "url",
            IndexKind::AuthorYear => "author-year",
        }
    }
}

/// One normalized-key map with its recorded collisions
#[derive(Clone, Debug, Default)]
pub struct KeyIndex {
    map: HashMap<String, usize>,
    collisions: HashMap<String, Vec<usize>>,
}

impl KeyIndex {
    /// Insert under the first-wins policy. Returns the occupying position
    /// when the key was already taken.
    fn insert(&mut self, key: String, position: usize) -> Option<usize> {
        match self.map.get(&key) {
            Some(&existing) => {
                self.collisions.entry(key).or_default().push(position);
                Some(existing)
            }
            None => {
                self.map.insert(key, position);
                None
            }
        }
    }

    /// Position of the first entry indexed under this key
    pub fn get(&self, key: &str) -> Option<usize> {
        self.map.get(key).copied()
    }

    /// True when more than one entry normalized to this key during indexing
    pub fn has_collision(&self, key: &str) -> bool {
        self.collisions.contains_key(key)
    }

    /// All positions recorded for a key, first-seen entry first
    pub fn candidates(&self, key: &str) -> Vec<usize> {
        let mut result = Vec::new();
        if let Some(&primary) = self.map.get(key) {
            result.push(primary);
        }
        if let Some(rest) = self.collisions.get(key) {
            result.extend_from_slice(rest);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The five built indices. Immutable once built; pass by reference to the
/// matcher and validator.
#[derive(Clone, Debug, Default)]
pub struct CitationIndex {
    pub doi: KeyIndex,
    pub arxiv: KeyIndex,
    pub isbn: KeyIndex,
    pub url: KeyIndex,
    /// Inherently lossy: distinct papers by one first author in one year
    /// collide. Every consumer treats this index as low confidence.
    pub author_year: KeyIndex,
}

/// Result of the one-time index build
#[derive(Clone, Debug)]
pub struct IndexReport {
    pub index: CitationIndex,
    pub duplicates: Vec<DuplicateFlag>,
}

impl CitationIndex {
    /// Build all five indices and the duplicate report in one pass over a
    /// fixed entry list.
    pub fn build(entries: &[Entry], config: &MatchConfig) -> IndexReport {
        let mut index = CitationIndex::default();
        let mut flags = Vec::new();
        let mut identifier_joined: HashSet<(usize, usize)> = HashSet::new();

        for (position, entry) in entries.iter().enumerate() {
            if !entry.is_indexable() {
                debug!(entry_id = %entry.id, "entry has no indexable identifier");
            }

            let keys = [
                (IndexKind::Doi, entry.identifiers.doi.as_deref().and_then(normalize_doi)),
                (
                    IndexKind::Arxiv,
                    entry.identifiers.arxiv_id.as_deref().and_then(canonical_arxiv_id),
                ),
                (IndexKind::Isbn, entry.identifiers.isbn.as_deref().and_then(normalize_isbn)),
                (IndexKind::Url, entry.url.as_deref().and_then(normalize_url)),
                (IndexKind::AuthorYear, author_year_key(entry)),
            ];

            for (kind, key) in keys {
                let Some(key) = key else { continue };
                let target = match kind {
                    IndexKind::Doi => &mut index.doi,
                    IndexKind::Arxiv => &mut index.arxiv,
                    IndexKind::Isbn => &mut index.isbn,
                    IndexKind::Url => &mut index.url,
                    IndexKind::AuthorYear => &mut index.author_year,
                };
                if let Some(existing) = target.insert(key.clone(), position) {
                    warn!(
                        index = kind.as_str(),
                        key = %key,
                        first = %entries[existing].id,
                        duplicate = %entry.id,
                        "key collision recorded, first entry wins"
                    );
                    // Identifier collisions are duplicate evidence in their
                    // own right; author-year collisions are expected noise
                    if kind != IndexKind::AuthorYear {
                        identifier_joined.insert(ordered(existing, position));
                        flags.push(DuplicateFlag {
                            kind: DuplicateKind::SharedIdentifier(kind),
                            entry_a: entries[existing].id.clone(),
                            entry_b: entry.id.clone(),
                            title_score: None,
                            author_overlap: None,
                        });
                    }
                }
            }
        }

        flags.extend(dedup::find_content_duplicates(
            entries,
            &identifier_joined,
            config,
        ));

        IndexReport {
            index,
            duplicates: flags,
        }
    }
}

/// `lowercase(firstAuthorSurname) + 4-digit year`, only when both are
/// extractable.
pub fn author_year_key(entry: &Entry) -> Option<String> {
    let surname = entry.first_author_surname()?;
    let year = entry.year.filter(|y| (1000..=9999).contains(y))?;
    let key = base_key(Some(surname), Some(year));
    if key.starts_with("anon") {
        return None;
    }
    Some(key)
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
