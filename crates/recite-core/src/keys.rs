//! Deterministic citation key assignment
//!
//! Keys are assigned over the whole entry set in one pass, ordered by entry
//! id, so the same library always yields the same keys regardless of load
//! order. The first entry to claim a base key keeps it bare; later claimants
//! get letter suffixes.

use std::collections::{BTreeMap, HashSet};

use recite_domain::Entry;
use recite_identifiers::{base_key, uniquify_key};

/// Assign a unique citation key to every entry, keyed by entry id.
pub fn assign_keys(entries: &[Entry]) -> BTreeMap<String, String> {
    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut used: HashSet<String> = HashSet::new();
    let mut assigned = BTreeMap::new();
    for entry in ordered {
        let base = base_key(entry.first_author_surname(), entry.year);
        let key = uniquify_key(&base, &used);
        used.insert(key.clone());
        assigned.insert(entry.id.clone(), key);
    }
    assigned
}
