//! Text normalization for duplicate comparison

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

use recite_domain::Entry;

/// Normalize a title for comparison: NFKD fold, drop punctuation,
/// lower-case, collapse whitespace, strip leading articles.
pub fn normalize_title(title: &str) -> String {
    let mut result: String = title
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace())
        .collect();

    result = result.to_lowercase();
    result = collapse_whitespace(&result);

    let prefixes = ["a ", "an ", "the ", "on "];
    for prefix in prefixes {
        if let Some(stripped) = result.strip_prefix(prefix) {
            result = stripped.to_string();
        }
    }

    result.trim().to_string()
}

/// Lower-cased, ASCII-folded surname set for Jaccard comparison
pub fn surname_set(entry: &Entry) -> HashSet<String> {
    entry
        .authors
        .iter()
        .map(|a| fold_surname(&a.family_name))
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn fold_surname(surname: &str) -> String {
    surname
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use recite_domain::{Author, EntryType};

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("The Quick Brown Fox"), "quick brown fox");
        assert_eq!(normalize_title("Hello,   World!"), "hello world");
        assert_eq!(normalize_title("Études Françaises"), "etudes francaises");
    }

    #[test]
    fn test_surname_set_folds() {
        let mut entry = Entry::new("t", EntryType::Book);
        entry.authors.push(Author::new("Müller"));
        entry.authors.push(Author::new("O'Brien"));
        let set = surname_set(&entry);
        assert!(set.contains("muller"));
        assert!(set.contains("obrien"));
    }
}
