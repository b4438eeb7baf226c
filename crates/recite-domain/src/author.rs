//! Author representation and author-field parsing

use serde::{Deserialize, Serialize};

/// Markers that indicate a deliberately truncated author list.
const TRUNCATION_MARKERS: &[&str] = &["others", "et al", "et al.", "et. al.", "and others"];

/// A single author of a bibliographic entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub family_name: String,
    pub given_name: Option<String>,
}

impl Author {
    /// Create an author with just a family name
    pub fn new(family_name: impl Into<String>) -> Self {
        Self {
            family_name: family_name.into(),
            given_name: None,
        }
    }

    /// Builder method to add a given name
    pub fn with_given_name(mut self, given: impl Into<String>) -> Self {
        self.given_name = Some(given.into());
        self
    }

    /// Format as "Family, Given"
    pub fn to_field_format(&self) -> String {
        match &self.given_name {
            Some(given) => format!("{}, {}", self.family_name, given),
            None => self.family_name.clone(),
        }
    }

    /// Format as "Given Family" for display
    pub fn display_name(&self) -> String {
        match &self.given_name {
            Some(given) => format!("{} {}", given, self.family_name),
            None => self.family_name.clone(),
        }
    }
}

/// Result of parsing an author field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAuthors {
    pub authors: Vec<Author>,
    /// True when the field carried an "et al" / "and others" marker
    pub truncated: bool,
}

/// Parse a BibTeX-style author field into discrete authors.
///
/// Splits on " and " and ";", handles "Last, First" and "First Last" forms,
/// and detects truncation markers ("and others", "et al") rather than
/// treating them as a literal author.
pub fn parse_author_field(input: &str) -> ParsedAuthors {
    let mut authors = Vec::new();
    let mut truncated = false;

    for part in input.split(" and ").flat_map(|s| s.split(';')) {
        let part = part.trim().trim_end_matches(',').trim();
        if part.is_empty() {
            continue;
        }
        if is_truncation_marker(part) {
            truncated = true;
            continue;
        }
        authors.push(parse_single_author(part));
    }

    ParsedAuthors { authors, truncated }
}

fn is_truncation_marker(part: &str) -> bool {
    let lowered = part.to_lowercase();
    TRUNCATION_MARKERS.contains(&lowered.as_str())
}

/// Parse one author string into an Author struct
fn parse_single_author(input: &str) -> Author {
    let trimmed = input.trim();

    // "Last, First" format
    if let Some(comma_pos) = trimmed.find(',') {
        let family = trimmed[..comma_pos].trim();
        let given = trimmed[comma_pos + 1..].trim();
        let mut author = Author::new(family);
        if !given.is_empty() {
            author.given_name = Some(given.to_string());
        }
        return author;
    }

    // "First Last" format: last word is the family name
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    match parts.as_slice() {
        [] => Author::new("Unknown"),
        [single] => Author::new(*single),
        [given @ .., family] => Author::new(*family).with_given_name(given.join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_last_first() {
        let parsed = parse_author_field("Smith, John");
        assert_eq!(parsed.authors.len(), 1);
        assert_eq!(parsed.authors[0].family_name, "Smith");
        assert_eq!(parsed.authors[0].given_name, Some("John".to_string()));
        assert!(!parsed.truncated);
    }

    #[test]
    fn test_parse_first_last() {
        let parsed = parse_author_field("John Smith");
        assert_eq!(parsed.authors[0].family_name, "Smith");
        assert_eq!(parsed.authors[0].given_name, Some("John".to_string()));
    }

    #[test]
    fn test_parse_multiple_separators() {
        let parsed = parse_author_field("Smith, J. and Doe, J.");
        assert_eq!(parsed.authors.len(), 2);
        let parsed = parse_author_field("Smith, J.; Doe, J.");
        assert_eq!(parsed.authors.len(), 2);
    }

    #[test]
    fn test_truncation_marker_detected() {
        let parsed = parse_author_field("Smith, John and Doe, Jane and others");
        assert_eq!(parsed.authors.len(), 2);
        assert!(parsed.truncated);

        let parsed = parse_author_field("Smith, John and et al.");
        assert_eq!(parsed.authors.len(), 1);
        assert!(parsed.truncated);
    }

    #[test]
    fn test_no_false_truncation() {
        let parsed = parse_author_field(
            "Adams, A. and Brown, B. and Clark, C. and Davis, D. and Evans, E. and Ford, F.",
        );
        assert_eq!(parsed.authors.len(), 6);
        assert!(!parsed.truncated);
    }

    #[test]
    fn test_display_and_field_format() {
        let author = Author::new("Einstein").with_given_name("Albert");
        assert_eq!(author.display_name(), "Albert Einstein");
        assert_eq!(author.to_field_format(), "Einstein, Albert");
    }
}
