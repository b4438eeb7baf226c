//! Raw citations extracted from authored documents

use serde::{Deserialize, Serialize};

/// Where a citation was found
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub document: String,
    pub line: u32,
}

/// Identifier hints pulled opportunistically from a citation URL or text
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierHints {
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
    pub pmid: Option<String>,
}

/// A citation fragment extracted from a document.
///
/// Immutable once extracted; the matcher never mutates citations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawCitation {
    pub display_text: String,
    pub url: Option<String>,
    pub location: Location,
    pub hints: IdentifierHints,
}

impl RawCitation {
    pub fn new(display_text: impl Into<String>, location: Location) -> Self {
        Self {
            display_text: display_text.into(),
            url: None,
            location,
            hints: IdentifierHints::default(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_hints(mut self, hints: IdentifierHints) -> Self {
        self.hints = hints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let citation = RawCitation::new(
            "Vaswani et al. (2017)",
            Location {
                document: "paper.md".to_string(),
                line: 42,
            },
        )
        .with_url("https://arxiv.org/abs/1706.03762");

        assert_eq!(citation.location.line, 42);
        assert!(citation.url.is_some());
        assert!(citation.hints.doi.is_none());
    }
}
