//! Identifier bundle carried on every entry

use serde::{Deserialize, Serialize};

/// Identifiers attached to a bibliographic entry.
///
/// All fields are optional; an entry needs at least one of doi, arxiv_id,
/// isbn, or a URL to be indexable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifiers {
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
    pub isbn: Option<String>,
    pub pmid: Option<String>,
}

impl Identifiers {
    pub fn is_empty(&self) -> bool {
        self.doi.is_none() && self.arxiv_id.is_none() && self.isbn.is_none() && self.pmid.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Identifiers::default().is_empty());
    }

    #[test]
    fn test_any_field_makes_nonempty() {
        let ids = Identifiers {
            doi: Some("10.1234/test".to_string()),
            ..Default::default()
        };
        assert!(!ids.is_empty());
    }
}
