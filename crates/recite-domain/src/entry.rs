//! Bibliographic entry model

use super::{Author, Identifiers};
use serde::{Deserialize, Serialize};

/// Kind of bibliographic record
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    JournalArticle,
    Preprint,
    Book,
    Chapter,
    Conference,
    Thesis,
    Webpage,
    Other,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::JournalArticle => "journal-article",
            EntryType::Preprint => "preprint",
            EntryType::Book => "book",
            EntryType::Chapter => "chapter",
            EntryType::Conference => "conference",
            EntryType::Thesis => "thesis",
            EntryType::Webpage => "webpage",
            EntryType::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "journal-article" | "article" | "article-journal" => EntryType::JournalArticle,
            "preprint" | "posted-content" => EntryType::Preprint,
            "book" | "monograph" => EntryType::Book,
            "chapter" | "inbook" | "incollection" => EntryType::Chapter,
            "conference" | "inproceedings" | "paper-conference" => EntryType::Conference,
            "thesis" | "phdthesis" | "mastersthesis" => EntryType::Thesis,
            "webpage" | "website" | "online" | "misc" => EntryType::Webpage,
            _ => EntryType::Other,
        }
    }
}

/// A canonical bibliographic record.
///
/// `id` is assigned by the loading source (uuid fallback) and is unique
/// within a load; it is not a citation key. `source_key` preserves whatever
/// citation key the source carried so the validator can inspect it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub authors: Vec<Author>,
    /// True when the source author field was marked "et al" / "and others"
    pub authors_truncated: bool,
    pub year: Option<i32>,
    pub identifiers: Identifiers,
    pub url: Option<String>,
    pub venue: Option<String>,
    pub entry_type: EntryType,
    pub source_key: Option<String>,
    /// Id of the source that loaded this entry
    pub provenance: Option<String>,
}

impl Entry {
    /// Create an entry with a fresh id and the given title
    pub fn new(title: impl Into<String>, entry_type: EntryType) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), title, entry_type)
    }

    /// Create an entry with a source-assigned id
    pub fn with_id(id: impl Into<String>, title: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: Vec::new(),
            authors_truncated: false,
            year: None,
            identifiers: Identifiers::default(),
            url: None,
            venue: None,
            entry_type,
            source_key: None,
            provenance: None,
        }
    }

    /// Family name of the first author, if any
    pub fn first_author_surname(&self) -> Option<&str> {
        self.authors.first().map(|a| a.family_name.as_str())
    }

    /// An entry is indexable when at least one identifier or a URL is present
    pub fn is_indexable(&self) -> bool {
        self.identifiers.doi.is_some()
            || self.identifiers.arxiv_id.is_some()
            || self.identifiers.isbn.is_some()
            || self.url.is_some()
    }
}
