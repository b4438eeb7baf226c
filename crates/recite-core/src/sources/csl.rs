//! CSL-JSON file source
//!
//! Reads the array-of-items format produced by Zotero, Pandoc, and most
//! reference managers. Unknown fields are ignored; a single malformed item
//! fails the whole file since a truncated export is worse than no export.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use recite_domain::{Author, Entry, EntryType};

use super::{BibliographySource, SourceError};

#[derive(Deserialize)]
struct CslItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "type", default)]
    item_type: Option<String>,
    #[serde(default)]
    author: Vec<CslName>,
    #[serde(default)]
    issued: Option<CslDate>,
    #[serde(rename = "DOI", default)]
    doi: Option<String>,
    #[serde(rename = "ISBN", default)]
    isbn: Option<String>,
    #[serde(rename = "URL", default)]
    url: Option<String>,
    #[serde(rename = "container-title", default)]
    container_title: Option<String>,
}

#[derive(Deserialize)]
struct CslName {
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    literal: Option<String>,
}

#[derive(Deserialize)]
struct CslDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<i32>>,
}

impl CslDate {
    fn year(&self) -> Option<i32> {
        self.date_parts.first().and_then(|parts| parts.first()).copied()
    }
}

/// A CSL-JSON file on disk
pub struct CslFileSource {
    id: String,
    path: PathBuf,
}

impl CslFileSource {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

impl BibliographySource for CslFileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load_entries(&self) -> Result<Vec<Entry>, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Unavailable {
            source_id: self.id.clone(),
            reason: format!("{}: {e}", self.path.display()),
        })?;
        let items: Vec<CslItem> =
            serde_json::from_str(&text).map_err(|e| SourceError::Parse {
                source_id: self.id.clone(),
                reason: e.to_string(),
            })?;

        let entries: Vec<Entry> = items
            .into_iter()
            .map(|item| item_to_entry(item, &self.id))
            .collect();
        debug!(source = %self.id, count = entries.len(), "loaded CSL file");
        Ok(entries)
    }
}

fn item_to_entry(item: CslItem, source_id: &str) -> Entry {
    let entry_type = item
        .item_type
        .as_deref()
        .map(EntryType::from_str)
        .unwrap_or(EntryType::Other);

    let mut entry = match &item.id {
        Some(id) => Entry::with_id(
            format!("{source_id}:{id}"),
            item.title.clone().unwrap_or_default(),
            entry_type,
        ),
        None => Entry::new(item.title.clone().unwrap_or_default(), entry_type),
    };

    for name in item.author {
        // a literal "et al." pseudo-author marks truncation, not a person
        if let Some(literal) = name.literal {
            let lowered = literal.trim().trim_end_matches('.').to_lowercase();
            if lowered == "et al" || lowered == "and others" {
                entry.authors_truncated = true;
            } else {
                entry.authors.push(Author::new(literal));
            }
            continue;
        }
        if let Some(family) = name.family {
            let mut author = Author::new(family);
            author.given_name = name.given;
            entry.authors.push(author);
        }
    }

    entry.year = item.issued.as_ref().and_then(CslDate::year);
    entry.identifiers.doi = item.doi;
    entry.identifiers.isbn = item.isbn;
    entry.identifiers.arxiv_id = item
        .url
        .as_deref()
        .and_then(|u| recite_identifiers::extract_arxiv_ids(u).into_iter().next());
    entry.url = item.url;
    entry.venue = item.container_title;
    entry.source_key = item.id;
    entry.provenance = Some(source_id.to_string());

    entry
}
