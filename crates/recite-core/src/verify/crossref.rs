//! Crossref works-API response parsing
//!
//! Transport lives with the caller; this module only turns a
//! `/works/{doi}` response body into `VerifiedMetadata`.

use serde::Deserialize;

use super::VerifiedMetadata;

#[derive(Deserialize)]
struct WorksResponse {
    message: Work,
}

#[derive(Deserialize)]
struct Work {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<WorkAuthor>,
}

#[derive(Deserialize)]
struct WorkAuthor {
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl WorkAuthor {
    fn display_name(&self) -> Option<String> {
        if let Some(family) = &self.family {
            return Some(match &self.given {
                Some(given) => format!("{family}, {given}"),
                None => family.clone(),
            });
        }
        // organizations come through as a bare "name"
        self.name.clone()
    }
}

/// Parse a works-API response body. Returns `None` when the record has no
/// usable title.
pub fn parse_work_response(body: &str) -> Result<Option<VerifiedMetadata>, serde_json::Error> {
    let response: WorksResponse = serde_json::from_str(body)?;
    let Some(title) = response.message.title.into_iter().next() else {
        return Ok(None);
    };

    let author_count = response.message.author.len() as u32;
    let authors = response
        .message
        .author
        .iter()
        .filter_map(WorkAuthor::display_name)
        .collect();

    Ok(Some(VerifiedMetadata {
        title,
        authors,
        author_count,
    }))
}
