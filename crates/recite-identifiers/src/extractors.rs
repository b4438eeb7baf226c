//! Identifier extraction from free text and URLs

use lazy_static::lazy_static;
use regex::Regex;
use recite_domain::IdentifierHints;

use crate::normalize::{canonical_arxiv_id, normalize_doi, normalize_isbn};

/// Extracted identifier with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedIdentifier {
    pub identifier_type: &'static str,
    pub value: String,
    pub start_index: usize,
    pub end_index: usize,
}

lazy_static! {
    // DOIs start with 10. followed by a registrant code and suffix
    static ref DOI_REGEX: Regex = Regex::new(
        r#"(?i)(?:doi[:\s]*)?(?:https?://(?:dx\.)?doi\.org/)?(?P<doi>10\.\d{4,}/[^\s\]}>"',;]+)"#
    )
    .unwrap();

    // New (1234.56789) and old (cond-mat/9901001) arXiv formats
    static ref ARXIV_REGEX: Regex = Regex::new(
        r"(?i)(?:arxiv[:\s]*)?(?:https?://(?:www\.)?arxiv\.org/(?:abs|pdf)/)?(?P<id>(?:\d{4}\.\d{4,5}(?:v\d+)?)|(?:[a-z-]+(?:\.[a-z-]+)?/\d{7}(?:v\d+)?))"
    )
    .unwrap();

    static ref ISBN_REGEX: Regex = Regex::new(
        r"(?i)(?:isbn[:\s-]*)?(?P<isbn>(?:97[89][- ]?)?(?:\d[- ]?){9}[\dxX])"
    )
    .unwrap();

    static ref PMID_URL: Regex =
        Regex::new(r"pubmed\.ncbi\.nlm\.nih\.gov/(?P<pmid>\d+)").unwrap();
}

/// Extract every normalized DOI found in the text
pub fn extract_dois(text: &str) -> Vec<String> {
    DOI_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.name("doi"))
        .filter_map(|m| normalize_doi(m.as_str()))
        .collect()
}

/// Extract every arXiv id found in the text.
///
/// New-format ids are normalized (version stripped, date window checked);
/// old-format `archive/NNNNNNN` ids are lower-cased with the version
/// stripped.
pub fn extract_arxiv_ids(text: &str) -> Vec<String> {
    ARXIV_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.name("id"))
        .filter_map(|m| canonical_arxiv_id(m.as_str()))
        .collect()
}

/// Extract every checksum-valid ISBN found in the text
pub fn extract_isbns(text: &str) -> Vec<String> {
    ISBN_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.name("isbn"))
        .filter_map(|m| normalize_isbn(m.as_str()))
        .collect()
}

/// Extract all identifiers with their positions, sorted by position
pub fn extract_all(text: &str) -> Vec<ExtractedIdentifier> {
    let mut results = Vec::new();

    for cap in DOI_REGEX.captures_iter(text) {
        if let Some(m) = cap.name("doi") {
            if let Some(doi) = normalize_doi(m.as_str()) {
                results.push(ExtractedIdentifier {
                    identifier_type: "doi",
                    value: doi,
                    start_index: m.start(),
                    end_index: m.end(),
                });
            }
        }
    }

    for cap in ARXIV_REGEX.captures_iter(text) {
        if let Some(m) = cap.name("id") {
            if let Some(id) = canonical_arxiv_id(m.as_str()) {
                results.push(ExtractedIdentifier {
                    identifier_type: "arxiv",
                    value: id,
                    start_index: m.start(),
                    end_index: m.end(),
                });
            }
        }
    }

    for cap in ISBN_REGEX.captures_iter(text) {
        if let Some(m) = cap.name("isbn") {
            if let Some(isbn) = normalize_isbn(m.as_str()) {
                results.push(ExtractedIdentifier {
                    identifier_type: "isbn",
                    value: isbn,
                    start_index: m.start(),
                    end_index: m.end(),
                });
            }
        }
    }

    results.sort_by_key(|r| r.start_index);
    results
}

/// Pull identifier hints from a citation's URL and display text.
///
/// Used when constructing a `RawCitation`: the URL is the stronger signal,
/// the display text a fallback.
pub fn extract_hints(display_text: &str, url: Option<&str>) -> IdentifierHints {
    let mut hints = IdentifierHints::default();

    for source in url.iter().copied().chain(std::iter::once(display_text)) {
        if hints.doi.is_none() {
            hints.doi = extract_dois(source).into_iter().next();
        }
        if hints.arxiv_id.is_none() {
            hints.arxiv_id = extract_arxiv_ids(source).into_iter().next();
        }
        if hints.pmid.is_none() {
            hints.pmid = PMID_URL
                .captures(source)
                .map(|cap| cap["pmid"].to_string());
        }
    }

    hints
}
