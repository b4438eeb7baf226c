//! Citation-to-entry matching
//!
//! Strategies run in fixed precedence order: DOI, then arXiv, then ISBN,
//! then exact URL, then author-year. The first strategy that produces a hit
//! or an ambiguity terminates the cascade; a malformed identifier for one
//! strategy degrades to the next rather than aborting the match.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::MatchConfig;
use crate::index::CitationIndex;
use recite_domain::{Entry, RawCitation};
use recite_identifiers::{
    base_key, canonical_arxiv_id, extract_arxiv_ids, extract_dois, extract_isbns, normalize_doi,
    normalize_url,
};

/// The strategy that produced a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    Doi,
    Arxiv,
    Isbn,
    Url,
    AuthorYear,
}

impl MatchStrategy {
    pub fn confidence(&self) -> Confidence {
        match self {
            MatchStrategy::AuthorYear => Confidence::Low,
            _ => Confidence::High,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    High,
}

/// Outcome of resolving one citation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchResult {
    Matched {
        entry_id: String,
        strategy: MatchStrategy,
        confidence: Confidence,
    },
    /// Multiple entries share the matched key; surfaced, never guessed
    Ambiguous {
        entry_ids: Vec<String>,
        strategy: MatchStrategy,
    },
    NotFound,
}

lazy_static! {
    // Leading "Surname" or "Surname et al." style token in citation text
    static ref LEADING_SURNAME: Regex = Regex::new(r"^\s*(?P<surname>\p{Lu}[\p{L}'-]+)").unwrap();
    static ref CITATION_YEAR: Regex = Regex::new(r"\b(?P<year>(?:19|20)\d{2})\b").unwrap();
}

/// Resolves raw citations against a built index.
///
/// Borrows the entries and index; resolution never mutates either.
pub struct CitationMatcher<'a> {
    entries: &'a [Entry],
    index: &'a CitationIndex,
    config: &'a MatchConfig,
}

impl<'a> CitationMatcher<'a> {
    pub fn new(entries: &'a [Entry], index: &'a CitationIndex, config: &'a MatchConfig) -> Self {
        Self {
            entries,
            index,
            config,
        }
    }

    /// Run the strategy cascade for one citation
    pub fn resolve(&self, citation: &RawCitation) -> MatchResult {
        if let Some(result) = self.try_doi(citation) {
            return result;
        }
        if let Some(result) = self.try_arxiv(citation) {
            return result;
        }
        if let Some(result) = self.try_isbn(citation) {
            return result;
        }
        if let Some(result) = self.try_url(citation) {
            return result;
        }
        if let Some(result) = self.try_author_year(citation) {
            return result;
        }
        debug!(
            document = %citation.location.document,
            line = citation.location.line,
            "citation did not resolve"
        );
        MatchResult::NotFound
    }

    /// Resolve every citation, in input order
    pub fn resolve_all(&self, citations: &[RawCitation]) -> Vec<MatchResult> {
        citations.iter().map(|c| self.resolve(c)).collect()
    }

    fn try_doi(&self, citation: &RawCitation) -> Option<MatchResult> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(doi) = citation.hints.doi.as_deref().and_then(normalize_doi) {
            candidates.push(doi);
        }
        if let Some(url) = &citation.url {
            if self.is_doi_host(url) {
                candidates.extend(extract_dois(url));
            }
        }
        candidates.extend(extract_dois(&citation.display_text));

        for doi in candidates {
            if let Some(result) = self.lookup(&self.index.doi, &doi, MatchStrategy::Doi) {
                return Some(result);
            }
        }
        None
    }

    /// True when the URL's host is a configured DOI resolver domain or a
    /// subdomain of one; substring matches elsewhere in the URL don't count.
    fn is_doi_host(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        self.config
            .doi_host_domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    }

    fn try_arxiv(&self, citation: &RawCitation) -> Option<MatchResult> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(id) = citation.hints.arxiv_id.as_deref().and_then(canonical_arxiv_id) {
            candidates.push(id);
        }
        if let Some(url) = &citation.url {
            candidates.extend(extract_arxiv_ids(url));
        }
        candidates.extend(extract_arxiv_ids(&citation.display_text));

        for id in candidates {
            if let Some(result) = self.lookup(&self.index.arxiv, &id, MatchStrategy::Arxiv) {
                return Some(result);
            }
        }
        None
    }

    fn try_isbn(&self, citation: &RawCitation) -> Option<MatchResult> {
        for isbn in extract_isbns(&citation.display_text) {
            if let Some(result) = self.lookup(&self.index.isbn, &isbn, MatchStrategy::Isbn) {
                return Some(result);
            }
        }
        None
    }

    fn try_url(&self, citation: &RawCitation) -> Option<MatchResult> {
        let url = citation.url.as_deref().and_then(normalize_url)?;
        self.lookup(&self.index.url, &url, MatchStrategy::Url)
    }

    /// Last resort: `surname + year` pulled from the display text. Low
    /// confidence; a key collision becomes an explicit ambiguity.
    fn try_author_year(&self, citation: &RawCitation) -> Option<MatchResult> {
        let key = author_year_from_text(&citation.display_text)?;

        if self.index.author_year.has_collision(&key) {
            let entry_ids = self
                .index
                .author_year
                .candidates(&key)
                .into_iter()
                .map(|pos| self.entries[pos].id.clone())
                .collect();
            return Some(MatchResult::Ambiguous {
                entry_ids,
                strategy: MatchStrategy::AuthorYear,
            });
        }

        self.lookup(&self.index.author_year, &key, MatchStrategy::AuthorYear)
    }

    fn lookup(
        &self,
        index: &crate::index::KeyIndex,
        key: &str,
        strategy: MatchStrategy,
    ) -> Option<MatchResult> {
        let position = index.get(key)?;
        Some(MatchResult::Matched {
            entry_id: self.entries[position].id.clone(),
            strategy,
            confidence: strategy.confidence(),
        })
    }
}

/// Derive an author-year key from citation display text: a leading
/// capitalized token plus the first plausible year.
pub fn author_year_from_text(text: &str) -> Option<String> {
    let surname = LEADING_SURNAME.captures(text)?["surname"].to_string();
    let year: i32 = CITATION_YEAR.captures(text)?["year"].parse().ok()?;
    Some(base_key(Some(&surname), Some(year)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CitationIndex;
    use recite_domain::{Author, EntryType, IdentifierHints, Location};

    fn loc() -> Location {
        Location {
            document: "notes.md".to_string(),
            line: 1,
        }
    }

    fn corpus() -> Vec<Entry> {
        let mut transformer = Entry::with_id("vaswani", "Attention Is All You Need", EntryType::Preprint);
        transformer.identifiers.arxiv_id = Some("1706.03762".to_string());
        transformer.authors.push(Author::new("Vaswani"));
        transformer.year = Some(2017);

        let mut nature = Entry::with_id("doe-nature", "A Result", EntryType::JournalArticle);
        nature.identifiers.doi = Some("10.1234/example.2023.001".to_string());
        nature.authors.push(Author::new("Doe"));
        nature.year = Some(2023);

        let mut blog = Entry::with_id("blog", "A Blog Post", EntryType::Webpage);
        blog.url = Some("https://example.org/post".to_string());

        let mut smith_a = Entry::with_id("smith-a", "On Apples", EntryType::JournalArticle);
        smith_a.authors.push(Author::new("Smith"));
        smith_a.year = Some(2020);
        let mut smith_b = Entry::with_id("smith-b", "On Oranges", EntryType::JournalArticle);
        smith_b.authors.push(Author::new("Smith"));
        smith_b.year = Some(2020);

        vec![transformer, nature, blog, smith_a, smith_b]
    }

    fn matcher_fixture() -> (Vec<Entry>, CitationIndex, MatchConfig) {
        let entries = corpus();
        let config = MatchConfig::default();
        let report = CitationIndex::build(&entries, &config);
        (entries, report.index, config)
    }

    #[test]
    fn test_doi_url_matches_case_insensitively() {
        let (entries, index, config) = matcher_fixture();
        let matcher = CitationMatcher::new(&entries, &index, &config);

        let citation = RawCitation::new("some paper", loc())
            .with_url("https://doi.org/10.1234/EXAMPLE.2023.001");
        let result = matcher.resolve(&citation);
        assert_eq!(
            result,
            MatchResult::Matched {
                entry_id: "doe-nature".to_string(),
                strategy: MatchStrategy::Doi,
                confidence: Confidence::High,
            }
        );
    }

    #[test]
    fn test_doi_lookalike_host_is_not_a_doi_url() {
        let (entries, index, config) = matcher_fixture();
        let matcher = CitationMatcher::new(&entries, &index, &config);

        // host merely contains "doi.org" as a substring
        let citation = RawCitation::new("some paper", loc())
            .with_url("https://notdoi.org/10.1234/example.2023.001");
        assert_eq!(matcher.resolve(&citation), MatchResult::NotFound);

        // a genuine subdomain of a resolver domain still qualifies
        let citation = RawCitation::new("some paper", loc())
            .with_url("https://www.doi.org/10.1234/example.2023.001");
        match matcher.resolve(&citation) {
            MatchResult::Matched { strategy, .. } => assert_eq!(strategy, MatchStrategy::Doi),
            other => panic!("expected DOI match, got {other:?}"),
        }
    }

    #[test]
    fn test_arxiv_from_hint() {
        let (entries, index, config) = matcher_fixture();
        let matcher = CitationMatcher::new(&entries, &index, &config);

        let citation = RawCitation::new("Vaswani et al. 2017", loc()).with_hints(IdentifierHints {
            arxiv_id: Some("1706.03762v5".to_string()),
            ..Default::default()
        });
        match matcher.resolve(&citation) {
            MatchResult::Matched {
                entry_id, strategy, ..
            } => {
                assert_eq!(entry_id, "vaswani");
                assert_eq!(strategy, MatchStrategy::Arxiv);
            }
            other => panic!("expected arXiv match, got {other:?}"),
        }
    }

    #[test]
    fn test_old_format_arxiv_citation_resolves() {
        let mut classic = Entry::with_id("classic", "A Classic Preprint", EntryType::Preprint);
        classic.identifiers.arxiv_id = Some("cond-mat/9901001".to_string());
        let entries = vec![classic];
        let config = MatchConfig::default();
        let report = CitationIndex::build(&entries, &config);
        let matcher = CitationMatcher::new(&entries, &report.index, &config);

        let citation = RawCitation::new("Classic: cond-mat/9901001v1", loc());
        match matcher.resolve(&citation) {
            MatchResult::Matched {
                entry_id, strategy, ..
            } => {
                assert_eq!(entry_id, "classic");
                assert_eq!(strategy, MatchStrategy::Arxiv);
            }
            other => panic!("expected arXiv match, got {other:?}"),
        }
    }

    #[test]
    fn test_url_match_high_confidence() {
        let (entries, index, config) = matcher_fixture();
        let matcher = CitationMatcher::new(&entries, &index, &config);

        let citation =
            RawCitation::new("that blog post", loc()).with_url("https://www.example.org/post/");
        match matcher.resolve(&citation) {
            MatchResult::Matched {
                entry_id,
                confidence,
                strategy,
            } => {
                assert_eq!(entry_id, "blog");
                assert_eq!(strategy, MatchStrategy::Url);
                assert_eq!(confidence, Confidence::High);
            }
            other => panic!("expected URL match, got {other:?}"),
        }
    }

    #[test]
    fn test_author_year_fallback_low_confidence() {
        let (entries, index, config) = matcher_fixture();
        let matcher = CitationMatcher::new(&entries, &index, &config);

        let citation = RawCitation::new("Doe (2023) showed that", loc());
        match matcher.resolve(&citation) {
            MatchResult::Matched {
                entry_id,
                strategy,
                confidence,
            } => {
                assert_eq!(entry_id, "doe-nature");
                assert_eq!(strategy, MatchStrategy::AuthorYear);
                assert_eq!(confidence, Confidence::Low);
            }
            other => panic!("expected author-year match, got {other:?}"),
        }
    }

    #[test]
    fn test_ambiguous_author_year_surfaces_all_candidates() {
        let (entries, index, config) = matcher_fixture();
        let matcher = CitationMatcher::new(&entries, &index, &config);

        let citation = RawCitation::new("Smith 2020", loc());
        match matcher.resolve(&citation) {
            MatchResult::Ambiguous {
                entry_ids,
                strategy,
            } => {
                assert_eq!(entry_ids, vec!["smith-a", "smith-b"]);
                assert_eq!(strategy, MatchStrategy::AuthorYear);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_doi_degrades_to_next_strategy() {
        let (entries, index, config) = matcher_fixture();
        let matcher = CitationMatcher::new(&entries, &index, &config);

        // hint DOI is garbage, but the text still carries an arXiv id
        let citation = RawCitation::new("see arXiv:1706.03762", loc()).with_hints(IdentifierHints {
            doi: Some("not-a-doi".to_string()),
            ..Default::default()
        });
        match matcher.resolve(&citation) {
            MatchResult::Matched { strategy, .. } => assert_eq!(strategy, MatchStrategy::Arxiv),
            other => panic!("expected arXiv match, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found() {
        let (entries, index, config) = matcher_fixture();
        let matcher = CitationMatcher::new(&entries, &index, &config);

        let citation = RawCitation::new("an unreferenced remark", loc());
        assert_eq!(matcher.resolve(&citation), MatchResult::NotFound);
    }

    #[test]
    fn test_author_year_from_text() {
        assert_eq!(
            author_year_from_text("Vaswani et al. (2017)").as_deref(),
            Some("vaswani2017")
        );
        assert_eq!(author_year_from_text("no year here"), None);
        assert_eq!(author_year_from_text("lowercase 2020 start"), None);
    }
}
