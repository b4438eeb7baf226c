//! Load-then-reconcile pipeline
//!
//! Loading is ordered before everything else: the `Reconciler` is built
//! from a finished entry list and its index, so matching, validation, and
//! key assignment can never observe a half-loaded library.

use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::dedup::DuplicateFlag;
use crate::index::{CitationIndex, IndexReport};
use crate::keys;
use crate::matcher::{CitationMatcher, MatchResult};
use crate::sources::BibliographySource;
use crate::validation::{self, ValidationIssue};
use crate::verify::VerifiedMetadata;
use recite_domain::{Entry, RawCitation};

/// How source failures are treated during loading
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceMode {
    /// Failed sources are skipped with a warning
    Lenient,
    /// The named source must load and be non-empty
    Strict { required_source: String },
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("required source {source_id} unavailable: {reason}")]
    RequiredSourceUnavailable { source_id: String, reason: String },
    #[error("required source {source_id} loaded zero entries")]
    RequiredSourceEmpty { source_id: String },
}

/// Entries from every source that loaded, plus the sources that did not
#[derive(Debug, Default)]
pub struct LoadReport {
    pub entries: Vec<Entry>,
    /// (source id, failure reason) for each skipped source
    pub failed_sources: Vec<(String, String)>,
}

/// Load entries from every configured source.
///
/// In lenient mode a failed source is skipped and recorded; in strict mode
/// the required source failing, missing, or coming back empty aborts the
/// load.
pub fn load_sources(
    sources: &[Box<dyn BibliographySource>],
    mode: &SourceMode,
) -> Result<LoadReport, PipelineError> {
    if let SourceMode::Strict { required_source } = mode {
        if !sources.iter().any(|s| s.id() == required_source) {
            return Err(PipelineError::RequiredSourceUnavailable {
                source_id: required_source.clone(),
                reason: "not configured".to_string(),
            });
        }
    }

    let mut report = LoadReport::default();
    for source in sources {
        match source.load_entries() {
            Ok(entries) => {
                info!(source = source.id(), count = entries.len(), "source loaded");
                if let SourceMode::Strict { required_source } = mode {
                    if source.id() == required_source && entries.is_empty() {
                        return Err(PipelineError::RequiredSourceEmpty {
                            source_id: required_source.clone(),
                        });
                    }
                }
                report.entries.extend(entries);
            }
            Err(error) => {
                if let SourceMode::Strict { required_source } = mode {
                    if source.id() == required_source {
                        return Err(PipelineError::RequiredSourceUnavailable {
                            source_id: required_source.clone(),
                            reason: error.to_string(),
                        });
                    }
                }
                warn!(source = source.id(), %error, "source skipped");
                report.failed_sources.push((source.id().to_string(), error.to_string()));
            }
        }
    }
    Ok(report)
}

/// A loaded library with its index built, ready for matching, validation,
/// and key assignment in any order.
pub struct Reconciler {
    entries: Vec<Entry>,
    index: CitationIndex,
    duplicates: Vec<DuplicateFlag>,
    config: EngineConfig,
}

impl Reconciler {
    /// Build the index and duplicate report once over a finished entry list
    pub fn new(entries: Vec<Entry>, config: EngineConfig) -> Self {
        let IndexReport { index, duplicates } = CitationIndex::build(&entries, &config.matching);
        Self {
            entries,
            index,
            duplicates,
            config,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn index(&self) -> &CitationIndex {
        &self.index
    }

    /// Duplicate pairs found at build time; entries are never merged
    pub fn duplicates(&self) -> &[DuplicateFlag] {
        &self.duplicates
    }

    pub fn resolve(&self, citation: &RawCitation) -> MatchResult {
        self.matcher().resolve(citation)
    }

    pub fn resolve_all(&self, citations: &[RawCitation]) -> Vec<MatchResult> {
        self.matcher().resolve_all(citations)
    }

    /// Validate all entries; `verified` maps entry ids to fetched metadata
    pub fn validate(
        &self,
        verified: &HashMap<String, VerifiedMetadata>,
    ) -> Vec<ValidationIssue> {
        validation::validate_entries(&self.entries, &self.config.validation, verified)
    }

    /// Deterministic citation keys for the whole library
    pub fn assign_keys(&self) -> BTreeMap<String, String> {
        keys::assign_keys(&self.entries)
    }

    fn matcher(&self) -> CitationMatcher<'_> {
        CitationMatcher::new(&self.entries, &self.index, &self.config.matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceError;
    use recite_domain::EntryType;

    struct FixedSource {
        id: String,
        result: Result<usize, String>,
    }

    impl BibliographySource for FixedSource {
        fn id(&self) -> &str {
            &self.id
        }

        fn load_entries(&self) -> Result<Vec<Entry>, SourceError> {
            match &self.result {
                Ok(count) => Ok((0..*count)
                    .map(|i| Entry::with_id(format!("{}-{i}", self.id), "T", EntryType::Other))
                    .collect()),
                Err(reason) => Err(SourceError::Unavailable {
                    source_id: self.id.clone(),
                    reason: reason.clone(),
                }),
            }
        }
    }

    fn source(id: &str, result: Result<usize, &str>) -> Box<dyn BibliographySource> {
        Box::new(FixedSource {
            id: id.to_string(),
            result: result.map_err(|s| s.to_string()),
        })
    }

    #[test]
    fn test_lenient_skips_failed_sources() {
        let sources = vec![source("good", Ok(2)), source("bad", Err("offline"))];
        let report = load_sources(&sources, &SourceMode::Lenient).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.failed_sources.len(), 1);
        assert_eq!(report.failed_sources[0].0, "bad");
    }

    #[test]
    fn test_strict_requires_the_named_source() {
        let strict = SourceMode::Strict {
            required_source: "primary".to_string(),
        };

        let sources = vec![source("primary", Err("offline")), source("extra", Ok(1))];
        assert!(matches!(
            load_sources(&sources, &strict),
            Err(PipelineError::RequiredSourceUnavailable { .. })
        ));

        let sources = vec![source("primary", Ok(0))];
        assert!(matches!(
            load_sources(&sources, &strict),
            Err(PipelineError::RequiredSourceEmpty { .. })
        ));

        // the required source not being configured at all is also an error
        let sources = vec![source("extra", Ok(1))];
        assert!(matches!(
            load_sources(&sources, &strict),
            Err(PipelineError::RequiredSourceUnavailable { .. })
        ));

        let sources = vec![source("primary", Ok(3)), source("extra", Err("offline"))];
        let report = load_sources(&sources, &strict).unwrap();
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.failed_sources.len(), 1);
    }

    #[test]
    fn test_pipeline_error_messages_name_the_source() {
        let err = PipelineError::RequiredSourceUnavailable {
            source_id: "primary".to_string(),
            reason: "offline".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required source primary unavailable: offline"
        );
        // the source id is message data, not an underlying error cause
        assert!(std::error::Error::source(&err).is_none());

        let err = PipelineError::RequiredSourceEmpty {
            source_id: "primary".to_string(),
        };
        assert_eq!(err.to_string(), "required source primary loaded zero entries");
    }

    #[test]
    fn test_reconciler_exposes_build_products() {
        let mut a = Entry::with_id("a", "Paper", EntryType::JournalArticle);
        a.identifiers.doi = Some("10.1234/x".to_string());
        let mut b = Entry::with_id("b", "Paper Again", EntryType::JournalArticle);
        b.identifiers.doi = Some("10.1234/x".to_string());

        let reconciler = Reconciler::new(vec![a, b], EngineConfig::default());
        assert_eq!(reconciler.entries().len(), 2);
        assert_eq!(reconciler.duplicates().len(), 1);
        assert_eq!(reconciler.index().doi.get("10.1234/x"), Some(0));
        assert_eq!(reconciler.assign_keys().len(), 2);
    }
}
