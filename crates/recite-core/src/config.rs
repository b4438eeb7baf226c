//! Engine configuration
//!
//! All categorization rule tables (domain lists, stub-title prefixes,
//! thresholds, required fields) are data, not code, so the quality taxonomy
//! can change without touching matching or validation logic. Defaults are
//! compiled in; a TOML file can override any table.

use recite_domain::EntryType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Configuration for the matcher and duplicate detector
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Domains that host DOI resolvers; a citation URL containing one of
    /// these is routed to the DOI strategy
    pub doi_host_domains: Vec<String>,
    /// Title similarity (0-100) at or above which a pair is a duplicate
    /// candidate
    pub duplicate_title_threshold: f64,
    /// Author-surname Jaccard overlap at or above which a pair is a
    /// duplicate candidate
    pub duplicate_author_overlap: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            doi_host_domains: vec!["doi.org".to_string(), "dx.doi.org".to_string()],
            duplicate_title_threshold: 92.0,
            duplicate_author_overlap: 0.8,
        }
    }
}

/// Configuration for the metadata validator
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Title prefixes left behind by failed metadata extraction
    pub stub_title_prefixes: Vec<String>,
    /// Literal domain names that sometimes end up as titles
    pub known_domain_titles: Vec<String>,
    /// TLD suffixes that mark a title as a bare domain
    pub domain_tld_suffixes: Vec<String>,
    /// Legitimate short titles that must never be flagged as domains
    pub short_title_exceptions: Vec<String>,
    /// Substrings that mark a source citation key as temporary
    pub temp_key_markers: Vec<String>,
    /// Source keys shorter than this are implausible for any key scheme
    pub min_plausible_key_len: usize,
    /// Title similarity (0-100) below which a verified title mismatches
    pub fuzzy_title_threshold: f64,
    /// Author counts at or above this legitimately truncate with "et al"
    pub large_collaboration_threshold: usize,
    /// Required fields per entry type (keys are EntryType strings)
    pub required_fields: HashMap<String, Vec<String>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let mut required_fields = HashMap::new();
        let insert = |map: &mut HashMap<String, Vec<String>>, ty: &str, fields: &[&str]| {
            map.insert(ty.to_string(), fields.iter().map(|s| s.to_string()).collect());
        };
        insert(
            &mut required_fields,
            "journal-article",
            &["title", "authors", "venue", "year"],
        );
        insert(&mut required_fields, "preprint", &["title", "authors", "year"]);
        insert(&mut required_fields, "book", &["title", "authors", "year"]);
        insert(&mut required_fields, "chapter", &["title", "authors", "year"]);
        insert(
            &mut required_fields,
            "conference",
            &["title", "authors", "venue", "year"],
        );
        insert(&mut required_fields, "thesis", &["title", "authors", "year"]);
        insert(&mut required_fields, "webpage", &["title", "url"]);
        insert(&mut required_fields, "other", &["title"]);

        Self {
            stub_title_prefixes: vec![
                "Web page by ".to_string(),
                "Added from URL:".to_string(),
                "Untitled".to_string(),
                "Snapshot of ".to_string(),
            ],
            known_domain_titles: vec![
                "github.com".to_string(),
                "arxiv.org".to_string(),
                "en.wikipedia.org".to_string(),
                "medium.com".to_string(),
            ],
            domain_tld_suffixes: vec![
                ".com".to_string(),
                ".org".to_string(),
                ".net".to_string(),
                ".edu".to_string(),
                ".gov".to_string(),
                ".io".to_string(),
                ".ai".to_string(),
            ],
            short_title_exceptions: vec![
                "Nature".to_string(),
                "Science".to_string(),
                "Cell".to_string(),
                "Mind".to_string(),
                "Radio".to_string(),
            ],
            temp_key_markers: vec!["temp".to_string(), "tmp".to_string(), "autokey".to_string()],
            min_plausible_key_len: 6,
            fuzzy_title_threshold: 70.0,
            large_collaboration_threshold: 15,
            required_fields,
        }
    }
}

impl ValidationConfig {
    /// Required fields for an entry type; unknown types require a title only
    pub fn required_fields_for(&self, entry_type: &EntryType) -> &[String] {
        static FALLBACK: &[String] = &[];
        self.required_fields
            .get(entry_type.as_str())
            .map(|v| v.as_slice())
            .unwrap_or(FALLBACK)
    }
}

/// Top-level engine configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matching: MatchConfig,
    pub validation: ValidationConfig,
}

impl EngineConfig {
    /// Parse a TOML override; absent tables keep their defaults
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {message}")]
    Io { path: String, message: String },
    #[error("invalid config {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.matching.duplicate_title_threshold, 92.0);
        assert_eq!(config.validation.large_collaboration_threshold, 15);
        assert!(config
            .validation
            .required_fields_for(&EntryType::JournalArticle)
            .contains(&"venue".to_string()));
    }

    #[test]
    fn test_partial_toml_override() {
        let toml = r#"
            [matching]
            duplicate_title_threshold = 95.0

            [validation]
            temp_key_markers = ["draft"]
        "#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.matching.duplicate_title_threshold, 95.0);
        // untouched tables keep defaults
        assert_eq!(config.matching.duplicate_author_overlap, 0.8);
        assert_eq!(config.validation.temp_key_markers, vec!["draft"]);
        assert_eq!(config.validation.min_plausible_key_len, 6);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recite.toml");
        std::fs::write(&path, "[matching]\ndoi_host_domains = [\"doi.org\"]\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.matching.doi_host_domains, vec!["doi.org"]);

        assert!(EngineConfig::load(Path::new("/nonexistent/recite.toml")).is_err());
    }
}
