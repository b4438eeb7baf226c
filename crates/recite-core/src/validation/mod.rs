//! Metadata quality validation
//!
//! Every issue carries a severity and a machine-readable category so reports
//! can be filtered and acted on in bulk. Validation reads entries and never
//! repairs them; suggested actions are text for a human.

mod rules;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::ValidationConfig;
use crate::verify::VerifiedMetadata;
use recite_domain::Entry;

/// Issue severity, ordered from least to most urgent
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// Machine-readable issue categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    MissingTitle,
    MissingAuthors,
    MissingVenue,
    MissingYear,
    MissingUrl,
    PlaceholderTitle,
    DomainAsTitle,
    TemporaryKey,
    IncompleteAuthors,
    FuzzyTitleMismatch,
}

impl IssueCategory {
    pub fn code(&self) -> &'static str {
        match self {
            IssueCategory::MissingTitle => "MISSING_TITLE",
            IssueCategory::MissingAuthors => "MISSING_AUTHORS",
            IssueCategory::MissingVenue => "MISSING_VENUE",
            IssueCategory::MissingYear => "MISSING_YEAR",
            IssueCategory::MissingUrl => "MISSING_URL",
            IssueCategory::PlaceholderTitle => "PLACEHOLDER_TITLE",
            IssueCategory::DomainAsTitle => "DOMAIN_AS_TITLE",
            IssueCategory::TemporaryKey => "TEMPORARY_KEY",
            IssueCategory::IncompleteAuthors => "INCOMPLETE_AUTHORS",
            IssueCategory::FuzzyTitleMismatch => "FUZZY_TITLE_MISMATCH",
        }
    }
}

/// One finding against one entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub entry_id: String,
    pub category: IssueCategory,
    pub severity: Severity,
    pub message: String,
    pub suggested_action: String,
}

/// Run every rule against a single entry. `verified` is externally fetched
/// metadata for the entry's DOI, when available.
pub fn validate_entry(
    entry: &Entry,
    config: &ValidationConfig,
    verified: Option<&VerifiedMetadata>,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    rules::check_required_fields(entry, config, &mut issues);
    rules::check_placeholder_title(entry, config, &mut issues);
    rules::check_domain_as_title(entry, config, &mut issues);
    rules::check_temporary_key(entry, config, &mut issues);
    rules::check_author_completeness(entry, config, verified, &mut issues);
    rules::check_title_against_verified(entry, config, verified, &mut issues);
    issues
}

/// Validate a whole entry list. `verified` maps entry ids to fetched
/// metadata; entries without a mapping skip the verification-backed rules.
pub fn validate_entries(
    entries: &[Entry],
    config: &ValidationConfig,
    verified: &HashMap<String, VerifiedMetadata>,
) -> Vec<ValidationIssue> {
    entries
        .iter()
        .flat_map(|entry| validate_entry(entry, config, verified.get(&entry.id)))
        .collect()
}

/// The worst severity among an entry's issues, if any
pub fn entry_severity(issues: &[ValidationIssue]) -> Option<Severity> {
    issues.iter().map(|i| i.severity).max()
}
