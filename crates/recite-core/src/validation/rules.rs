//! Individual validation rules
//!
//! Each rule pushes zero or more issues. Rule tables come from
//! `ValidationConfig`; the functions hold only the comparison logic.

use crate::config::ValidationConfig;
use crate::dedup::similarity::title_similarity;
use crate::verify::VerifiedMetadata;
use recite_domain::{Entry, EntryType};

use super::{IssueCategory, Severity, ValidationIssue};

fn issue(
    entry: &Entry,
    category: IssueCategory,
    severity: Severity,
    message: String,
    suggested_action: &str,
) -> ValidationIssue {
    ValidationIssue {
        entry_id: entry.id.clone(),
        category,
        severity,
        message,
        suggested_action: suggested_action.to_string(),
    }
}

/// Required fields vary by entry type; each absence is critical.
pub(super) fn check_required_fields(
    entry: &Entry,
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    for field in config.required_fields_for(&entry.entry_type) {
        let (missing, category) = match field.as_str() {
            "title" => (entry.title.trim().is_empty(), IssueCategory::MissingTitle),
            "authors" => (
                entry.authors.is_empty() && !entry.authors_truncated,
                IssueCategory::MissingAuthors,
            ),
            "venue" => (
                entry.venue.as_deref().map_or(true, |v| v.trim().is_empty()),
                IssueCategory::MissingVenue,
            ),
            "year" => (entry.year.is_none(), IssueCategory::MissingYear),
            "url" => (
                entry.url.as_deref().map_or(true, |u| u.trim().is_empty()),
                IssueCategory::MissingUrl,
            ),
            _ => continue,
        };
        if missing {
            issues.push(issue(
                entry,
                category,
                Severity::Critical,
                format!(
                    "{} entry is missing required field '{field}'",
                    entry.entry_type.as_str()
                ),
                "fill in the field from the original source",
            ));
        }
    }
}

/// Titles left behind by failed metadata extraction, e.g. "Web page by ..."
pub(super) fn check_placeholder_title(
    entry: &Entry,
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    let title = entry.title.trim();
    if title.is_empty() {
        return;
    }
    if let Some(prefix) = config
        .stub_title_prefixes
        .iter()
        .find(|p| title.starts_with(p.as_str()))
    {
        issues.push(issue(
            entry,
            IssueCategory::PlaceholderTitle,
            Severity::Critical,
            format!("title starts with stub prefix '{prefix}'"),
            "replace the placeholder with the real title",
        ));
    }
}

/// A bare domain name standing in for a title. Legitimate short titles
/// ("Nature", "Science") are exempted by the exception list.
pub(super) fn check_domain_as_title(
    entry: &Entry,
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    let title = entry.title.trim();
    if title.is_empty() {
        return;
    }
    if config
        .short_title_exceptions
        .iter()
        .any(|e| e.eq_ignore_ascii_case(title))
    {
        return;
    }

    let lowered = title.to_lowercase();
    let known = config
        .known_domain_titles
        .iter()
        .any(|d| d.eq_ignore_ascii_case(title));
    let bare_domain = !lowered.contains(char::is_whitespace)
        && config
            .domain_tld_suffixes
            .iter()
            .any(|tld| lowered.ends_with(tld.as_str()));

    if known || bare_domain {
        issues.push(issue(
            entry,
            IssueCategory::DomainAsTitle,
            Severity::Critical,
            format!("title '{title}' is a domain name"),
            "replace the domain with the page title",
        ));
    }
}

/// Auto-generated or placeholder source keys
pub(super) fn check_temporary_key(
    entry: &Entry,
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(key) = entry.source_key.as_deref() else {
        return;
    };
    let lowered = key.to_lowercase();
    let marked = config
        .temp_key_markers
        .iter()
        .any(|m| lowered.contains(m.as_str()));

    if marked || key.len() < config.min_plausible_key_len {
        issues.push(issue(
            entry,
            IssueCategory::TemporaryKey,
            Severity::Critical,
            format!("source key '{key}' looks temporary"),
            "assign a permanent citation key",
        ));
    }
}

/// Author-list completeness, judged against an external author count when
/// one is available.
///
/// Truncated lists ("et al", "and others") are acceptable only for large
/// collaborations. Discrete lists of six or more are taken at face value;
/// shorter lists are flagged when the external count says authors are
/// missing.
pub(super) fn check_author_completeness(
    entry: &Entry,
    config: &ValidationConfig,
    verified: Option<&VerifiedMetadata>,
    issues: &mut Vec<ValidationIssue>,
) {
    if entry.entry_type == EntryType::Webpage {
        return;
    }

    let discrete = entry.authors.len();
    let external = verified.map(|v| v.author_count as usize);

    let incomplete = if entry.authors_truncated {
        match external {
            Some(count) => count < config.large_collaboration_threshold,
            None => true,
        }
    } else if discrete >= 6 || discrete == 0 {
        // zero discrete authors is a missing-field problem, not truncation
        false
    } else {
        matches!(external, Some(count) if count > discrete)
    };

    if incomplete {
        let detail = match external {
            Some(count) => format!("{discrete} listed, source reports {count}"),
            None => format!("{discrete} listed with a truncation marker"),
        };
        issues.push(issue(
            entry,
            IssueCategory::IncompleteAuthors,
            Severity::Medium,
            format!("author list appears incomplete ({detail})"),
            "expand the author list from the source record",
        ));
    }
}

/// Local title vs the title fetched for the entry's DOI
pub(super) fn check_title_against_verified(
    entry: &Entry,
    config: &ValidationConfig,
    verified: Option<&VerifiedMetadata>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(verified) = verified else { return };
    let local = entry.title.trim();
    let remote = verified.title.trim();
    if local.is_empty() || remote.is_empty() {
        return;
    }

    let score = title_similarity(local, remote);
    if score < config.fuzzy_title_threshold {
        issues.push(issue(
            entry,
            IssueCategory::FuzzyTitleMismatch,
            Severity::High,
            format!("title disagrees with the record fetched for its DOI (similarity {score:.0})"),
            "check whether the DOI points at the right work",
        ));
    }
}
