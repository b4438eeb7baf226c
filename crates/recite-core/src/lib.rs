//! recite-core: citation resolution and metadata-quality engine
//!
//! This crate provides the batch pipeline that reconciles citations found in
//! authored documents against canonical bibliographic records:
//! - One-shot index construction over a loaded entry set (five key indices
//!   with an explicit first-wins collision policy)
//! - A deterministic matching cascade (DOI, arXiv, ISBN, URL, author-year)
//!   that surfaces ambiguity instead of hiding it
//! - Metadata quality validation with a severity-tagged issue taxonomy
//! - Duplicate detection (reported, never auto-merged)
//! - Deterministic, collision-free citation key assignment
//!
//! Sources and external metadata verifiers are consumed through traits; this
//! crate performs no I/O of its own beyond the local CSL-JSON provider.

pub mod config;
pub mod dedup;
pub mod index;
pub mod keys;
pub mod matcher;
pub mod pipeline;
pub mod sources;
pub mod validation;
pub mod verify;

pub use config::{EngineConfig, MatchConfig, ValidationConfig};
pub use dedup::{DuplicateFlag, DuplicateKind};
pub use index::{CitationIndex, IndexKind, IndexReport};
pub use keys::assign_keys;
pub use matcher::{CitationMatcher, Confidence, MatchResult, MatchStrategy};
pub use pipeline::{load_sources, LoadReport, PipelineError, Reconciler, SourceMode};
pub use sources::{BibliographySource, SourceError};
pub use validation::{
    entry_severity, validate_entries, validate_entry, IssueCategory, Severity, ValidationIssue,
};
pub use verify::{
    fetch_verified, MetadataVerifier, VerifiedMetadata, VerifyError, VerifyOptions, VerifyOutcome,
};
