//! Identifier normalization and extraction for the recite suite
//!
//! Provides pure functions for:
//! - Normalizing DOIs, arXiv IDs, ISBNs, and URLs into comparable forms
//! - Extracting identifiers from free text and URLs
//! - Validating identifier syntax and checksums
//! - Citation key primitives (base keys, uniquification)
//!
//! Every normalizer is deterministic: the same input always yields the same
//! output (or `None` for malformed input). Index correctness depends on this.

pub mod cite_key;
pub mod extractors;
pub mod normalize;
pub mod validators;

pub use cite_key::{base_key, sanitize_key, uniquify_key};
pub use extractors::{
    extract_arxiv_ids, extract_dois, extract_hints, extract_isbns, ExtractedIdentifier,
};
pub use normalize::{
    canonical_arxiv_id, normalize_arxiv_id, normalize_doi, normalize_isbn, normalize_url,
};
pub use validators::{is_valid_arxiv_id, is_valid_doi, is_valid_isbn};
