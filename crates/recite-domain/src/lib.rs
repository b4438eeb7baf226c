//! Bibliographic domain types shared across the recite suite
//!
//! This crate provides the canonical data model for citation reconciliation:
//! - Entry: a bibliographic record loaded from a source
//! - Author: structured author name with field parsing
//! - Identifiers: DOI, arXiv, ISBN, PMID
//! - RawCitation: a citation fragment extracted from a document
//!
//! Entries are created once per load and are immutable during matching and
//! validation; the only artifact written back is the generated citation key.

pub mod author;
pub mod citation;
pub mod entry;
pub mod identifiers;

pub use author::{parse_author_field, Author, ParsedAuthors};
pub use citation::{IdentifierHints, Location, RawCitation};
pub use entry::{Entry, EntryType};
pub use identifiers::Identifiers;
