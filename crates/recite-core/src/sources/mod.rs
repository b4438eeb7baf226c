//! Bibliography sources
//!
//! A source produces entries from somewhere: a CSL-JSON export, a reference
//! manager, a shared library. Sources only load; write-back capability is
//! advertised but exercised elsewhere.

pub mod csl;

use recite_domain::Entry;

pub use csl::CslFileSource;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("source {source_id} unavailable: {reason}")]
    Unavailable { source_id: String, reason: String },
    #[error("source {source_id} returned malformed data: {reason}")]
    Parse { source_id: String, reason: String },
    #[error("source {source_id} requires credentials")]
    CredentialsRequired { source_id: String },
}

/// A provider of bibliographic entries
pub trait BibliographySource {
    /// Stable identifier, recorded as entry provenance
    fn id(&self) -> &str;

    fn load_entries(&self) -> Result<Vec<Entry>, SourceError>;

    fn requires_credentials(&self) -> bool {
        false
    }

    /// Whether corrections could be pushed back to this source
    fn can_write_back(&self) -> bool {
        false
    }
}
