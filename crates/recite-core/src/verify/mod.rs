//! External metadata verification
//!
//! Verification is advisory: it enriches validation with externally fetched
//! titles and author counts, and a failed or cancelled fetch never blocks
//! the rest of the pipeline. Lookups for distinct entries run concurrently
//! under a permit cap; entries sharing a DOI share one lookup.

pub mod crossref;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use recite_domain::Entry;
use recite_identifiers::normalize_doi;

/// Metadata fetched from an external registry for one DOI
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerifiedMetadata {
    pub title: String,
    pub authors: Vec<String>,
    pub author_count: u32,
}

/// Outcome of a single lookup
#[derive(Clone, Debug, PartialEq)]
pub enum VerifyOutcome {
    Found(VerifiedMetadata),
    NotFound,
    /// The registry asked us to back off; the lookup will be retried
    RateLimited,
}

#[derive(thiserror::Error, Debug)]
pub enum VerifyError {
    #[error("lookup request failed: {0}")]
    Request(String),
    #[error("lookup timed out")]
    Timeout,
}

/// A metadata registry that can be queried by DOI
#[async_trait]
pub trait MetadataVerifier: Send + Sync {
    fn id(&self) -> &str;

    async fn lookup_by_doi(&self, doi: &str) -> Result<VerifyOutcome, VerifyError>;
}

/// Knobs for the concurrent fetch loop
#[derive(Clone, Debug)]
pub struct VerifyOptions {
    /// Maximum in-flight lookups
    pub concurrency: usize,
    /// Per-request deadline
    pub timeout: Duration,
    /// Retries after a failure or rate-limit response
    pub max_retries: u32,
    /// Base delay between retries; grows linearly per attempt
    pub backoff: Duration,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(10),
            max_retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Shared backoff window for one verifier.
///
/// A rate-limit response pauses every pending lookup against the service,
/// not just the task that saw it; each task consults the gate before
/// issuing a request.
struct PauseGate {
    until: Mutex<Instant>,
}

impl PauseGate {
    fn new() -> Self {
        Self {
            until: Mutex::new(Instant::now()),
        }
    }

    /// Sleep until any active pause window has elapsed
    async fn wait(&self) {
        let until = *self.until.lock().await;
        tokio::time::sleep_until(until).await;
    }

    /// Extend the pause window; never shortens an existing one
    async fn pause_for(&self, duration: Duration) {
        let mut until = self.until.lock().await;
        let target = Instant::now() + duration;
        if target > *until {
            *until = target;
        }
    }
}

/// Fetch verified metadata for every entry that carries a valid DOI.
///
/// Returns whatever completed before an error budget ran out or the token
/// was cancelled; partial results are kept, never discarded.
pub async fn fetch_verified(
    entries: &[Entry],
    verifier: Arc<dyn MetadataVerifier>,
    options: &VerifyOptions,
    cancel: &CancellationToken,
) -> HashMap<String, VerifiedMetadata> {
    // entries sharing a DOI get one lookup between them
    let mut by_doi: HashMap<String, Vec<String>> = HashMap::new();
    for entry in entries {
        if let Some(doi) = entry.identifiers.doi.as_deref().and_then(normalize_doi) {
            by_doi.entry(doi).or_default().push(entry.id.clone());
        }
    }

    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let gate = Arc::new(PauseGate::new());
    let mut tasks: JoinSet<Option<(String, VerifiedMetadata)>> = JoinSet::new();

    for doi in by_doi.keys().cloned() {
        let verifier = Arc::clone(&verifier);
        let semaphore = Arc::clone(&semaphore);
        let gate = Arc::clone(&gate);
        let cancel = cancel.clone();
        let options = options.clone();
        tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return None;
            };
            lookup_with_retries(&*verifier, &doi, &options, &gate, &cancel)
                .await
                .map(|meta| (doi, meta))
        });
    }

    let mut verified = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        let Ok(Some((doi, meta))) = joined else {
            continue;
        };
        if let Some(entry_ids) = by_doi.get(&doi) {
            for entry_id in entry_ids {
                verified.insert(entry_id.clone(), meta.clone());
            }
        }
    }
    verified
}

async fn lookup_with_retries(
    verifier: &dyn MetadataVerifier,
    doi: &str,
    options: &VerifyOptions,
    gate: &PauseGate,
    cancel: &CancellationToken,
) -> Option<VerifiedMetadata> {
    for attempt in 0..=options.max_retries {
        if cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = gate.wait() => {}
        }

        let lookup = tokio::time::timeout(options.timeout, verifier.lookup_by_doi(doi));
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return None,
            result = lookup => match result {
                Ok(inner) => inner,
                Err(_) => Err(VerifyError::Timeout),
            },
        };

        match outcome {
            Ok(VerifyOutcome::Found(meta)) => return Some(meta),
            Ok(VerifyOutcome::NotFound) => {
                debug!(doi, source = verifier.id(), "no record for DOI");
                return None;
            }
            Ok(VerifyOutcome::RateLimited) => {
                warn!(doi, source = verifier.id(), attempt, "rate limited, pausing lookups");
                // holds back every pending lookup, not just this one
                gate.pause_for(options.backoff * (attempt + 1)).await;
                continue;
            }
            Err(error) => {
                warn!(doi, source = verifier.id(), attempt, %error, "lookup failed");
            }
        }

        if attempt < options.max_retries {
            tokio::time::sleep(options.backoff * (attempt + 1)).await;
        }
    }
    None
}
