/*!
 * Translation chunk coordinator.
 *
 * This module contains functionality for processing translations in batches,
 * with support for concurrency, retry with backoff, and alignment checking.
 */

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::errors::TranslationError;
use crate::subtitle_processor::{SubtitleEntry, SubtitleTrack};
use crate::providers::Provider;

// @const: Optional "{index}: " prefix providers tend to echo back
static INDEX_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s*:\s*").unwrap());

/// Tuning knobs for the coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Entries per batch
    pub chunk_size: usize,

    /// Maximum number of concurrent batch requests
    pub max_concurrent_requests: usize,

    /// Retry attempts for transient provider errors
    pub max_retries: u32,

    /// Base backoff time in milliseconds for exponential backoff
    pub backoff_base_ms: u64,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        CoordinatorOptions {
            chunk_size: 50,
            max_concurrent_requests: 4,
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }
}

/// Status of one batch after processing
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Zero-based batch position in the track
    pub batch_index: usize,

    /// Entries in the batch
    pub entry_count: usize,

    /// None on success, otherwise the failure description
    pub error: Option<String>,
}

/// Aggregate result of translating a track.
///
/// Returned as a value so the caller decides what to surface; nothing is
/// printed from here. Failed batches' entries are excluded from `entries`,
/// and the per-batch reports say which ones and why.
#[derive(Debug)]
pub struct TranslationOutcome {
    /// Translated entries in original track order
    pub entries: Vec<SubtitleEntry>,

    /// Total entries in the input track
    pub total_entries: usize,

    /// Entries that received a translation
    pub translated_entries: usize,

    /// Entries dropped because their batch failed
    pub dropped_entries: usize,

    /// Per-batch status, in batch order
    pub batches: Vec<BatchReport>,
}

impl TranslationOutcome {
    /// Whether every entry made it through
    pub fn is_complete(&self) -> bool {
        self.dropped_entries == 0
    }

    /// Number of failed batches
    pub fn failed_batches(&self) -> usize {
        self.batches.iter().filter(|b| b.error.is_some()).count()
    }
}

/// Coordinates batch translation of a subtitle track
pub struct ChunkCoordinator {
    /// The translation provider to drive
    provider: Arc<dyn Provider>,

    /// Tuning options
    options: CoordinatorOptions,
}

impl ChunkCoordinator {
    /// Create a new coordinator
    pub fn new(provider: Arc<dyn Provider>, options: CoordinatorOptions) -> Self {
        ChunkCoordinator { provider, options }
    }

    /// Translate a whole track.
    ///
    /// Batches are dispatched concurrently up to the configured limit and
    /// reassembled by batch index afterwards, so output order never depends
    /// on completion order. A permanent authentication failure cancels
    /// dispatch of the remaining batches; in-flight batches finish. Each
    /// failed batch drops its entries from the output and is recorded in the
    /// outcome, never silently.
    ///
    /// `progress` is called with (completed, total) after each batch settles.
    pub async fn translate_track(
        &self,
        track: &SubtitleTrack,
        target_language: &str,
        progress: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> TranslationOutcome {
        let batches = track.split_into_chunks(self.options.chunk_size);
        let total_batches = batches.len();
        let total_entries = track.entries.len();

        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent_requests));
        let cancelled = Arc::new(AtomicBool::new(false));
        let completed = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(batches.into_iter().enumerate())
            .map(|(batch_index, batch)| {
                let provider = self.provider.clone();
                let options = self.options.clone();
                let semaphore = semaphore.clone();
                let cancelled = cancelled.clone();
                let completed = completed.clone();
                let progress = progress.clone();
                let target_language = target_language.to_string();

                async move {
                    // Acquire a permit; the semaphore is never closed
                    let _permit = semaphore.acquire().await.expect("semaphore closed");

                    let result = if cancelled.load(Ordering::SeqCst) {
                        Err(TranslationError::Cancelled(
                            "operation aborted after unrecoverable provider error".to_string(),
                        ))
                    } else {
                        translate_batch_with_retry(
                            provider.as_ref(),
                            &batch,
                            &target_language,
                            &options,
                        )
                        .await
                    };

                    if let Err(TranslationError::Provider(e)) = &result {
                        if matches!(e, crate::errors::ProviderError::AuthenticationError(_)) {
                            // No point dispatching further batches against a
                            // rejected key
                            cancelled.store(true, Ordering::SeqCst);
                        }
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress(done, total_batches);

                    (batch_index, batch.len(), result)
                }
            })
            .buffer_unordered(self.options.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Reassemble by batch index so output order matches track order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(idx, _, _)| *idx);

        let mut entries = Vec::with_capacity(total_entries);
        let mut batch_reports = Vec::with_capacity(total_batches);
        let mut dropped_entries = 0;

        for (batch_index, entry_count, result) in sorted_results {
            match result {
                Ok(translated) => {
                    entries.extend(translated);
                    batch_reports.push(BatchReport {
                        batch_index,
                        entry_count,
                        error: None,
                    });
                }
                Err(e) => {
                    warn!("Batch {} failed: {}", batch_index + 1, e);
                    dropped_entries += entry_count;
                    batch_reports.push(BatchReport {
                        batch_index,
                        entry_count,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        TranslationOutcome {
            translated_entries: entries.len(),
            entries,
            total_entries,
            dropped_entries,
            batches: batch_reports,
        }
    }
}

/// Translate one batch, retrying transient provider errors with exponential
/// backoff. The backoff sleeps only this task; other batches keep running.
async fn translate_batch_with_retry(
    provider: &dyn Provider,
    batch: &[SubtitleEntry],
    target_language: &str,
    options: &CoordinatorOptions,
) -> Result<Vec<SubtitleEntry>, TranslationError> {
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_text = build_chunk_text(batch);

    let mut attempt: u32 = 0;
    loop {
        match provider.translate_chunk(&chunk_text, target_language).await {
            Ok(lines) => return attach_translations(batch, lines),
            Err(e) if e.is_transient() && attempt < options.max_retries => {
                attempt += 1;
                let backoff_ms = options.backoff_base_ms * (1u64 << (attempt - 1));
                warn!(
                    "Transient provider error (attempt {}/{}), retrying in {} ms: {}",
                    attempt, options.max_retries, backoff_ms, e
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
            Err(e) => return Err(TranslationError::Provider(e)),
        }
    }
}

/// Build the flattened request text: one `"{index}: {text}"` line per entry.
///
/// The index gives context-carrying providers something to echo back, but
/// alignment stays positional; round-tripped indices are never trusted.
fn build_chunk_text(batch: &[SubtitleEntry]) -> String {
    batch
        .iter()
        .map(|entry| format!("{}: {}", entry.index, entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Zip translated lines positionally against the batch entries.
///
/// A count mismatch fails the whole batch with `AlignmentMismatch` rather
/// than truncating: updating only a prefix would silently mislabel which
/// entries were dropped, and the caller can retry a failed batch.
fn attach_translations(
    batch: &[SubtitleEntry],
    lines: Vec<String>,
) -> Result<Vec<SubtitleEntry>, TranslationError> {
    if lines.len() != batch.len() {
        return Err(TranslationError::AlignmentMismatch {
            expected: batch.len(),
            received: lines.len(),
        });
    }

    debug!("Attaching {} translated lines", lines.len());

    Ok(batch
        .iter()
        .zip(lines)
        .map(|(entry, line)| {
            SubtitleEntry::new(entry.index, entry.start, entry.end, strip_index_prefix(&line))
        })
        .collect())
}

/// Drop a leading `"{index}: "` prefix when the provider echoed it back
fn strip_index_prefix(line: &str) -> String {
    match INDEX_PREFIX_REGEX.find(line) {
        Some(m) => line[m.end()..].to_string(),
        None => line.to_string(),
    }
}
