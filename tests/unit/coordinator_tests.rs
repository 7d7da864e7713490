/*!
 * Tests for the translation chunk coordinator
 */

use std::sync::Arc;
use std::sync::atomic::Ordering;

use subkit::SubtitleTrack;
use subkit::providers::mock::MockProvider;
use subkit::translation::{ChunkCoordinator, CoordinatorOptions};
use crate::common;

fn fast_options(chunk_size: usize) -> CoordinatorOptions {
    CoordinatorOptions {
        chunk_size,
        max_concurrent_requests: 2,
        max_retries: 3,
        // Keep retry tests fast
        backoff_base_ms: 1,
    }
}

#[tokio::test]
async fn test_translate_track_withWorkingProvider_shouldTranslateEverything() {
    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(7));
    let provider = Arc::new(MockProvider::working());
    let coordinator = ChunkCoordinator::new(provider, fast_options(3));

    let outcome = coordinator.translate_track(&track, "Persian", |_, _| {}).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.total_entries, 7);
    assert_eq!(outcome.translated_entries, 7);
    assert_eq!(outcome.dropped_entries, 0);
    assert_eq!(outcome.batches.len(), 3);
    assert_eq!(outcome.failed_batches(), 0);

    // Timing and index kept, text replaced, original order preserved
    for (original, translated) in track.entries.iter().zip(outcome.entries.iter()) {
        assert_eq!(original.index, translated.index);
        assert_eq!(original.start, translated.start);
        assert_eq!(original.end, translated.end);
        assert_ne!(original.text, translated.text);
        assert!(translated.text.contains(&original.text));
    }
}

/// The request hands the provider a "{index}: {text}" line per entry, and the
/// coordinator strips an echoed index prefix when reattaching
#[tokio::test]
async fn test_translate_track_shouldStripEchoedIndexPrefix() {
    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(2));
    let provider = Arc::new(MockProvider::working());
    let coordinator = ChunkCoordinator::new(provider, fast_options(50));

    let outcome = coordinator.translate_track(&track, "fa", |_, _| {}).await;

    // The mock echoes the request line "1: Line number 1" with a marker;
    // the coordinator strips the echoed "1: " prefix on reattachment
    assert_eq!(outcome.entries[0].text, "Line number 1 [fa]");
    assert_eq!(outcome.entries[1].text, "Line number 2 [fa]");
}

/// Batch of 3 entries with 2 returned lines fails whole with AlignmentMismatch
#[tokio::test]
async fn test_translate_track_withShortResponse_shouldFailBatchWithAlignmentMismatch() {
    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(3));
    let provider = Arc::new(MockProvider::short_by(1));
    let coordinator = ChunkCoordinator::new(provider, fast_options(3));

    let outcome = coordinator.translate_track(&track, "fa", |_, _| {}).await;

    assert!(!outcome.is_complete());
    assert_eq!(outcome.translated_entries, 0);
    assert_eq!(outcome.dropped_entries, 3);
    assert_eq!(outcome.failed_batches(), 1);
    let error = outcome.batches[0].error.as_deref().unwrap();
    assert!(error.contains("expected 3"), "unexpected error: {}", error);
    assert!(error.contains("received 2"), "unexpected error: {}", error);
}

/// A failed batch drops only its own entries; surrounding batches survive
#[tokio::test]
async fn test_translate_track_withOneBadBatch_shouldKeepOtherBatches() {
    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(6));
    // Fails the first call; with no retry budget that sinks the first batch only
    let provider = Arc::new(MockProvider::rate_limited(1));
    let mut options = fast_options(2);
    options.max_retries = 0;
    options.max_concurrent_requests = 1;
    let coordinator = ChunkCoordinator::new(provider, options);

    let outcome = coordinator.translate_track(&track, "fa", |_, _| {}).await;

    assert!(!outcome.is_complete());
    assert_eq!(outcome.translated_entries, 4);
    assert_eq!(outcome.dropped_entries, 2);
    assert_eq!(outcome.failed_batches(), 1);
    assert!(outcome.batches[0].error.is_some());
    assert!(outcome.batches[1].error.is_none());
    // Output holds the surviving batches' entries in track order
    assert_eq!(outcome.entries[0].index, 3);
    assert_eq!(outcome.entries.last().unwrap().index, 6);
}

/// Transient errors are retried with backoff until they succeed
#[tokio::test]
async fn test_translate_track_withRateLimit_shouldRetryAndSucceed() {
    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(2));
    let provider = Arc::new(MockProvider::rate_limited(2));
    let calls = provider.call_count();
    let mut options = fast_options(50);
    options.max_concurrent_requests = 1;
    let coordinator = ChunkCoordinator::new(provider, options);

    let outcome = coordinator.translate_track(&track, "fa", |_, _| {}).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.translated_entries, 2);
    // Two rate-limited attempts plus the successful one
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

/// Transient failures beyond the retry budget fail the batch
#[tokio::test]
async fn test_translate_track_withPersistentRateLimit_shouldExhaustRetries() {
    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(1));
    let provider = Arc::new(MockProvider::rate_limited(100));
    let calls = provider.call_count();
    let coordinator = ChunkCoordinator::new(provider, fast_options(50));

    let outcome = coordinator.translate_track(&track, "fa", |_, _| {}).await;

    assert_eq!(outcome.failed_batches(), 1);
    assert_eq!(outcome.dropped_entries, 1);
    // Initial attempt plus max_retries
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

/// A permanent auth failure is not retried and cancels remaining batches
#[tokio::test]
async fn test_translate_track_withAuthFailure_shouldAbandonWithoutRetryAndCancelRest() {
    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(6));
    let provider = Arc::new(MockProvider::auth_failing());
    let calls = provider.call_count();
    let mut options = fast_options(2);
    // Sequential dispatch makes the cancellation point deterministic
    options.max_concurrent_requests = 1;
    let coordinator = ChunkCoordinator::new(provider, options);

    let outcome = coordinator.translate_track(&track, "fa", |_, _| {}).await;

    assert_eq!(outcome.failed_batches(), 3);
    assert_eq!(outcome.dropped_entries, 6);
    assert_eq!(outcome.translated_entries, 0);
    // Only the first batch reached the provider; the rest were cancelled
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Progress callback sees every batch settle
#[tokio::test]
async fn test_translate_track_shouldReportProgressPerBatch() {
    use std::sync::Mutex;

    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(5));
    let provider = Arc::new(MockProvider::working());
    let coordinator = ChunkCoordinator::new(provider, fast_options(2));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let outcome = coordinator
        .translate_track(&track, "fa", move |done, total| {
            seen_clone.lock().unwrap().push((done, total));
        })
        .await;

    assert!(outcome.is_complete());
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.contains(&(3, 3)));
}

/// Chunk size 1 is the line-by-line mode, same code path
#[tokio::test]
async fn test_translate_track_withChunkSizeOne_shouldTranslatePerLine() {
    let track = SubtitleTrack::parse_srt_string(&common::numbered_srt(3));
    let provider = Arc::new(MockProvider::working());
    let calls = provider.call_count();
    let coordinator = ChunkCoordinator::new(provider, fast_options(1));

    let outcome = coordinator.translate_track(&track, "fa", |_, _| {}).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.batches.len(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
