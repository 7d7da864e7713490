/*!
 * End-to-end controller workflow tests
 */

use std::sync::Arc;

use subkit::providers::mock::MockProvider;
use subkit::{Config, Controller, SubtitleTrack};
use crate::common;

fn controller() -> Controller {
    Controller::with_config(Config::default()).unwrap()
}

/// 3 well-formed entries, 10 s uniform shift: each timing line advances by
/// exactly 00:00:10,000, text and index unchanged
#[test]
fn test_run_shift_endToEnd_shouldAdvanceTimingsOnly() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "in.srt", common::sample_srt()).unwrap();
    let output = dir.path().join("out.srt");

    let written = controller().run_shift(&input, &output, 10).unwrap();
    assert_eq!(written, 3);

    let result = SubtitleTrack::from_srt_file(&output).unwrap();
    let original = SubtitleTrack::parse_srt_string(common::sample_srt());
    for (before, after) in original.entries.iter().zip(result.entries.iter()) {
        assert_eq!(after.start.as_ms(), before.start.as_ms() + 10_000);
        assert_eq!(after.end.as_ms(), before.end.as_ms() + 10_000);
        assert_eq!(after.index, before.index);
        assert_eq!(after.text, before.text);
    }
}

#[test]
fn test_run_rebase_endToEnd_shouldAnchorFirstTiming() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "in.srt", common::sample_srt()).unwrap();
    let output = dir.path().join("out.srt");

    // Milliseconds omitted on purpose: they default to 0
    controller().run_rebase(&input, &output, "00:01:20").unwrap();

    let result = SubtitleTrack::from_srt_file(&output).unwrap();
    assert_eq!(result.entries[0].start.to_string(), "00:01:20,000");
    // Original first start was 00:00:01,000, so the delta is +79 s
    assert_eq!(result.entries[2].start.to_string(), "00:01:29,000");
}

#[test]
fn test_run_shift_withMissingInput_shouldFailWithoutOutput() {
    let dir = common::create_temp_dir().unwrap();
    let input = dir.path().join("absent.srt");
    let output = dir.path().join("out.srt");

    let result = controller().run_shift(&input, &output, 5);
    assert!(result.unwrap_err().to_string().contains("not found"));
    assert!(!output.exists());
}

#[test]
fn test_run_rebase_withInputLackingTimings_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "in.srt", "no srt content here\n").unwrap();
    let output = dir.path().join("out.srt");

    let result = controller().run_rebase(&input, &output, "00:00:10");
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_run_merge_endToEnd_shouldCombineFilesAndReportMismatch() {
    let dir = common::create_temp_dir().unwrap();
    let timing = common::create_test_file(dir.path(), "timing.srt", &common::numbered_srt(5)).unwrap();
    let text_content = common::numbered_srt(3).replace("Line number", "Translated line");
    let text = common::create_test_file(dir.path(), "text.srt", &text_content).unwrap();
    let output = dir.path().join("merged.srt");

    let report = controller().run_merge(&timing, &text, &output).unwrap();
    assert_eq!(report.timing_entries, 5);
    assert_eq!(report.text_entries, 3);
    assert!(report.length_mismatch());

    let merged = SubtitleTrack::from_srt_file(&output).unwrap();
    assert_eq!(merged.entries.len(), 3);
    assert_eq!(merged.entries[0].text, "Translated line 1");
}

#[test]
fn test_run_translate_endToEnd_withMockProvider_shouldWriteTranslatedFile() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "in.srt", common::sample_srt()).unwrap();
    let output = dir.path().join("out.fa.srt");

    let provider = Arc::new(MockProvider::working());
    let outcome = tokio_test::block_on(async {
        controller()
            .run_translate_with_provider(provider, &input, &output, Some("fa"), Some(2))
            .await
    })
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.total_entries, 3);
    assert_eq!(outcome.batches.len(), 2);

    let translated = SubtitleTrack::from_srt_file(&output).unwrap();
    assert_eq!(translated.entries.len(), 3);
    // "fa" resolves to the language name in the prompt and the mock echoes it
    assert_eq!(translated.entries[0].text, "This is a test subtitle. [Persian]");
    // Timing survives untouched
    assert_eq!(translated.entries[0].start.to_string(), "00:00:01,000");
}

#[tokio::test]
async fn test_run_translate_withFailingProvider_shouldStillWriteAndReport() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "in.srt", common::sample_srt()).unwrap();
    let output = dir.path().join("out.srt");

    let provider = Arc::new(MockProvider::auth_failing());
    let outcome = controller()
        .run_translate_with_provider(provider, &input, &output, Some("fa"), Some(50))
        .await
        .unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(outcome.dropped_entries, 3);
    assert_eq!(outcome.failed_batches(), 1);

    // The output file exists but is empty of entries; the report is the
    // caller's signal, not a silent hole
    let written = SubtitleTrack::from_srt_file(&output).unwrap();
    assert!(written.entries.is_empty());
}

#[tokio::test]
async fn test_run_translate_withoutApiKey_shouldFailBeforeAnyRequest() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "in.srt", common::sample_srt()).unwrap();
    let output = dir.path().join("out.srt");

    let result = controller().run_translate(&input, &output, None, None).await;
    assert!(result.is_err());
    assert!(!output.exists());
}
