use log::warn;

use crate::subtitle_processor::{SubtitleEntry, SubtitleTrack};

// @module: Merge engine: timing from one track, text from another

/// Outcome of a merge, returned alongside the merged track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Entry count of the timing source
    pub timing_entries: usize,

    /// Entry count of the text source
    pub text_entries: usize,

    /// Entries in the merged output, the minimum of the two counts
    pub merged_entries: usize,
}

impl MergeReport {
    /// Whether the two sources had different lengths
    pub fn length_mismatch(&self) -> bool {
        self.timing_entries != self.text_entries
    }
}

/// Recombine two independently parsed tracks by entry position: entry `i` of
/// the output takes index and timing from `timing_source[i]` and text from
/// `text_source[i]`.
///
/// A length mismatch is a warning, not an error: only the first
/// `min(len, len)` entries are merged and the rest are dropped from the
/// output. The report names both counts so the caller can surface it.
pub fn merge_tracks(timing_source: &SubtitleTrack, text_source: &SubtitleTrack) -> (SubtitleTrack, MergeReport) {
    let report = MergeReport {
        timing_entries: timing_source.entries.len(),
        text_entries: text_source.entries.len(),
        merged_entries: timing_source.entries.len().min(text_source.entries.len()),
    };

    if report.length_mismatch() {
        warn!(
            "Dialogue counts do not match: timing file has {}, text file has {}. Proceeding with minimum count.",
            report.timing_entries, report.text_entries
        );
    }

    let entries = timing_source
        .entries
        .iter()
        .zip(text_source.entries.iter())
        .map(|(timing, text)| {
            SubtitleEntry::new(timing.index, timing.start, timing.end, text.text.clone())
        })
        .collect();

    let merged = SubtitleTrack {
        source_file: timing_source.source_file.clone(),
        entries,
        first_timing: timing_source.first_timing,
    };

    (merged, report)
}
