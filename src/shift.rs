use log::debug;

use crate::errors::SubtitleError;
use crate::subtitle_processor::{SubtitleEntry, SubtitleTrack};
use crate::timecode::Timecode;

// @module: Timecode shift engine (uniform and rebase modes)

/// Apply a signed millisecond delta to every entry's start and end.
///
/// Both ends clamp at zero independently, so a large negative shift can
/// collapse early entries onto `00:00:00,000`.
pub fn shift_by_ms(track: &SubtitleTrack, delta_ms: i64) -> SubtitleTrack {
    let entries = track
        .entries
        .iter()
        .map(|entry| {
            SubtitleEntry::new(
                entry.index,
                entry.start.shift(delta_ms),
                entry.end.shift(delta_ms),
                entry.text.clone(),
            )
        })
        .collect();

    SubtitleTrack {
        source_file: track.source_file.clone(),
        entries,
        first_timing: track.first_timing.map(|tc| tc.shift(delta_ms)),
    }
}

/// Uniform shift by whole seconds, the CLI-facing unit.
pub fn shift_uniform(track: &SubtitleTrack, delta_seconds: i64) -> SubtitleTrack {
    shift_by_ms(track, delta_seconds * 1000)
}

/// Shift the whole track so its first timing line starts at `target`.
///
/// The anchor is the first timing line encountered in the raw file, which the
/// parser records even when the block around it was malformed, so it is not
/// necessarily the start of the first emitted entry. A track with no timing
/// line anywhere has no anchor and the rebase fails with
/// [`SubtitleError::NoTimingFound`] instead of shifting against garbage.
pub fn rebase_to(track: &SubtitleTrack, target: Timecode) -> Result<SubtitleTrack, SubtitleError> {
    let anchor = track.first_timing.ok_or(SubtitleError::NoTimingFound)?;
    let delta_ms = target.as_ms() as i64 - anchor.as_ms() as i64;
    debug!("Rebasing from {} to {} (delta {} ms)", anchor, target, delta_ms);
    Ok(shift_by_ms(track, delta_ms))
}
