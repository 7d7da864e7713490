use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;

// @module: SRT timecode value type and arithmetic

// @const: Strict `HH:MM:SS,mmm` pattern
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

// @const: Lenient variant with optional milliseconds
static LENIENT_TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})(?:,(\d{3}))?$").unwrap()
});

/// A point in playback time, stored as milliseconds since track start.
///
/// The canonical text form is `HH:MM:SS,mmm` with fixed 2-2-2-3 digit widths.
/// Values are never negative: [`Timecode::shift`] clamps at zero, which means
/// distinct negative shifts can collapse to the same zero value. That is the
/// documented behavior, not an oversight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timecode(u64);

impl Timecode {
    /// Create a timecode from milliseconds
    pub const fn from_ms(ms: u64) -> Self {
        Timecode(ms)
    }

    /// Milliseconds since track start
    pub const fn as_ms(&self) -> u64 {
        self.0
    }

    /// Parse the canonical `HH:MM:SS,mmm` form.
    ///
    /// Anything else, including a missing milliseconds field, is rejected with
    /// [`SubtitleError::MalformedTimecode`].
    pub fn parse(text: &str) -> Result<Self, SubtitleError> {
        let caps = TIMECODE_REGEX
            .captures(text.trim())
            .ok_or_else(|| SubtitleError::MalformedTimecode(text.to_string()))?;
        Self::from_captures(&caps, text)
    }

    /// Parse a timecode, defaulting milliseconds to 0 when omitted.
    ///
    /// Used for user-supplied rebase targets, where `HH:MM:SS` is a common
    /// shorthand. File content always goes through the strict [`Timecode::parse`].
    pub fn parse_lenient(text: &str) -> Result<Self, SubtitleError> {
        let caps = LENIENT_TIMECODE_REGEX
            .captures(text.trim())
            .ok_or_else(|| SubtitleError::MalformedTimecode(text.to_string()))?;
        Self::from_captures(&caps, text)
    }

    fn from_captures(caps: &regex::Captures, original: &str) -> Result<Self, SubtitleError> {
        let field = |idx: usize| -> Result<u64, SubtitleError> {
            match caps.get(idx) {
                Some(m) => m
                    .as_str()
                    .parse::<u64>()
                    .map_err(|_| SubtitleError::MalformedTimecode(original.to_string())),
                None => Ok(0),
            }
        };

        let hours = field(1)?;
        let minutes = field(2)?;
        let seconds = field(3)?;
        let millis = field(4)?;

        Ok(Timecode((hours * 3600 + minutes * 60 + seconds) * 1000 + millis))
    }

    /// Shift by a signed millisecond delta, clamping at zero.
    pub fn shift(&self, delta_ms: i64) -> Self {
        let shifted = self.0 as i64 + delta_ms;
        Timecode(shifted.max(0) as u64)
    }

    /// Shift so that `anchor_old` would land on `anchor_new`.
    pub fn rebase(&self, anchor_old: Timecode, anchor_new: Timecode) -> Self {
        self.shift(anchor_new.0 as i64 - anchor_old.0 as i64)
    }
}

impl fmt::Display for Timecode {
    /// Formats as `HH:MM:SS,mmm`. The hours field is zero-padded to 2 digits
    /// and widens naturally past 99 hours; there is no overflow guard.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let hours = self.0 / 3_600_000;
        let minutes = (self.0 % 3_600_000) / 60_000;
        let seconds = (self.0 % 60_000) / 1_000;
        let millis = self.0 % 1_000;
        write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}
