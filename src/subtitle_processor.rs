use std::fmt;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::file_utils::FileManager;
use crate::timecode::Timecode;

// @module: SRT dialogue model, parser and serializer

// @const: SRT timing line pattern
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2},\d{3}) --> (\d{2}:\d{2}:\d{2},\d{3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Display index, conventionally sequential from 1 but never
    // reassigned by this crate
    pub index: usize,

    // @field: Start time
    pub start: Timecode,

    // @field: End time
    pub end: Timecode,

    // @field: Subtitle text, flattened to a single line at parse time
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(index: usize, start: Timecode, end: Timecode, text: String) -> Self {
        SubtitleEntry { index, start, end, text }
    }
}

impl fmt::Display for SubtitleEntry {
    /// Renders the canonical SRT block: index line, timing line, one text
    /// line, blank separator. Text is written verbatim, no escaping.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered collection of subtitle entries in original parse order.
///
/// The order is whatever the file had; entries are never sorted by time and
/// indices are never renumbered, so a hand-edited file round-trips with its
/// quirks intact.
#[derive(Debug, Clone)]
pub struct SubtitleTrack {
    /// Source filename, empty for tracks parsed from a string
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,

    /// Start of the first timing line encountered anywhere in the raw input,
    /// recorded even when the surrounding block was malformed and dropped.
    /// This is the rebase anchor.
    pub first_timing: Option<Timecode>,
}

impl SubtitleTrack {
    /// Create an empty track
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleTrack {
            source_file,
            entries: Vec::new(),
            first_timing: None,
        }
    }

    /// Read and parse an SRT file
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {:?}", path))?;
        let mut track = Self::parse_srt_string(&content);
        track.source_file = path.to_path_buf();
        Ok(track)
    }

    /// Parse SRT content into a track.
    ///
    /// The parser is a three-slot state machine (pending index, pending
    /// timing, pending text) and is deliberately lenient: a block missing any
    /// of the three parts is dropped without an error when the next blank
    /// line arrives. Hand-edited files are full of stray digit lines and
    /// half-deleted blocks, and refusing the whole file over one of them
    /// helps nobody. LF and CRLF line endings are both accepted.
    ///
    /// Multi-line text is flattened: interior lines are trimmed and joined
    /// with single spaces. Every downstream operation sees flat text, and the
    /// serializer writes one text line per entry. This is a lossy transform
    /// callers must be aware of.
    pub fn parse_srt_string(content: &str) -> Self {
        let mut track = SubtitleTrack::new(PathBuf::new());

        let mut pending_index: Option<usize> = None;
        let mut pending_timing: Option<(Timecode, Timecode)> = None;
        let mut pending_text: Vec<&str> = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
                // Index marker. Overwrites any previous pending index, which
                // tolerates duplicate or stray digit lines before a real block.
                pending_index = trimmed.parse::<usize>().ok();
            } else if let Some(caps) = TIMING_REGEX.captures(trimmed) {
                let start = caps.get(1).and_then(|m| Timecode::parse(m.as_str()).ok());
                let end = caps.get(2).and_then(|m| Timecode::parse(m.as_str()).ok());
                if let (Some(start), Some(end)) = (start, end) {
                    if track.first_timing.is_none() {
                        track.first_timing = Some(start);
                    }
                    pending_timing = Some((start, end));
                }
            } else if !trimmed.is_empty() {
                pending_text.push(trimmed);
            } else {
                // Blank line: emit only when index, timing and text are all
                // present. A partial block keeps its slots and may still be
                // completed by later lines; whatever is left over at the next
                // complete block boundary is silently dropped.
                if let (Some(index), Some((start, end))) = (pending_index, pending_timing) {
                    if !pending_text.is_empty() {
                        track.entries.push(SubtitleEntry::new(
                            index,
                            start,
                            end,
                            pending_text.join(" "),
                        ));
                        pending_index = None;
                        pending_timing = None;
                        pending_text.clear();
                    }
                }
            }
        }

        // Final block when the file lacks a trailing blank line
        if let (Some(index), Some((start, end))) = (pending_index, pending_timing) {
            if !pending_text.is_empty() {
                track
                    .entries
                    .push(SubtitleEntry::new(index, start, end, pending_text.join(" ")));
            }
        }

        debug!("Parsed {} subtitle entries", track.entries.len());
        track
    }

    /// Render the whole track to SRT text
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            // Display on SubtitleEntry cannot fail when writing to a String
            use std::fmt::Write;
            let _ = write!(out, "{}", entry);
        }
        out
    }

    /// Write the track to an SRT file.
    ///
    /// The content goes to a temporary file in the destination directory
    /// first and is renamed over the target on success, so a failure mid-way
    /// never leaves a half-written subtitle file behind.
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_atomic(path, &self.to_srt_string())
            .with_context(|| format!("Failed to write subtitle file: {:?}", path))
    }

    /// Partition entries into contiguous fixed-size chunks, preserving order.
    ///
    /// The last chunk may be shorter. A chunk size of zero is treated as 1.
    pub fn split_into_chunks(&self, chunk_size: usize) -> Vec<Vec<SubtitleEntry>> {
        self.entries
            .chunks(chunk_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Track")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
