use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::merge::{self, MergeReport};
use crate::providers::Provider;
use crate::providers::openai::OpenAI;
use crate::shift;
use crate::subtitle_processor::SubtitleTrack;
use crate::timecode::Timecode;
use crate::translation::{ChunkCoordinator, CoordinatorOptions, TranslationOutcome};

// @module: Application controller, one entry point per CLI operation

/// Main application controller for subtitle operations
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Shift every timecode in a file by a signed number of seconds.
    ///
    /// Returns the number of entries written.
    pub fn run_shift(&self, input: &Path, output: &Path, delta_seconds: i64) -> Result<usize> {
        require_input_file(input)?;
        let track = SubtitleTrack::from_srt_file(input)?;
        let shifted = shift::shift_uniform(&track, delta_seconds);
        shifted.write_to_srt(output)?;

        info!(
            "Shifted {} entries by {} s: {:?}",
            shifted.entries.len(),
            delta_seconds,
            output
        );
        Ok(shifted.entries.len())
    }

    /// Rebase a file so its first timing line starts at `new_start`.
    ///
    /// `new_start` accepts `HH:MM:SS,mmm` or `HH:MM:SS` (milliseconds
    /// default to 0). Returns the number of entries written.
    pub fn run_rebase(&self, input: &Path, output: &Path, new_start: &str) -> Result<usize> {
        let target = Timecode::parse_lenient(new_start)
            .with_context(|| format!("Invalid new start timecode: {}", new_start))?;

        require_input_file(input)?;
        let track = SubtitleTrack::from_srt_file(input)?;
        let rebased = shift::rebase_to(&track, target)
            .with_context(|| format!("Cannot rebase {:?}", input))?;
        rebased.write_to_srt(output)?;

        info!(
            "Rebased {} entries to start at {}: {:?}",
            rebased.entries.len(),
            target,
            output
        );
        Ok(rebased.entries.len())
    }

    /// Merge timing from one file with text from another.
    pub fn run_merge(&self, timing_file: &Path, text_file: &Path, output: &Path) -> Result<MergeReport> {
        info!("Merging timing from {:?} with text from {:?}", timing_file, text_file);

        require_input_file(timing_file)?;
        require_input_file(text_file)?;
        let timing_track = SubtitleTrack::from_srt_file(timing_file)?;
        let text_track = SubtitleTrack::from_srt_file(text_file)?;

        let (merged, report) = merge::merge_tracks(&timing_track, &text_track);
        merged.write_to_srt(output)?;

        info!("Merged {} entries: {:?}", report.merged_entries, output);
        Ok(report)
    }

    /// Translate a file using the configured provider.
    pub async fn run_translate(
        &self,
        input: &Path,
        output: &Path,
        target_language: Option<&str>,
        chunk_size: Option<usize>,
    ) -> Result<TranslationOutcome> {
        if self.config.provider.api_key.trim().is_empty() {
            return Err(anyhow!(
                "No API key configured. Set provider.api_key in the config file."
            ));
        }

        let provider = Arc::new(OpenAI::new(
            &self.config.provider.endpoint,
            &self.config.provider.api_key,
            &self.config.provider.model,
            self.config.provider.timeout_secs,
        )?);

        self.run_translate_with_provider(provider, input, output, target_language, chunk_size)
            .await
    }

    /// Translate a file using an explicit provider.
    ///
    /// Split out from [`Controller::run_translate`] so tests can drive the
    /// whole pipeline with a mock provider.
    pub async fn run_translate_with_provider(
        &self,
        provider: Arc<dyn Provider>,
        input: &Path,
        output: &Path,
        target_language: Option<&str>,
        chunk_size: Option<usize>,
    ) -> Result<TranslationOutcome> {
        let tag = target_language.unwrap_or(&self.config.target_language);
        let language_name = language_utils::resolve_language_name(tag);
        if !language_utils::is_iso_code(tag) {
            debug!("Target language {:?} is not an ISO 639 code, passing it through verbatim", tag);
        }

        let options = CoordinatorOptions {
            chunk_size: chunk_size.unwrap_or(self.config.translation.chunk_size),
            max_concurrent_requests: self.config.translation.max_concurrent_requests,
            max_retries: self.config.translation.max_retries,
            backoff_base_ms: self.config.translation.backoff_base_ms,
        };

        if options.chunk_size == 0 {
            return Err(anyhow!("Chunk size must be at least 1"));
        }

        require_input_file(input)?;
        let track = SubtitleTrack::from_srt_file(input)?;
        let total_batches = track.entries.len().div_ceil(options.chunk_size);

        info!(
            "Translating {} entries to {} via {} ({} batches of up to {})",
            track.entries.len(),
            language_name,
            provider.name(),
            total_batches,
            options.chunk_size
        );

        let progress_bar = ProgressBar::new(total_batches as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);

        let pb = progress_bar.clone();
        let coordinator = ChunkCoordinator::new(provider, options);
        let outcome = coordinator
            .translate_track(&track, &language_name, move |done, _total| {
                pb.set_position(done as u64);
            })
            .await;

        progress_bar.finish_and_clear();

        let translated = SubtitleTrack {
            source_file: track.source_file.clone(),
            entries: outcome.entries.clone(),
            first_timing: track.first_timing,
        };
        translated.write_to_srt(output)?;

        self.report_outcome(&outcome, output);
        Ok(outcome)
    }

    /// Log the final translation report: totals, drops and failed batches.
    fn report_outcome(&self, outcome: &TranslationOutcome, output: &Path) {
        info!(
            "Translation finished: {}/{} entries translated, {} dropped, {}/{} batches failed",
            outcome.translated_entries,
            outcome.total_entries,
            outcome.dropped_entries,
            outcome.failed_batches(),
            outcome.batches.len()
        );

        for batch in &outcome.batches {
            if let Some(error) = &batch.error {
                warn!(
                    "Batch {} ({} entries) failed: {}",
                    batch.batch_index + 1,
                    batch.entry_count,
                    error
                );
            }
        }

        if outcome.is_complete() {
            info!("Output written to {:?}", output);
        } else {
            warn!(
                "Output written to {:?} with {} entries missing",
                output, outcome.dropped_entries
            );
        }
    }
}

fn require_input_file(path: &Path) -> Result<()> {
    if !FileManager::file_exists(path) {
        return Err(anyhow!("Input file not found: {:?}", path));
    }
    Ok(())
}
