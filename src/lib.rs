/*!
 * # subkit - SRT subtitle toolkit
 *
 * A Rust library for manipulating SubRip (SRT) subtitle files and producing
 * translated subtitle tracks through external providers.
 *
 * ## Features
 *
 * - Lenient SRT parsing that survives hand-edited files
 * - Uniform timecode shifting and rebasing to a new start time
 * - Merging timing from one track with text from another
 * - Chunked AI translation with bounded concurrency, retry with backoff,
 *   and strict positional alignment checking
 * - Atomic output writes (temp file + rename)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timecode`: Timecode value type and arithmetic
 * - `subtitle_processor`: SRT dialogue model, parser and serializer
 * - `shift`: Uniform and rebase shift engines
 * - `merge`: Positional track merging
 * - `translation`: Chunk coordinator for batch translation
 * - `providers`: Translation provider clients (OpenAI-compatible, mock)
 * - `language_utils`: ISO language tag resolution
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod merge;
pub mod providers;
pub mod shift;
pub mod subtitle_processor;
pub mod timecode;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
pub use subtitle_processor::{SubtitleEntry, SubtitleTrack};
pub use timecode::Timecode;
pub use translation::{ChunkCoordinator, CoordinatorOptions, TranslationOutcome};
