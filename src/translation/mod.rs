/*!
 * Translation of subtitle tracks through external providers.
 *
 * The chunk coordinator partitions a track into fixed-size batches, drives
 * the provider with bounded concurrency and retry, and reattaches translated
 * lines to the original timing and index metadata.
 */

pub mod coordinator;

pub use coordinator::{BatchReport, ChunkCoordinator, CoordinatorOptions, TranslationOutcome};
