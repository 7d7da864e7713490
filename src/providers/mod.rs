/*!
 * Provider implementations for translation services.
 *
 * This module contains the collaborator surface the chunk coordinator talks
 * to, plus client implementations:
 * - OpenAI: OpenAI-compatible chat completions API
 * - Mock: deterministic provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably by the chunk coordinator.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate one batch request.
    ///
    /// # Arguments
    /// * `chunk_text` - One `"{index}: {text}"` line per entry
    /// * `target_language` - Human-readable target language name
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - One translated line per input
    ///   line, in order, or an error classified transient/permanent via
    ///   [`ProviderError::is_transient`]
    async fn translate_chunk(
        &self,
        chunk_text: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Short provider name for logs and reports
    fn name(&self) -> &str;
}

pub mod mock;
pub mod openai;
