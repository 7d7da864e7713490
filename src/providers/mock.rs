/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - translates every line deterministically
 * - `MockProvider::short_by(n)` - drops the last n lines of each response
 * - `MockProvider::rate_limited(n)` - fails the first n calls, then succeeds
 * - `MockProvider::auth_failing()` - always fails with a permanent error
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Translates every input line, preserving count and order
    Working,
    /// Returns fewer lines than requested (alignment failure)
    ShortBy(usize),
    /// Returns rate-limit errors for the first N calls, then works
    RateLimited(usize),
    /// Always fails with an authentication error (permanent)
    AuthFailing,
}

/// Mock provider for testing coordinator behavior without network access
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate_chunk calls made
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a mock with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        MockProvider {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// A mock that returns `n` fewer lines than requested
    pub fn short_by(n: usize) -> Self {
        Self::new(MockBehavior::ShortBy(n))
    }

    /// A mock that rate-limits the first `n` calls
    pub fn rate_limited(n: usize) -> Self {
        Self::new(MockBehavior::RateLimited(n))
    }

    /// A mock that always fails with a permanent auth error
    pub fn auth_failing() -> Self {
        Self::new(MockBehavior::AuthFailing)
    }

    /// Handle to the call counter
    pub fn call_count(&self) -> Arc<AtomicUsize> {
        self.call_count.clone()
    }

    /// Echoes each request line (including its "{index}: " prefix, the way
    /// real providers tend to) with a language marker appended
    fn translate_lines(&self, chunk_text: &str, target_language: &str) -> Vec<String> {
        chunk_text
            .lines()
            .map(|line| format!("{} [{}]", line, target_language))
            .collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate_chunk(
        &self,
        chunk_text: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.translate_lines(chunk_text, target_language)),
            MockBehavior::ShortBy(n) => {
                let mut lines = self.translate_lines(chunk_text, target_language);
                let keep = lines.len().saturating_sub(n);
                lines.truncate(keep);
                Ok(lines)
            }
            MockBehavior::RateLimited(n) => {
                if call < n {
                    Err(ProviderError::RateLimitExceeded(format!(
                        "mock rate limit on call {}",
                        call + 1
                    )))
                } else {
                    Ok(self.translate_lines(chunk_text, target_language))
                }
            }
            MockBehavior::AuthFailing => Err(ProviderError::AuthenticationError(
                "mock invalid API key".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
