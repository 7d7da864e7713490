use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language for translation (ISO code or language name)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation provider config
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Translation batching and resilience config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Service URL (OpenAI-compatible chat completions endpoint)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Batching and resilience configuration for translation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Entries per translation batch
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    // @field: Max concurrent batch requests
    #[serde(default = "default_concurrent_requests")]
    pub max_concurrent_requests: usize,

    // @field: Retry attempts for transient provider errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    // @field: Base backoff time in milliseconds for exponential backoff
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            chunk_size: default_chunk_size(),
            max_concurrent_requests: default_concurrent_requests(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            provider: ProviderConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration values.
    ///
    /// Translation-specific requirements (a non-empty API key) are checked at
    /// translation time, not here, so shift and merge work without one.
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }
        if self.translation.chunk_size == 0 {
            return Err(anyhow!("Chunk size must be at least 1"));
        }
        if self.translation.max_concurrent_requests == 0 {
            return Err(anyhow!("Max concurrent requests must be at least 1"));
        }
        if self.provider.endpoint.trim().is_empty() {
            return Err(anyhow!("Provider endpoint must not be empty"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Provider timeout must be at least 1 second"));
        }
        Ok(())
    }
}

fn default_target_language() -> String {
    "fa".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_chunk_size() -> usize {
    50
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}
