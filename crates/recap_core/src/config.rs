//! Layered configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`recap.toml` shipped with this crate)
//! 2. `~/.config/recap/recap.toml`
//! 3. `./recap.toml`
//! 4. `RECAP_<SECTION>__<KEY>` environment variables

use config::{Config, Environment, File, FileFormat};
use recap_error::{ConfigError, RecapError, RecapResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../recap.toml");

/// Completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens per completion
    pub max_tokens: u32,
    /// Per-attempt HTTP timeout
    pub request_timeout_secs: u64,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    /// Optional client-side request ceiling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 1024,
            request_timeout_secs: 60,
            api_key_env: "RECAP_API_KEY".to_string(),
            requests_per_minute: None,
        }
    }
}

impl CompletionConfig {
    /// Per-attempt HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Transport retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per completion client invocation
    pub max_retries: u32,
    /// Delay before the second attempt
    pub base_delay_ms: u64,
    /// Growth factor between attempts
    pub multiplier: f64,
    /// Upper bound on the computed delay, before jitter
    pub max_delay_ms: u64,
    /// Jitter as a fraction of the computed delay
    pub jitter_fraction: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            multiplier: 2.0,
            max_delay_ms: 60_000,
            jitter_fraction: 0.1,
        }
    }
}

/// Output quality gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Minimum trimmed length in characters
    pub min_chars: usize,
    /// Generations judged before giving up
    pub max_attempts: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_chars: 50,
            max_attempts: 2,
        }
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Prompt version tag written with every summary
    pub prompt_version: String,
    /// Whole-invocation deadline, `0` disables it
    pub timeout_secs: u64,
    /// Characters of transcript copied into audit events
    pub audit_sample_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prompt_version: "meeting-summary-v1".to_string(),
            timeout_secs: 300,
            audit_sample_chars: 200,
        }
    }
}

impl PipelineConfig {
    /// Whole-invocation deadline, if enabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Trusted header carrying the requester identity
    pub identity_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            identity_header: "x-requester-id".to_string(),
        }
    }
}

/// Which store backs the resource directory and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps, lost on exit
    #[default]
    Memory,
    /// PostgreSQL through diesel
    Postgres,
}

/// Durable store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Storage backend
    pub backend: StorageBackend,
    /// Environment variable holding the connection URL
    pub url_env: String,
    /// Maximum pooled connections
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            url_env: "DATABASE_URL".to_string(),
            pool_size: 8,
        }
    }
}

impl DatabaseConfig {
    /// Read the connection URL from the configured environment variable.
    pub fn url(&self) -> RecapResult<String> {
        std::env::var(&self.url_env).map_err(|_| {
            RecapError::from(ConfigError::new(format!(
                "Environment variable {} is not set",
                self.url_env
            )))
        })
    }
}

/// Top-level Recap configuration.
///
/// # Example
///
/// ```no_run
/// use recap_core::RecapConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RecapConfig::load()?;
/// println!("Transport budget: {}", config.retry.max_retries);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecapConfig {
    /// Completion endpoint
    pub completion: CompletionConfig,
    /// Transport retry policy
    pub retry: RetryConfig,
    /// Output quality gate
    pub quality: QualityConfig,
    /// Orchestrator settings
    pub pipeline: PipelineConfig,
    /// HTTP server
    pub server: ServerConfig,
    /// Durable store
    pub database: DatabaseConfig,
}

impl RecapConfig {
    /// Load configuration from every source, then validate it.
    ///
    /// Missing override files are skipped silently.
    #[instrument]
    pub fn load() -> RecapResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/recap/recap.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("recap").required(false))
            .add_source(
                Environment::with_prefix("RECAP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Bundled defaults overlaid with one specific file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RecapResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));

        Self::finish(builder)
    }

    /// Bundled defaults overlaid with TOML text.
    pub fn from_toml_str(overrides: &str) -> RecapResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> RecapResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                RecapError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                RecapError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first bad key.
    pub fn validate(&self) -> RecapResult<()> {
        let fail = |message: String| Err(RecapError::from(ConfigError::new(message)));

        if self.retry.max_retries == 0 {
            return fail("retry.max_retries must be at least 1".to_string());
        }
        if self.retry.multiplier < 1.0 || !self.retry.multiplier.is_finite() {
            return fail(format!(
                "retry.multiplier must be at least 1.0, got {}",
                self.retry.multiplier
            ));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter_fraction) {
            return fail(format!(
                "retry.jitter_fraction must be in [0.0, 1.0], got {}",
                self.retry.jitter_fraction
            ));
        }
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return fail(format!(
                "retry.max_delay_ms ({}) is below retry.base_delay_ms ({})",
                self.retry.max_delay_ms, self.retry.base_delay_ms
            ));
        }
        if self.quality.max_attempts == 0 {
            return fail("quality.max_attempts must be at least 1".to_string());
        }
        if self.completion.request_timeout_secs == 0 {
            return fail("completion.request_timeout_secs must be at least 1".to_string());
        }
        if self.completion.requests_per_minute == Some(0) {
            return fail("completion.requests_per_minute must be at least 1 when set".to_string());
        }
        if self.completion.model.trim().is_empty() {
            return fail("completion.model must not be empty".to_string());
        }
        if self.pipeline.prompt_version.trim().is_empty() {
            return fail("pipeline.prompt_version must not be empty".to_string());
        }
        if self.server.identity_header.trim().is_empty() {
            return fail("server.identity_header must not be empty".to_string());
        }
        if self.database.pool_size == 0 {
            return fail("database.pool_size must be at least 1".to_string());
        }
        Ok(())
    }
}
