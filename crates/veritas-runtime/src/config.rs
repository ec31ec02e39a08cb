//! Runtime configuration.
//!
//! Configuration is read once at startup, validated, and then passed by
//! reference into every source and provider constructor. Every field has a
//! default, so an empty YAML document is a valid configuration.
//!
//! ```yaml
//! input:
//!   max_chars: 1000
//! search:
//!   timeout: 5s
//!   google:
//!     num_results: 3
//!     max_attempts: 3
//!     backoff: 1s
//!   newsapi:
//!     language: ka
//! llm:
//!   provider: groq
//!   model: llama3-70b-8192
//!   temperature: 0.2
//!   max_tokens: 1500
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while assembling the runtime at startup.
///
/// Every variant is fatal: a process that hits one of these must not
/// start serving checks.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing API keys: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    #[error("Unknown LLM provider '{name}'. Available: {available:?}")]
    UnknownProvider {
        name: String,
        available: Vec<String>,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VeritasConfig {
    /// Limits on submitted text
    pub input: InputConfig,

    /// Evidence providers
    pub search: SearchConfig,

    /// Verdict model
    pub llm: LlmConfig,
}

impl VeritasConfig {
    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document is not a mapping
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Render the effective configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check value ranges and endpoint shapes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.max_chars == 0 {
            return Err(invalid("input.max_chars must be greater than 0"));
        }

        validate_endpoint("search.google.endpoint", &self.search.google.endpoint)?;
        validate_endpoint("search.newsapi.endpoint", &self.search.newsapi.endpoint)?;
        validate_endpoint("search.gnews.endpoint", &self.search.gnews.endpoint)?;

        if !(1..=GOOGLE_MAX_NUM).contains(&self.search.google.num_results) {
            return Err(invalid("search.google.num_results must be between 1 and 10"));
        }
        if self.search.google.max_attempts == 0 {
            return Err(invalid("search.google.max_attempts must be at least 1"));
        }
        if self.search.newsapi.page_size == 0 {
            return Err(invalid("search.newsapi.page_size must be greater than 0"));
        }
        if self.search.gnews.max_results == 0 {
            return Err(invalid("search.gnews.max_results must be greater than 0"));
        }
        if self.search.timeout.is_zero() {
            return Err(invalid("search.timeout must be greater than 0"));
        }

        if let Some(url) = &self.llm.base_url {
            validate_endpoint("llm.base_url", url)?;
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(invalid("llm.temperature must be between 0.0 and 2.0"));
        }
        if self.llm.max_tokens == 0 {
            return Err(invalid("llm.max_tokens must be greater than 0"));
        }
        if self.llm.timeout.is_zero() {
            return Err(invalid("llm.timeout must be greater than 0"));
        }

        Ok(())
    }
}

/// Custom Search rejects `num` above this with a 400.
const GOOGLE_MAX_NUM: u32 = 10;

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}

fn validate_endpoint(field: &str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "{} must start with http:// or https:// (got '{}')",
            field, url
        )));
    }
    Ok(())
}

/// Limits on submitted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum characters accepted for one check
    pub max_chars: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_chars: veritas_core::DEFAULT_MAX_CHARS,
        }
    }
}

/// Shared settings for all evidence providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-request timeout, applied to every provider
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// User-Agent sent with every search request
    pub user_agent: String,

    /// Web search (Google Custom Search)
    pub google: GoogleSearchConfig,

    /// News search A (NewsAPI)
    pub newsapi: NewsApiConfig,

    /// News search B (GNews)
    pub gnews: GNewsConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            user_agent: concat!("veritas/", env!("CARGO_PKG_VERSION")).to_string(),
            google: GoogleSearchConfig::default(),
            newsapi: NewsApiConfig::default(),
            gnews: GNewsConfig::default(),
        }
    }
}

/// Google Custom Search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSearchConfig {
    pub endpoint: String,

    /// Results requested (`num`), also the cap on returned items
    pub num_results: u32,

    /// Total attempts including the first
    pub max_attempts: u32,

    /// Delay before the first retry; doubles on each further retry
    #[serde(with = "humantime_duration")]
    pub backoff: Duration,
}

impl Default for GoogleSearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            num_results: 3,
            max_attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// NewsAPI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    pub endpoint: String,

    /// ISO-639-1 language filter
    pub language: String,

    /// Results requested (`pageSize`), also the cap on returned items
    pub page_size: u32,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/everything".to_string(),
            language: "ka".to_string(),
            page_size: 3,
        }
    }
}

/// GNews settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GNewsConfig {
    pub endpoint: String,

    /// ISO-639-1 language filter
    pub language: String,

    /// Results requested (`max`), also the cap on returned items
    pub max_results: u32,
}

impl Default for GNewsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://gnews.io/api/v4/search".to_string(),
            language: "ka".to_string(),
            max_results: 3,
        }
    }
}

/// Verdict model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Registered provider name (e.g. "groq", "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature, kept low for repeatable verdicts
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Request timeout
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Override the provider's default API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "llama3-70b-8192".to_string(),
            temperature: 0.2,
            max_tokens: 1500,
            timeout: Duration::from_secs(30),
            base_url: None,
        }
    }
}

/// Serialize durations as human-readable strings ("5s", "1m 30s").
mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
