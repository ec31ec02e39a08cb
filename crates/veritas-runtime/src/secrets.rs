//! Secure credential handling for search providers and LLM providers.
//!
//! Every API key the runtime needs is loaded once at startup into an
//! [`ApiCredential`]. Using this module ensures:
//!
//! - **No accidental logging**: credentials never appear in Debug/Display output
//! - **Memory safety**: credentials are zeroed on drop
//! - **Fail fast**: all missing keys are reported together before any check runs
//!
//! ## Usage
//!
//! ```ignore
//! let credentials = CredentialBuilder::new()
//!     .require(GOOGLE_API_KEY_ENV, "Google API key")
//!     .require(GROQ_API_KEY_ENV, "Groq API key")
//!     .build_from_env()?;
//!
//! // Use in a query string or header (explicit exposure)
//! request.query(&[("key", credentials.get(GOOGLE_API_KEY_ENV)?.expose())]);
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::ConfigError;

/// Google Custom Search API key.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Google Programmable Search Engine id (`cx`).
pub const GOOGLE_CSE_ID_ENV: &str = "GOOGLE_CSE_ID";

/// NewsAPI key.
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";

/// GNews token.
pub const GNEWS_API_KEY_ENV: &str = "GNEWS_API_KEY";

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable (including `.env`)
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
///
/// - `Debug` and `Display` show `[REDACTED]`
/// - The value is zeroed on drop via `secrecy`
/// - Access requires an explicit `.expose()`
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a credential value.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Expose the credential value.
    ///
    /// Call this only where the value is sent (query string, header).
    /// Never store the exposed value.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

struct CredentialSpec {
    env_var: &'static str,
    name: &'static str,
}

/// Declares which credentials must exist before the runtime starts.
///
/// # Example
///
/// ```ignore
/// let creds = CredentialBuilder::new()
///     .require("NEWS_API_KEY", "NewsAPI key")
///     .build_from_env()?;
/// ```
#[derive(Default)]
pub struct CredentialBuilder {
    required: Vec<CredentialSpec>,
}

impl CredentialBuilder {
    /// Create a new credential builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required credential.
    ///
    /// Requiring the same variable twice is harmless.
    pub fn require(mut self, env_var: &'static str, name: &'static str) -> Self {
        if !self.required.iter().any(|s| s.env_var == env_var) {
            self.required.push(CredentialSpec { env_var, name });
        }
        self
    }

    /// Names of the required variables, in declaration order.
    pub fn required_vars(&self) -> Vec<&'static str> {
        self.required.iter().map(|s| s.env_var).collect()
    }

    /// Load every required credential from the process environment.
    pub fn build_from_env(self) -> Result<CredentialSet, ConfigError> {
        self.build_with(|var| std::env::var(var).ok())
    }

    /// Load every required credential through `lookup`.
    ///
    /// Empty values count as missing. On failure the error lists every
    /// missing variable, not just the first.
    pub fn build_with<F>(self, lookup: F) -> Result<CredentialSet, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut credentials = BTreeMap::new();
        let mut missing = Vec::new();

        for spec in self.required {
            match lookup(spec.env_var).filter(|v| !v.is_empty()) {
                Some(value) => {
                    credentials.insert(
                        spec.env_var,
                        Arc::new(ApiCredential::new(value, CredentialSource::Environment, spec.name)),
                    );
                }
                None => missing.push(spec.env_var.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        Ok(CredentialSet { credentials })
    }
}

/// The credentials loaded at startup.
///
/// Read-only and shared: sources and providers hold `Arc` handles to the
/// credentials they need.
#[derive(Default)]
pub struct CredentialSet {
    credentials: BTreeMap<&'static str, Arc<ApiCredential>>,
}

impl CredentialSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential programmatically (tests, embedding).
    pub fn insert(&mut self, env_var: &'static str, credential: ApiCredential) {
        self.credentials.insert(env_var, Arc::new(credential));
    }

    /// Builder-style [`insert`](Self::insert) for programmatic values.
    pub fn with(mut self, env_var: &'static str, value: impl Into<String>) -> Self {
        self.insert(
            env_var,
            ApiCredential::new(value, CredentialSource::Programmatic, env_var),
        );
        self
    }

    /// Get a credential by variable name.
    pub fn get(&self, env_var: &str) -> Result<Arc<ApiCredential>, ConfigError> {
        self.credentials
            .get(env_var)
            .cloned()
            .ok_or_else(|| ConfigError::MissingCredentials(vec![env_var.to_string()]))
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("keys", &self.credentials.keys().collect::<Vec<_>>())
            .finish()
    }
}
