//! # EXANTE Client Configuration
//!
//! Explicit configuration for the market-data client: host, API prefix,
//! bearer token and the policy applied when a requested field is absent.
//! Values can be set directly, or loaded from the environment (with an
//! optional `.env` file picked up through `dotenvy`).

use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Default host, pointing at the demo environment.
pub const DEFAULT_HOST: &str = "https://api-demo.exante.eu";
/// Default market-data API prefix.
pub const DEFAULT_API_PREFIX: &str = "/md/1.0";

/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "EXANTE_API_TOKEN";
/// Environment variable overriding the host.
pub const ENV_HOST: &str = "EXANTE_API_HOST";
/// Environment variable overriding the API prefix.
pub const ENV_API_PREFIX: &str = "EXANTE_API_PREFIX";
/// Environment variable selecting the missing-field policy (`error` or `empty`).
pub const ENV_MISSING_FIELD: &str = "EXANTE_MISSING_FIELD";

/// Errors that can occur while assembling a configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set (or is empty).
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// A value is present but cannot be interpreted.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// The setting or variable name.
        key: String,
        /// The offending value.
        value: String,
        /// What was expected instead.
        reason: String,
    },
}

/// What a field lookup returns when the response lacks the requested key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Fail with a field-not-found error.
    #[default]
    Error,
    /// Return JSON `null`, which renders as an empty cell.
    Empty,
}

impl FromStr for MissingFieldPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "empty" => Ok(Self::Empty),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_MISSING_FIELD.to_string(),
                value: s.to_string(),
                reason: "expected `error` or `empty`".to_string(),
            }),
        }
    }
}

impl fmt::Display for MissingFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Empty => f.write_str("empty"),
        }
    }
}

/// Connection settings for the EXANTE market-data API.
#[derive(Clone, PartialEq, Eq)]
pub struct ExanteConfig {
    /// Scheme and authority, e.g. `https://api-demo.exante.eu`.
    pub host: String,
    /// Path prefix of the market-data API, e.g. `/md/1.0`.
    pub api_prefix: String,
    /// Static bearer token.
    pub token: String,
    /// Behavior for absent fields.
    pub missing_field: MissingFieldPolicy,
}

impl fmt::Debug for ExanteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExanteConfig")
            .field("host", &self.host)
            .field("api_prefix", &self.api_prefix)
            .field("token", &"<redacted>")
            .field("missing_field", &self.missing_field)
            .finish()
    }
}

impl ExanteConfig {
    /// Demo host, default prefix and the `Error` policy, with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            token: token.into(),
            missing_field: MissingFieldPolicy::default(),
        }
    }

    /// Replaces the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replaces the API prefix.
    pub fn with_api_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = api_prefix.into();
        self
    }

    /// Replaces the missing-field policy.
    pub fn with_missing_field(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field = policy;
        self
    }

    /// Host and prefix joined into an absolute base URL ending with `/`.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let host = self.host.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        let joined = if prefix.is_empty() {
            format!("{}/", host)
        } else {
            format!("{}/{}/", host, prefix)
        };
        Url::parse(&joined).map_err(|e| ConfigError::InvalidValue {
            key: ENV_HOST.to_string(),
            value: self.host.clone(),
            reason: e.to_string(),
        })
    }

    /// Loads `.env` (if any) and reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Only the token is mandatory.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token =
            get(ENV_TOKEN).ok_or_else(|| ConfigError::MissingEnvVar(ENV_TOKEN.to_string()))?;
        let mut config = Self::new(token.trim());

        if let Some(host) = get(ENV_HOST) {
            config.host = host.trim().to_string();
        }
        if let Some(prefix) = get(ENV_API_PREFIX) {
            config.api_prefix = prefix.trim().to_string();
        }
        if let Some(policy) = get(ENV_MISSING_FIELD) {
            config.missing_field = policy.parse()?;
        }

        Ok(config)
    }
}
