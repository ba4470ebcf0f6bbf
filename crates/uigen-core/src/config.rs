//! Configuration
//!
//! Loaded from TOML with every section optional, then overridden by
//! environment variables. Builder methods cover programmatic use.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment override for [`GenerationConfig::max_attempts`]
pub const MAX_ATTEMPTS_ENV: &str = "UIGEN_MAX_ATTEMPTS";

/// Environment override for [`BackendConfig::model`]
pub const MODEL_ENV: &str = "UIGEN_MODEL";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UigenConfig {
    /// Retry loop settings
    pub generation: GenerationConfig,
    /// Backend client settings
    pub backend: BackendConfig,
    /// History store settings
    pub history: HistoryConfig,
}

impl UigenConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// `Parse` on malformed TOML or unknown keys, `Invalid` when a value is
    /// out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// `Io` when the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `UIGEN_*` environment overrides
    ///
    /// # Errors
    /// `InvalidOverride` when a variable holds an unusable value.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    /// Same as [`Self::with_env_overrides`].
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup(MAX_ATTEMPTS_ENV) {
            self.generation.max_attempts = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| ConfigError::InvalidOverride {
                    var: MAX_ATTEMPTS_ENV,
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = lookup(MODEL_ENV) {
            let model = raw.trim();
            if model.is_empty() {
                return Err(ConfigError::InvalidOverride { var: MODEL_ENV, value: raw });
            }
            self.backend.model = model.to_string();
        }
        Ok(self)
    }

    /// With generation settings
    #[inline]
    #[must_use]
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `Invalid` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.max_attempts == 0 {
            return Err(ConfigError::invalid("generation.max_attempts must be at least 1"));
        }
        if self.backend.model.trim().is_empty() {
            return Err(ConfigError::invalid("backend.model must not be empty"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::invalid("backend.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Retry loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Attempt ceiling per request, applied to every kind
    pub max_attempts: u32,
}

impl GenerationConfig {
    /// Default attempt ceiling
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With attempt ceiling, clamped to at least one
    #[inline]
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Backend client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// API base URL
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// Variable holding the API key
    pub api_key_env: String,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// With model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With API key variable name
    #[inline]
    #[must_use]
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// History store settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// JSONL file; history is disabled when absent
    pub path: Option<PathBuf>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File unreadable
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// TOML syntax or shape error
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment variable holds an unusable value
    #[error("invalid value for {var}: '{value}'")]
    InvalidOverride {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// Value out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create invalid configuration error
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() {
        let config = UigenConfig::from_toml_str("").unwrap();
        assert_eq!(config, UigenConfig::default());
        assert_eq!(config.generation.max_attempts, 3);
        assert_eq!(config.backend.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.history.path, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = UigenConfig::from_toml_str(
            r#"
            [generation]
            max_attempts = 5

            [backend]
            model = "gemini-2.0-flash"

            [history]
            path = "var/history.jsonl"
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.max_attempts, 5);
        assert_eq!(config.backend.model, "gemini-2.0-flash");
        assert_eq!(config.backend.timeout_secs, 60);
        assert_eq!(config.history.path, Some(PathBuf::from("var/history.jsonl")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = UigenConfig::from_toml_str("[generation]\nretries = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let err = UigenConfig::from_toml_str("[generation]\nmax_attempts = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = [(MAX_ATTEMPTS_ENV, "7"), (MODEL_ENV, " gemini-pro ")].into();
        let config = UigenConfig::new()
            .with_overrides(|name| vars.get(name).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.generation.max_attempts, 7);
        assert_eq!(config.backend.model, "gemini-pro");
    }

    #[test]
    fn bad_override_is_reported() {
        let err = UigenConfig::new()
            .with_overrides(|name| (name == MAX_ATTEMPTS_ENV).then(|| "zero".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid value for UIGEN_MAX_ATTEMPTS: 'zero'");
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uigen.toml");
        std::fs::write(&path, "[backend]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(UigenConfig::load(&path).unwrap().backend.timeout_secs, 5);

        let missing = UigenConfig::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn builder_clamps_attempts() {
        assert_eq!(GenerationConfig::new().with_max_attempts(0).max_attempts, 1);
    }
}
