//! Configuration for MailQuery

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "MAILQUERY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Filter parsing and rendering configuration
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// How the filter parser treats a map key that is not an operator token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFallback {
    /// Any unresolved key becomes a field name, wherever it appears
    Permissive,
    /// Field names are accepted only directly under an operator key and
    /// only when they look like field names
    #[default]
    Strict,
}

/// Output dialect for rendered filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotationKind {
    /// Uninterpreted prefix notation, e.g. `== id 5`
    #[default]
    Polish,
    /// IMAP SEARCH dialect, e.g. `(UID 1000:*)`
    SearchQuery,
}

impl std::fmt::Display for NotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotationKind::Polish => write!(f, "polish"),
            NotationKind::SearchQuery => write!(f, "search_query"),
        }
    }
}

/// Filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Maximum nesting depth accepted by the parser and renderers
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Treatment of keys that do not resolve to an operator
    #[serde(default)]
    pub field_fallback: FieldFallback,

    /// Default output notation
    #[serde(default)]
    pub notation: NotationKind,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            field_fallback: FieldFallback::default(),
            notation: NotationKind::default(),
        }
    }
}

fn default_max_depth() -> usize {
    32
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from the default locations and environment
    pub fn load() -> crate::Result<Self> {
        let paths = [
            PathBuf::from("./mailquery.toml"),
            PathBuf::from("/etc/mailquery/config.toml"),
        ];

        Self::load_with(&paths, ENV_PREFIX)
    }

    /// Layer the first existing file among `paths` and `{env_prefix}_*`
    /// environment variables over the defaults
    pub fn load_with(paths: &[PathBuf], env_prefix: &str) -> crate::Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = paths.iter().find(|p| p.exists()) {
            tracing::debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
            .map_err(|e| crate::Error::Config(format!("Failed to load config: {}", e)))
    }
}
