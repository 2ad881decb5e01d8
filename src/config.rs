//! # Configuration Management Module
//!
//! ## Purpose
//! Explicit configuration for the search engine: source file locations, optional
//! law-table row cap, context radius, query-term interpretation mode, and failure
//! policy. Replaces constructor-argument plumbing with one immutable value passed
//! to the engine constructor.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Range checks with detailed error messages
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (applied by the binary, highest priority)
//! 2. Environment variables
//! 3. Configuration files
//! 4. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use lawtext_search::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Context radius: {}", config.search.context_radius);
//! ```

use crate::errors::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tabular source locations and load options
    pub sources: SourceConfig,
    /// Search behavior
    pub search: SearchConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Tabular source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Full case dataset CSV (metadata columns, no law text)
    pub dataset_path: PathBuf,
    /// Law-text table CSV (`itemid` + `THE_LAW`)
    pub law_path: PathBuf,
    /// Query table CSV (one column per query language)
    pub queries_path: PathBuf,
    /// Optional row cap on the law-text source, for fast iteration and testing
    pub law_row_cap: Option<usize>,
}

/// Search behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of context words on each side of a match
    pub context_radius: usize,
    /// How query terms are interpreted when building patterns
    pub query_mode: QueryMode,
    /// How per-query failures are handled during aggregation
    pub failure_policy: FailurePolicy,
}

/// Interpretation of query terms.
///
/// The upstream data flow is ambiguous on this point: one path escapes terms as
/// literal words, another passes regex-bearing terms through untouched. The mode
/// makes the choice explicit per run instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Escape regex metacharacters: the term matches as a literal whole word
    Literal,
    /// Use the term as a regex pattern, wrapped in word boundaries
    Regex,
}

/// Failure handling during aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the whole aggregation on the first (term, column) failure
    Strict,
    /// Log the failing term and column, then continue with the remaining queries
    BestEffort,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            // 10-20 words is the range exercised in practice; 20 is the
            // production default
            context_radius: 20,
            // The shipped query tables carry regex terms such as optional
            // groups, so patterns are honored by default
            query_mode: QueryMode::Regex,
            failure_policy: FailurePolicy::Strict,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file.
    ///
    /// A missing file is not an error: defaults (plus environment overrides)
    /// are returned, and the caller decides whether that deserves a warning.
    /// Logging may not be initialized yet at this point, so no event is
    /// emitted here.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let mut config = Self::default();
            config.apply_env_overrides();
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| SearchError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| SearchError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("LAWTEXT_SEARCH_DATASET") {
            self.sources.dataset_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LAWTEXT_SEARCH_LAW") {
            self.sources.law_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LAWTEXT_SEARCH_QUERIES") {
            self.sources.queries_path = PathBuf::from(path);
        }
        if let Ok(level) = std::env::var("LAWTEXT_SEARCH_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.context_radius == 0 {
            return Err(SearchError::ValidationFailed {
                field: "search.context_radius".to_string(),
                reason: "Context radius must be greater than zero".to_string(),
            });
        }

        if let Some(cap) = self.sources.law_row_cap {
            if cap == 0 {
                return Err(SearchError::ValidationFailed {
                    field: "sources.law_row_cap".to_string(),
                    reason: "Row cap must be greater than zero when set".to_string(),
                });
            }
        }

        Ok(())
    }
}
