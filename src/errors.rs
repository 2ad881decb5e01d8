//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the law-text search engine, covering source
//! loading, pattern compilation, per-query failures, and result export.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from loading, matching, and export components
//! - **Output**: Structured error types naming the offending source, term, or column
//! - **Error Categories**: Source, Search, Configuration, Export
//!
//! ## Key Features
//! - Load failures always name which source file failed and why
//! - Aggregation failures carry the offending query term and column, since query
//!   tables are user-authored and the most likely place for malformed patterns
//! - Category helper for structured logging

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error types for the law-text search engine
#[derive(Debug, Error)]
pub enum SearchError {
    /// A source file could not be read
    #[error("failed to read source '{name}': {details}")]
    SourceRead { name: String, details: String },

    /// A source file could not be parsed as tabular data
    #[error("failed to parse source '{name}' as CSV: {details}")]
    SourceParse { name: String, details: String },

    /// A required column is absent from a source table
    #[error("source '{name}' is missing required column '{column}'")]
    MissingColumn { name: String, column: String },

    /// A query term could not be compiled into a search pattern
    #[error("invalid search pattern '{term}': {details}")]
    InvalidPattern { term: String, details: String },

    /// One (query term, column) iteration of the aggregation failed
    #[error("query '{term}' from column '{column}' failed: {details}")]
    QueryFailed {
        term: String,
        column: String,
        details: String,
    },

    /// Matching failed on a single corpus row
    #[error("matching failed for item '{itemid}': {details}")]
    MatchFailed { itemid: String, details: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Configuration validation errors
    #[error("validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Result export errors
    #[error("failed to write results to '{path}': {details}")]
    Export { path: String, details: String },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SearchError::SourceRead { .. }
            | SearchError::SourceParse { .. }
            | SearchError::MissingColumn { .. } => "source",
            SearchError::InvalidPattern { .. }
            | SearchError::QueryFailed { .. }
            | SearchError::MatchFailed { .. } => "search",
            SearchError::Config { .. } | SearchError::ValidationFailed { .. } => "configuration",
            SearchError::Export { .. } => "export",
            SearchError::Io(_) => "io",
        }
    }
}
