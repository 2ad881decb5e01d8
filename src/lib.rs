//! # Law-Text Term Search Engine
//!
//! ## Overview
//! This library implements a batch search engine for legal-text research: given a
//! corpus of court-case law-text sections and a table of query terms in multiple
//! languages, it finds every case whose text contains a query term as a whole word
//! (or matching a supplied regex pattern), extracts a highlighted context window
//! around each occurrence, and aggregates the per-match results into one summary
//! record per (case, query term) pair.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `corpus`: Tabular source loading and corpus assembly (join + text filter)
//! - `queries`: Query-table loading and language-column selection
//! - `matcher`: Word-boundary pattern matching against the corpus
//! - `context`: Context-window extraction with match highlighting
//! - `aggregate`: Per-(query, column) search driving and result grouping
//! - `export`: CSV output of summary records
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Three CSV sources (case dataset, law-text table, query table)
//! - **Output**: Summary records (one per matched case/term pair) with combined
//!   contexts and match counts, suitable for filtering and export
//! - **Processing**: Synchronous, in-memory, single pass per (term, column) pair
//!
//! ## Usage
//! ```rust,no_run
//! use lawtext_search::{Config, SearchEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let engine = SearchEngine::new(&config)?;
//!     let summaries = engine.search_all(config.search.context_radius)?;
//!     println!("Found {} unique matches", summaries.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod aggregate;
pub mod config;
pub mod context;
pub mod corpus;
pub mod errors;
pub mod export;
pub mod matcher;
pub mod queries;

// Re-exports for convenience
pub use aggregate::SearchEngine;
pub use config::{Config, FailurePolicy, QueryMode, SearchConfig, SourceConfig};
pub use corpus::Corpus;
pub use errors::{Result, SearchError};
pub use matcher::Matcher;

use serde::{Deserialize, Serialize};

/// One row of the assembled corpus: case metadata enriched with the law-text
/// section. Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Unique case identifier (join key across sources)
    pub itemid: String,
    /// Application number(s), semicolon-separated
    pub appno: Option<String>,
    /// Document name
    pub docname: Option<String>,
    /// Document type
    pub doctype: Option<String>,
    /// Three-letter language code of the judgment text
    pub language: Option<String>,
    /// Convention article reference
    pub article: Option<String>,
    /// Violation flag
    pub violation: Option<String>,
    /// Judgment year
    pub year: Option<String>,
    /// The law-text section. Always present after assembly: rows lacking it are
    /// dropped by the corpus filter.
    pub law_text: String,
}

/// One (case, query term) occurrence event with its extracted context. Produced
/// per matching corpus row per query and folded into a [`SummaryRecord`] by the
/// aggregator; never persisted standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Case identifier
    pub itemid: String,
    /// Case language code
    pub language: Option<String>,
    /// The query term as given by the caller
    pub query_word: String,
    /// Label of the query-table column the term came from. `None` for direct
    /// search calls outside the aggregation path.
    pub query_language: Option<String>,
    /// Extracted context string with the matched word(s) emphasized
    pub context: String,
    /// The raw full text the match was found in
    pub law_text: String,
}

/// Aggregated result for one (case identifier, query term) pair: the engine's
/// terminal output entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Case identifier
    pub itemid: String,
    /// Case language code, taken from the first folded match record
    pub language: Option<String>,
    /// The query term
    pub query_word: String,
    /// Source-column label, taken from the first folded match record
    pub query_language: Option<String>,
    /// All non-empty per-match contexts joined with the context separator
    pub combined_context: String,
    /// Number of match records folded into this summary (not the number of
    /// in-text occurrences)
    pub match_count: usize,
    /// Representative full text, taken from the first folded match record
    pub law_text: String,
}

/// Outcome of evaluating one corpus row against one query pattern. Lets callers
/// choose strict-abort or best-effort policies without relying on implicit
/// error propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowOutcome {
    /// The pattern matched and a match record was produced
    Matched(MatchRecord),
    /// The row was searched and the pattern did not match
    NoMatch,
    /// The row had no text to search and was skipped silently
    SkippedMissingText,
    /// Evaluation of this row failed
    Failed { reason: String },
}

/// Separator placed between per-occurrence contexts and between per-match
/// contexts in a combined summary.
pub const CONTEXT_SEPARATOR: &str = " | ";
