//! # Query Table Module
//!
//! ## Purpose
//! Loads the user-authored query table and decides which of its columns carry
//! language-labeled term lists. Column headers are trimmed; no further
//! validation happens at load time.
//!
//! ## Input/Output Specification
//! - **Input**: Query CSV with arbitrary columns
//! - **Output**: Selected term columns and per-cell query terms
//! - **Recognition**: Headers matching {english, french, en, fr}
//!   case-insensitively; if none match, every column is treated as a term list
//!
//! ## Key Features
//! - Language-column recognition with all-columns fallback
//! - Column name to corpus language-code mapping (english/en -> eng,
//!   french/fr -> fre, anything else -> no language restriction)

use crate::corpus::CsvTable;
use crate::errors::Result;
use std::path::Path;
use tracing::info;

/// Query-column headers recognized as language-labeled term lists
const RECOGNIZED_COLUMNS: [&str; 4] = ["english", "french", "en", "fr"];

/// The loaded query table.
#[derive(Debug, Clone)]
pub struct QueryTable {
    table: CsvTable,
}

impl QueryTable {
    /// Load the query table as-is, trimming column-header whitespace.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let table = CsvTable::load(path, "queries", None)?;
        info!(
            rows = table.len(),
            columns = ?table.headers(),
            "loaded queries"
        );
        Ok(Self { table })
    }

    /// Wrap an already-loaded table.
    pub fn from_table(table: CsvTable) -> Self {
        Self { table }
    }

    /// Number of query rows
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// All column headers
    pub fn columns(&self) -> &[String] {
        self.table.headers()
    }

    /// Columns to search: the recognized language columns, or every column when
    /// none of the recognized headers is present.
    pub fn term_columns(&self) -> Vec<(usize, String)> {
        let recognized: Vec<(usize, String)> = self
            .table
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, header)| {
                RECOGNIZED_COLUMNS.contains(&header.to_lowercase().as_str())
            })
            .map(|(idx, header)| (idx, header.clone()))
            .collect();

        if recognized.is_empty() {
            self.table
                .headers()
                .iter()
                .enumerate()
                .map(|(idx, header)| (idx, header.clone()))
                .collect()
        } else {
            recognized
        }
    }

    /// Cell value at (row, column); empty cells are missing.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.table.cell(row, column)
    }
}

/// Corpus language-code restriction derived from a query-column name.
pub fn language_filter_for(column: &str) -> Option<&'static str> {
    match column.to_lowercase().as_str() {
        "english" | "en" => Some("eng"),
        "french" | "fr" => Some("fre"),
        _ => None,
    }
}
