//! # Corpus Assembly Module
//!
//! ## Purpose
//! Loads the two case-data sources (full dataset and law-text table), merges them
//! on the case identifier, and filters to rows that actually carry a law-text
//! section. The result is the immutable corpus every search runs against.
//!
//! ## Input/Output Specification
//! - **Input**: Full dataset CSV (metadata columns) and law-text CSV
//!   (`itemid` + `THE_LAW`), with an optional row cap on the latter
//! - **Output**: [`Corpus`] of [`CaseRecord`]s, each guaranteed to have text
//! - **Join**: Left join of dataset rows onto law-text rows keyed by `itemid`;
//!   every dataset row appears at most once
//!
//! ## Key Features
//! - Column headers trimmed of surrounding whitespace on load
//! - Empty cells treated as missing values
//! - Row/column diagnostics reported for test fixtures and sanity checks
//! - Identifiers present in only one source are excluded by join + filter

use crate::config::SourceConfig;
use crate::errors::{Result, SearchError};
use crate::CaseRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Column holding the law-text section in the law table
pub const FULLTEXT_COLUMN: &str = "THE_LAW";
/// Column holding the case language code in the dataset
pub const LANGUAGE_COLUMN: &str = "languageisocode";
/// Join key column, present in both sources
pub const ITEMID_COLUMN: &str = "itemid";

/// A generic CSV table: trimmed headers plus string rows. Empty cells read back
/// as missing.
#[derive(Debug, Clone)]
pub struct CsvTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Load a CSV file, trimming header whitespace. `row_cap` limits the number
    /// of data rows read.
    pub fn load<P: AsRef<Path>>(path: P, name: &str, row_cap: Option<usize>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| SearchError::SourceRead {
            name: name.to_string(),
            details: format!("{:?}: {}", path, e),
        })?;

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SearchError::SourceParse {
                name: name.to_string(),
                details: e.to_string(),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| SearchError::SourceParse {
                name: name.to_string(),
                details: e.to_string(),
            })?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
            if let Some(cap) = row_cap {
                if rows.len() >= cap {
                    break;
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    /// Source name this table was loaded as
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed column headers
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Index of a required column, or a [`SearchError::MissingColumn`]
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| SearchError::MissingColumn {
                name: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Cell value at (row, column), with empty cells reported as missing.
    /// Out-of-bounds columns on short (flexible) rows are also missing.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)?
            .get(column)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// The assembled, text-complete set of case records available for searching.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<CaseRecord>,
}

impl Corpus {
    /// Assemble the corpus from the dataset and law-text sources.
    ///
    /// Fails if either source cannot be parsed or lacks its required columns.
    /// Rows without a law-text section are dropped, so every surviving record
    /// has text to search.
    pub fn assemble(sources: &SourceConfig) -> Result<Self> {
        let dataset = CsvTable::load(&sources.dataset_path, "dataset", None)?;
        let law = CsvTable::load(&sources.law_path, "law", sources.law_row_cap)?;
        Self::from_tables(&dataset, &law)
    }

    /// Assemble the corpus from already-loaded tables.
    pub fn from_tables(dataset: &CsvTable, law: &CsvTable) -> Result<Self> {
        let ds_itemid = dataset.require_column(ITEMID_COLUMN)?;
        let ds_language = dataset.require_column(LANGUAGE_COLUMN)?;
        let law_itemid = law.require_column(ITEMID_COLUMN)?;
        let law_text = law.require_column(FULLTEXT_COLUMN)?;

        info!(
            rows = dataset.len(),
            columns = ?dataset.headers(),
            "loaded dataset"
        );
        info!(rows = law.len(), "loaded law-text table");

        // Only the known descriptive columns are carried; anything else in the
        // dataset is ignored
        let appno = dataset.column_index("appno");
        let docname = dataset.column_index("docname");
        let doctype = dataset.column_index("doctype");
        let article = dataset.column_index("article");
        let violation = dataset.column_index("violation");
        let year = dataset.column_index("year");

        let mut text_by_item: HashMap<&str, &str> = HashMap::new();
        for row in 0..law.len() {
            if let (Some(itemid), Some(text)) = (law.cell(row, law_itemid), law.cell(row, law_text))
            {
                // first occurrence wins on duplicate identifiers
                text_by_item.entry(itemid).or_insert(text);
            }
        }

        let owned = |cell: Option<&str>| cell.map(str::to_string);

        let mut records = Vec::new();
        for row in 0..dataset.len() {
            let Some(itemid) = dataset.cell(row, ds_itemid) else {
                continue;
            };
            let Some(text) = text_by_item.get(itemid) else {
                continue;
            };
            records.push(CaseRecord {
                itemid: itemid.to_string(),
                appno: owned(appno.and_then(|c| dataset.cell(row, c))),
                docname: owned(docname.and_then(|c| dataset.cell(row, c))),
                doctype: owned(doctype.and_then(|c| dataset.cell(row, c))),
                language: owned(dataset.cell(row, ds_language)),
                article: owned(article.and_then(|c| dataset.cell(row, c))),
                violation: owned(violation.and_then(|c| dataset.cell(row, c))),
                year: owned(year.and_then(|c| dataset.cell(row, c))),
                law_text: text.to_string(),
            });
        }

        info!(
            rows = records.len(),
            "assembled corpus after merge and text filter"
        );

        Ok(Self { records })
    }

    /// Build a corpus directly from records, for tests and embedding callers.
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    /// Records in source order
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_csv(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn sources(dir: &Path, dataset: &str, law: &str, cap: Option<usize>) -> SourceConfig {
        SourceConfig {
            dataset_path: write_csv(dir, "dataset.csv", dataset),
            law_path: write_csv(dir, "law.csv", law),
            queries_path: PathBuf::new(),
            law_row_cap: cap,
        }
    }

    #[test]
    fn join_drops_rows_missing_from_either_source() {
        let dir = tempfile::tempdir().unwrap();
        // 1002 has no law text; 1003 exists only in the law table
        let dataset = "itemid,languageisocode,year\n1001,ENG,2004\n1002,FRE,2005\n";
        let law = "itemid,THE_LAW\n1001,The relevant domestic law.\n1003,Orphaned section.\n";
        let corpus = Corpus::assemble(&sources(dir.path(), dataset, law, None)).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.records()[0].itemid, "1001");
        assert_eq!(corpus.records()[0].law_text, "The relevant domestic law.");
    }

    #[test]
    fn every_assembled_row_has_text() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = "itemid,languageisocode\n1,ENG\n2,ENG\n3,FRE\n";
        let law = "itemid,THE_LAW\n1,some text\n2,\n3,autre texte\n";
        let corpus = Corpus::assemble(&sources(dir.path(), dataset, law, None)).unwrap();

        assert_eq!(corpus.len(), 2);
        assert!(corpus.records().iter().all(|r| !r.law_text.is_empty()));
    }

    #[test]
    fn headers_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = " itemid , languageisocode \n1001,ENG\n";
        let law = "itemid, THE_LAW \n1001,text here\n";
        let corpus = Corpus::assemble(&sources(dir.path(), dataset, law, None)).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.records()[0].language.as_deref(), Some("ENG"));
    }

    #[test]
    fn missing_join_key_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = "itemid,languageisocode\n1001,ENG\n";
        let law = "case_id,THE_LAW\n1001,text\n";
        let err = Corpus::assemble(&sources(dir.path(), dataset, law, None)).unwrap_err();

        match err {
            SearchError::MissingColumn { name, column } => {
                assert_eq!(name, "law");
                assert_eq!(column, "itemid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn law_row_cap_limits_the_join() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = "itemid,languageisocode\n1,ENG\n2,ENG\n3,ENG\n";
        let law = "itemid,THE_LAW\n1,a\n2,b\n3,c\n";
        let corpus = Corpus::assemble(&sources(dir.path(), dataset, law, Some(2))).unwrap();

        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn descriptive_columns_are_optional() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = "itemid,languageisocode\n1001,ENG\n";
        let law = "itemid,THE_LAW\n1001,text\n";
        let corpus = Corpus::assemble(&sources(dir.path(), dataset, law, None)).unwrap();

        let record = &corpus.records()[0];
        assert!(record.appno.is_none());
        assert!(record.year.is_none());
    }

    #[test]
    fn unreadable_source_reports_which_one() {
        let sources = SourceConfig {
            dataset_path: PathBuf::from("/nonexistent/dataset.csv"),
            law_path: PathBuf::from("/nonexistent/law.csv"),
            queries_path: PathBuf::new(),
            law_row_cap: None,
        };
        let err = Corpus::assemble(&sources).unwrap_err();
        match err {
            SearchError::SourceRead { name, .. } => assert_eq!(name, "dataset"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
