//! # Aggregation Module
//!
//! ## Purpose
//! Drives the matcher over every (query-table row, language column) pair, tags
//! the resulting matches with their source column, and folds all match records
//! into one summary record per (case identifier, query term) pair.
//!
//! ## Input/Output Specification
//! - **Input**: Assembled corpus, loaded query table, context radius
//! - **Output**: Summary records with combined contexts and match counts;
//!   an empty result set is a valid output, not an error
//! - **Grouping**: First-seen order over the collected match records, so output
//!   is deterministic for a given corpus and query table
//!
//! ## Key Features
//! - Language restriction per column (english/en -> eng, french/fr -> fre,
//!   other columns unrestricted)
//! - Strict failure policy aborts on the first failing (term, column) pair;
//!   best-effort logs the offender and keeps going
//! - Match count is the number of folded match records, not the number of
//!   in-text occurrences

use crate::config::{Config, FailurePolicy, SearchConfig};
use crate::corpus::Corpus;
use crate::errors::{Result, SearchError};
use crate::matcher::Matcher;
use crate::queries::{language_filter_for, QueryTable};
use crate::{MatchRecord, SummaryRecord, CONTEXT_SEPARATOR};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// The search-and-aggregation engine. Owns the read-only corpus and query
/// table for the duration of a run.
pub struct SearchEngine {
    corpus: Corpus,
    queries: QueryTable,
    config: SearchConfig,
}

impl SearchEngine {
    /// Load all sources and build the engine.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let corpus = Corpus::assemble(&config.sources)?;
        let queries = QueryTable::load(&config.sources.queries_path)?;
        Ok(Self {
            corpus,
            queries,
            config: config.search.clone(),
        })
    }

    /// Build the engine from already-assembled parts.
    pub fn from_parts(corpus: Corpus, queries: QueryTable, config: SearchConfig) -> Self {
        Self {
            corpus,
            queries,
            config,
        }
    }

    /// The assembled corpus
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Search for a single term, outside the aggregation path.
    pub fn search(
        &self,
        term: &str,
        language_filter: Option<&str>,
        radius: usize,
    ) -> Result<Vec<MatchRecord>> {
        Matcher::new(&self.corpus, self.config.query_mode).search(term, language_filter, radius)
    }

    /// Run every query term from the query table and aggregate the matches.
    pub fn search_all(&self, radius: usize) -> Result<Vec<SummaryRecord>> {
        let columns = self.queries.term_columns();
        let names: Vec<&str> = columns.iter().map(|(_, name)| name.as_str()).collect();
        info!(columns = ?names, "searching using query columns");

        let matcher = Matcher::new(&self.corpus, self.config.query_mode);
        let mut all_matches: Vec<MatchRecord> = Vec::new();

        for row in 0..self.queries.len() {
            for (column_index, column_name) in &columns {
                let Some(cell) = self.queries.cell(row, *column_index) else {
                    continue;
                };
                let term = cell.trim();
                if term.is_empty() {
                    continue;
                }

                let language_filter = language_filter_for(column_name);
                match matcher.search(term, language_filter, radius) {
                    Ok(records) => {
                        debug!(
                            term,
                            column = %column_name,
                            matches = records.len(),
                            "query completed"
                        );
                        for mut record in records {
                            record.query_language = Some(column_name.clone());
                            all_matches.push(record);
                        }
                    }
                    Err(err) => match self.config.failure_policy {
                        FailurePolicy::Strict => {
                            return Err(SearchError::QueryFailed {
                                term: term.to_string(),
                                column: column_name.clone(),
                                details: err.to_string(),
                            });
                        }
                        FailurePolicy::BestEffort => {
                            warn!(
                                term,
                                column = %column_name,
                                error = %err,
                                "query failed, continuing"
                            );
                        }
                    },
                }
            }
        }

        if all_matches.is_empty() {
            info!("no matches found");
            return Ok(Vec::new());
        }

        Ok(group_matches(all_matches))
    }
}

/// Fold match records into one summary per (itemid, query term) pair, in
/// first-seen order.
fn group_matches(matches: Vec<MatchRecord>) -> Vec<SummaryRecord> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut groups: HashMap<(String, String), Vec<MatchRecord>> = HashMap::new();

    for record in matches {
        let key = (record.itemid.clone(), record.query_word.clone());
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(record);
    }

    let mut summaries = Vec::with_capacity(order.len());
    for key in order {
        let members = groups.remove(&key).unwrap_or_default();
        let combined_context = members
            .iter()
            .map(|m| m.context.as_str())
            .filter(|context| !context.is_empty())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        let match_count = members.len();
        let (itemid, query_word) = key;

        // representative metadata comes from the first member of the group
        let first = members
            .into_iter()
            .next()
            .expect("group has at least one member");
        summaries.push(SummaryRecord {
            itemid,
            language: first.language,
            query_word,
            query_language: first.query_language,
            combined_context,
            match_count,
            law_text: first.law_text,
        });
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CsvTable;
    use crate::CaseRecord;
    use std::path::Path;

    fn case(itemid: &str, language: &str, text: &str) -> CaseRecord {
        CaseRecord {
            itemid: itemid.to_string(),
            appno: None,
            docname: None,
            doctype: None,
            language: Some(language.to_string()),
            article: None,
            violation: None,
            year: None,
            law_text: text.to_string(),
        }
    }

    fn load_queries(dir: &Path, content: &str) -> QueryTable {
        let path = dir.join("queries.csv");
        std::fs::write(&path, content).unwrap();
        QueryTable::from_table(CsvTable::load(&path, "queries", None).unwrap())
    }

    fn engine(records: Vec<CaseRecord>, queries: QueryTable) -> SearchEngine {
        SearchEngine::from_parts(
            Corpus::from_records(records),
            queries,
            SearchConfig::default(),
        )
    }

    #[test]
    fn single_french_query_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "French\nsubsistance\n");
        let engine = engine(
            vec![case(
                "1001",
                "fre",
                "La g\u{ea}ne morale et la subsistance des familles.",
            )],
            queries,
        );

        let summaries = engine.search_all(20).unwrap();
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.itemid, "1001");
        assert_eq!(summary.language.as_deref(), Some("fre"));
        assert_eq!(summary.query_word, "subsistance");
        assert_eq!(summary.query_language.as_deref(), Some("French"));
        assert_eq!(summary.match_count, 1);
        assert!(summary.combined_context.contains("**subsistance**"));
    }

    #[test]
    fn regex_terms_are_honored_through_aggregation() {
        // default mode is regex: optional-group terms from the query table must
        // match, not be literal-escaped
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "French\n\"(moyens de)? subsistance\"\n");
        let engine = engine(
            vec![case("2001", "fre", "priver de ses moyens de subsistance")],
            queries,
        );

        let summaries = engine.search_all(10).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].query_word, "(moyens de)? subsistance");
        assert_eq!(summaries[0].match_count, 1);
    }

    #[test]
    fn language_columns_restrict_the_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "English\ndestitution\n");
        let engine = engine(
            vec![
                case("1", "eng", "destitution was alleged"),
                case("2", "fre", "la destitution du juge"),
            ],
            queries,
        );

        let summaries = engine.search_all(10).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].itemid, "1");
        assert_eq!(summaries[0].language.as_deref(), Some("eng"));
    }

    #[test]
    fn repeated_terms_fold_into_one_summary() {
        // the same term appearing in two query rows produces two match records
        // for the same case; aggregation must fold them into one summary
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "English\nshelter\nshelter\n");
        let engine = engine(vec![case("1", "eng", "no shelter was provided")], queries);

        let summaries = engine.search_all(10).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].match_count, 2);

        let segments: Vec<&str> = summaries[0].combined_context.split(" | ").collect();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.contains("**shelter**")));
    }

    #[test]
    fn unrecognized_columns_search_without_language_filter() {
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "terms\nsubsistence\n");
        let engine = engine(
            vec![
                case("1", "eng", "means of subsistence"),
                case("2", "fre", "subsistence note in a french row"),
            ],
            queries,
        );

        let summaries = engine.search_all(10).unwrap();
        assert_eq!(summaries.len(), 2);
    }

    #[test]
    fn no_matches_yields_empty_result_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "English\nunfindable\n");
        let engine = engine(vec![case("1", "eng", "nothing relevant here")], queries);

        let summaries = engine.search_all(10).unwrap();
        assert!(summaries.is_empty());
    }

    #[test]
    fn strict_policy_reports_term_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "French\n\"(unclosed\"\n");
        let engine = engine(vec![case("1", "fre", "texte")], queries);

        let err = engine.search_all(10).unwrap_err();
        match err {
            SearchError::QueryFailed { term, column, .. } => {
                assert_eq!(term, "(unclosed");
                assert_eq!(column, "French");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn best_effort_policy_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "French\n\"(unclosed\"\nsubsistance\n");
        let mut config = SearchConfig::default();
        config.failure_policy = FailurePolicy::BestEffort;
        let engine = SearchEngine::from_parts(
            Corpus::from_records(vec![case("1", "fre", "la subsistance des familles")]),
            queries,
            config,
        );

        let summaries = engine.search_all(10).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].query_word, "subsistance");
    }

    #[test]
    fn empty_cells_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let queries = load_queries(dir.path(), "English,French\nshelter,\n,abri\n");
        let engine = engine(
            vec![
                case("1", "eng", "shelter was refused"),
                case("2", "fre", "un abri pour la famille"),
            ],
            queries,
        );

        let summaries = engine.search_all(10).unwrap();
        assert_eq!(summaries.len(), 2);
        let words: Vec<&str> = summaries.iter().map(|s| s.query_word.as_str()).collect();
        assert_eq!(words, vec!["shelter", "abri"]);
    }
}
