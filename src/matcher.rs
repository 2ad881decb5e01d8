//! # Matcher Module
//!
//! ## Purpose
//! Finds every corpus row whose law text contains a query term as a whole word
//! (or matching a supplied regex pattern) and builds one match record per row,
//! with its extracted context.
//!
//! ## Input/Output Specification
//! - **Input**: One query term, an optional language filter, a context radius
//! - **Output**: Match records in corpus iteration order, or per-row outcomes
//!   for callers that want explicit skip/failure visibility
//! - **Pattern**: Case-insensitive, wrapped in `\b...\b`; the term is
//!   literal-escaped or used as a raw regex depending on [`QueryMode`]
//!
//! ## Key Features
//! - Patterns compiled once per term and evaluated over the whole corpus
//! - Language filter: case-insensitive exact equality against the stored code
//! - Rows evaluated independently; a non-matching row never aborts the scan
//! - Rows with missing text are skipped silently

use crate::config::QueryMode;
use crate::context;
use crate::corpus::Corpus;
use crate::errors::{Result, SearchError};
use crate::{MatchRecord, RowOutcome};
use regex::{Regex, RegexBuilder};

/// A compiled word-boundary search pattern for one query term.
#[derive(Debug, Clone)]
pub struct TermPattern {
    term: String,
    regex: Regex,
}

impl TermPattern {
    /// Compile a query term into a case-insensitive word-boundary pattern.
    ///
    /// Under [`QueryMode::Literal`] regex metacharacters in the term are
    /// escaped; under [`QueryMode::Regex`] the term is used as written.
    pub fn compile(term: &str, mode: QueryMode) -> Result<Self> {
        let body = match mode {
            QueryMode::Literal => regex::escape(term),
            QueryMode::Regex => term.to_string(),
        };
        let pattern = format!(r"\b{}\b", body);
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| SearchError::InvalidPattern {
                term: term.to_string(),
                details: e.to_string(),
            })?;
        Ok(Self {
            term: term.to_string(),
            regex,
        })
    }

    /// The query term as given by the caller
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The compiled regex
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Per-row result of one matcher scan.
#[derive(Debug, Clone)]
pub struct RowScan {
    /// Case identifier of the scanned row
    pub itemid: String,
    /// What happened on this row
    pub outcome: RowOutcome,
}

/// Scans the corpus for one query term at a time.
pub struct Matcher<'a> {
    corpus: &'a Corpus,
    mode: QueryMode,
}

impl<'a> Matcher<'a> {
    pub fn new(corpus: &'a Corpus, mode: QueryMode) -> Self {
        Self { corpus, mode }
    }

    /// Search the corpus for `term`, returning match records in corpus order.
    ///
    /// Baseline behavior: any per-row failure aborts the search. Callers that
    /// want best-effort semantics can use [`Matcher::scan`] and filter outcomes
    /// themselves.
    pub fn search(
        &self,
        term: &str,
        language_filter: Option<&str>,
        radius: usize,
    ) -> Result<Vec<MatchRecord>> {
        let mut records = Vec::new();
        for scan in self.scan(term, language_filter, radius)? {
            match scan.outcome {
                RowOutcome::Matched(record) => records.push(record),
                RowOutcome::NoMatch | RowOutcome::SkippedMissingText => {}
                RowOutcome::Failed { reason } => {
                    return Err(SearchError::MatchFailed {
                        itemid: scan.itemid,
                        details: reason,
                    });
                }
            }
        }
        Ok(records)
    }

    /// Evaluate every (language-filtered) corpus row against `term`, reporting
    /// an explicit outcome per row.
    pub fn scan(
        &self,
        term: &str,
        language_filter: Option<&str>,
        radius: usize,
    ) -> Result<Vec<RowScan>> {
        let pattern = TermPattern::compile(term, self.mode)?;
        let filter = language_filter.map(str::to_lowercase);

        let mut scans = Vec::new();
        for record in self.corpus.records() {
            if let Some(wanted) = &filter {
                // exact equality on the lower-cased code, not substring
                let matches_language = record
                    .language
                    .as_deref()
                    .is_some_and(|code| code.to_lowercase() == *wanted);
                if !matches_language {
                    continue;
                }
            }

            if record.law_text.is_empty() {
                scans.push(RowScan {
                    itemid: record.itemid.clone(),
                    outcome: RowOutcome::SkippedMissingText,
                });
                continue;
            }

            let outcome = if pattern.regex().is_match(&record.law_text) {
                let context = context::extract(&record.law_text, &pattern, radius);
                RowOutcome::Matched(MatchRecord {
                    itemid: record.itemid.clone(),
                    language: record.language.clone(),
                    query_word: term.to_string(),
                    query_language: None,
                    context,
                    law_text: record.law_text.clone(),
                })
            } else {
                RowOutcome::NoMatch
            };

            scans.push(RowScan {
                itemid: record.itemid.clone(),
                outcome,
            });
        }

        Ok(scans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaseRecord;

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

    fn corpus(records: Vec<CaseRecord>) -> Corpus {
        Corpus::from_records(records)
    }

    #[test]
    fn whole_words_only() {
        let corpus = corpus(vec![
            case("1", "eng", "the lawful owner"),
            case("2", "eng", "the law of the land"),
        ]);
        let matcher = Matcher::new(&corpus, QueryMode::Literal);
        let records = matcher.search("law", None, 5).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].itemid, "2");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let corpus = corpus(vec![case("1", "eng", "DESTITUTION was alleged")]);
        let matcher = Matcher::new(&corpus, QueryMode::Literal);
        let records = matcher.search("destitution", None, 5).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].context.contains("**DESTITUTION**"));
    }

    #[test]
    fn language_filter_is_exact_and_case_insensitive() {
        let corpus = corpus(vec![
            case("1", "ENG", "subsistence farming"),
            case("2", "fre", "moyens de subsistance"),
            case("3", "fre-b", "subsistence notes"),
        ]);
        let matcher = Matcher::new(&corpus, QueryMode::Literal);

        let eng = matcher.search("subsistence", Some("eng"), 5).unwrap();
        assert_eq!(eng.len(), 1);
        assert_eq!(eng[0].itemid, "1");

        // "fre-b" must not match a "fre" filter by substring
        let fre = matcher.search("subsistence", Some("FRE"), 5).unwrap();
        assert!(fre.is_empty());
    }

    #[test]
    fn literal_mode_escapes_metacharacters() {
        let corpus = corpus(vec![case("1", "fre", "le moyen retenu")]);

        // under regex interpretation "." is a wildcard and "mo.en" hits "moyen"
        let as_regex = Matcher::new(&corpus, QueryMode::Regex);
        assert_eq!(as_regex.search("mo.en", None, 5).unwrap().len(), 1);

        // under literal interpretation the "." is escaped and nothing matches
        let as_literal = Matcher::new(&corpus, QueryMode::Literal);
        assert!(as_literal.search("mo.en", None, 5).unwrap().is_empty());
    }

    #[test]
    fn regex_mode_honors_optional_groups() {
        let corpus = corpus(vec![
            case("1", "fre", "la perte des moyens de subsistance de la famille"),
            case("2", "fre", "assurer sa subsistance quotidienne"),
        ]);
        let matcher = Matcher::new(&corpus, QueryMode::Regex);
        let records = matcher
            .search("(moyens de)? subsistance", Some("fre"), 5)
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn malformed_regex_reports_the_term() {
        let corpus = corpus(vec![case("1", "eng", "text")]);
        let matcher = Matcher::new(&corpus, QueryMode::Regex);
        let err = matcher.search("(unclosed", None, 5).unwrap_err();
        match err {
            SearchError::InvalidPattern { term, .. } => assert_eq!(term, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scan_reports_missing_text_and_no_match() {
        let corpus = corpus(vec![
            case("1", "eng", ""),
            case("2", "eng", "nothing relevant"),
            case("3", "eng", "shelter was provided"),
        ]);
        let matcher = Matcher::new(&corpus, QueryMode::Literal);
        let scans = matcher.scan("shelter", None, 5).unwrap();
        assert_eq!(scans.len(), 3);
        assert!(matches!(scans[0].outcome, RowOutcome::SkippedMissingText));
        assert!(matches!(scans[1].outcome, RowOutcome::NoMatch));
        assert!(matches!(scans[2].outcome, RowOutcome::Matched(_)));
    }

    #[test]
    fn results_follow_corpus_order() {
        let corpus = corpus(vec![
            case("b", "eng", "shelter here"),
            case("a", "eng", "shelter there"),
        ]);
        let matcher = Matcher::new(&corpus, QueryMode::Literal);
        let records = matcher.search("shelter", None, 5).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.itemid.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
