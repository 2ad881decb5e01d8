//! # Result Export Module
//!
//! ## Purpose
//! Writes aggregated summary records to CSV for downstream filtering and review.
//!
//! ## Input/Output Specification
//! - **Input**: Summary records from the aggregator
//! - **Output**: CSV file with columns `itemid`, `language`, `query_word`,
//!   `query_language`, `combined_context`, `match_count`, and optionally
//!   `THE_LAW`
//! - **Variants**: The reduced variant omits the full-text column to keep the
//!   output file manageable

use crate::corpus::FULLTEXT_COLUMN;
use crate::errors::{Result, SearchError};
use crate::SummaryRecord;
use std::path::Path;
use tracing::info;

/// Write summary records to `path`. `include_full_text` selects the full
/// variant carrying the law-text column; the default export omits it.
pub fn write_summaries<P: AsRef<Path>>(
    path: P,
    summaries: &[SummaryRecord],
    include_full_text: bool,
) -> Result<()> {
    let path = path.as_ref();
    let export_err = |e: csv::Error| SearchError::Export {
        path: path.display().to_string(),
        details: e.to_string(),
    };

    let mut writer = csv::Writer::from_path(path).map_err(export_err)?;

    let mut header = vec![
        "itemid",
        "language",
        "query_word",
        "query_language",
        "combined_context",
        "match_count",
    ];
    if include_full_text {
        header.push(FULLTEXT_COLUMN);
    }
    writer.write_record(&header).map_err(export_err)?;

    for summary in summaries {
        let mut fields = vec![
            summary.itemid.clone(),
            summary.language.clone().unwrap_or_default(),
            summary.query_word.clone(),
            summary.query_language.clone().unwrap_or_default(),
            summary.combined_context.clone(),
            summary.match_count.to_string(),
        ];
        if include_full_text {
            fields.push(summary.law_text.clone());
        }
        writer.write_record(&fields).map_err(export_err)?;
    }

    writer.flush().map_err(|e| SearchError::Export {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    info!(rows = summaries.len(), path = %path.display(), "results saved");
    Ok(())
}
