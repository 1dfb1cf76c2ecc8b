// src/export/model.rs

use crate::errors::{AppError, AppResult};
use crate::models::record::{Record, fields, value_text};

/// Value of the `include` column for rows kept in the ranking.
pub const INCLUDED_TOKEN: &str = "收录";
/// Value of the `include` column for rows left out.
pub const EXCLUDED_TOKEN: &str = "排除";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Keep excluded rows (tagged `排除`) instead of dropping them.
    pub keep_excluded: bool,
}

/// Rows to write: each gains an `include` column, and excluded rows are dropped
/// unless `keep_excluded` is set.
pub fn export_rows(
    records: &[Record],
    flags: &[bool],
    options: ExportOptions,
) -> AppResult<Vec<Record>> {
    if records.len() != flags.len() {
        return Err(AppError::Export(format!(
            "{} records but {} include flags",
            records.len(),
            flags.len()
        )));
    }

    Ok(records
        .iter()
        .zip(flags)
        .filter(|(_, included)| options.keep_excluded || **included)
        .map(|(record, included)| {
            let mut row = record.clone();
            let token = if *included {
                INCLUDED_TOKEN
            } else {
                EXCLUDED_TOKEN
            };
            row.set(fields::INCLUDE, token);
            row
        })
        .collect())
}

/// Union of column names across rows, in first-seen order.
pub(crate) fn get_headers(rows: &[Record]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

/// A row as display strings, aligned on `headers` (missing cells → "").
pub(crate) fn record_to_row(row: &Record, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| row.get(h).map(value_text).unwrap_or_default())
        .collect()
}
