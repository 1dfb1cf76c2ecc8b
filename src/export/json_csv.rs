// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{get_headers, record_to_row};
use crate::export::notify_export_success;
use crate::models::record::Record;
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export JSON pretty-printed: an array of row objects.
pub(crate) fn export_json(rows: &[Record], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(rows)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Export CSV with a header row built from the union of all columns.
pub(crate) fn export_csv(rows: &[Record], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let headers = get_headers(rows);
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    if !headers.is_empty() {
        wtr.write_record(&headers)?;
    }
    for row in rows {
        wtr.write_record(record_to_row(row, &headers))?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
