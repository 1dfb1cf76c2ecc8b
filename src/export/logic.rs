// src/export/logic.rs

use crate::core::bookmarks::{BookmarkPersistence, BookmarkStore};
use crate::core::session::MarkingSession;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{ExportOptions, export_rows};
use crate::export::notify_export_success;
use crate::export::xlsx::export_xlsx;
use crate::models::record::Record;
use crate::ui::messages::{info, warning};
use std::fs;
use std::path::Path;

/// High-level export entry points used by the CLI.
pub struct ExportLogic;

impl ExportLogic {
    /// Write the session's rows with their include column. Returns the number of
    /// rows written.
    pub fn export_session(
        session: &MarkingSession,
        options: ExportOptions,
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<usize> {
        ensure_writable(path, force)?;

        let rows = export_rows(session.records(), session.include_flags(), options)?;
        if rows.is_empty() {
            warning("No rows left to export; writing an empty document.");
        }

        Self::write_rows(&rows, format, path)?;
        Ok(rows.len())
    }

    pub fn write_rows(rows: &[Record], format: ExportFormat, path: &Path) -> AppResult<()> {
        match format {
            ExportFormat::Xlsx => export_xlsx(rows, path),
            ExportFormat::Csv => export_csv(rows, path),
            ExportFormat::Json => export_json(rows, path),
        }
    }

    pub fn export_bookmarks<P: BookmarkPersistence>(
        store: &BookmarkStore<P>,
        path: &Path,
        force: bool,
    ) -> AppResult<usize> {
        ensure_writable(path, force)?;
        info(format!("Exporting bookmarks to: {}", path.display()));

        fs::write(path, store.export_json()?)?;

        notify_export_success("Bookmarks", path);
        Ok(store.len())
    }

    /// Replace the store's bookmarks with the document at `path`; a rejected
    /// document leaves the store untouched.
    pub fn import_bookmarks<P: BookmarkPersistence>(
        store: &mut BookmarkStore<P>,
        path: &Path,
    ) -> AppResult<usize> {
        let document = fs::read_to_string(path)?;
        store.import_json(&document)
    }
}
