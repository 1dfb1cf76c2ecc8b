// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{get_headers, record_to_row};
use crate::export::notify_export_success;
use crate::models::record::Record;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet};
use serde_json::Value;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

pub(crate) const SHEET_NAME: &str = "Sheet1";

/// Widest a column is allowed to grow when auto-sizing (intro texts run long).
const MAX_COLUMN_WIDTH: usize = 60;

/// Single-sheet workbook: header row, then one row per record. Numbers and
/// booleans keep their cell type.
pub(crate) fn export_xlsx(rows: &[Record], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let headers = get_headers(rows);

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_with_format(0, col_index(col)?, header.as_str(), &header_format)?;
    }

    if !headers.is_empty() {
        worksheet.set_freeze_panes(1, 0).ok();
    }

    let mut col_widths: Vec<usize> = headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    for (row_index, record) in rows.iter().enumerate() {
        let row = u32::try_from(row_index + 1)
            .map_err(|_| AppError::Export("too many rows for one sheet".into()))?;

        for (col, header) in headers.iter().enumerate() {
            let col16 = col_index(col)?;
            match record.get(header) {
                Some(value) => write_cell(worksheet, row, col16, value)?,
                None => {
                    worksheet.write(row, col16, "")?;
                }
            }
        }

        for (col, text) in record_to_row(record, &headers).iter().enumerate() {
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(text.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet.set_column_width(col_index(c)?, (*w).min(MAX_COLUMN_WIDTH) as f64 + 2.0)?;
    }

    workbook.save(path)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> AppResult<()> {
    match value {
        Value::Null => {
            worksheet.write(row, col, "")?;
        }
        Value::Bool(b) => {
            worksheet.write(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                worksheet.write(row, col, f)?;
            }
            None => {
                worksheet.write(row, col, n.to_string())?;
            }
        },
        Value::String(s) => {
            worksheet.write(row, col, s.as_str())?;
        }
        other => {
            worksheet.write(row, col, other.to_string())?;
        }
    }
    Ok(())
}

fn col_index(col: usize) -> AppResult<u16> {
    u16::try_from(col).map_err(|_| AppError::Export("too many columns for one sheet".into()))
}
