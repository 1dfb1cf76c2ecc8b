//! Spreadsheet decoding.
//!
//! Only the first sheet is read. Its first row names the columns; every
//! following non-blank row becomes a [`Record`] carrying all columns, with
//! missing cells filled by an empty string.

use crate::errors::{AppError, AppResult};
use crate::models::record::Record;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Header given to columns whose title cell is blank.
const EMPTY_HEADER: &str = "__EMPTY";

pub fn read_file(path: &Path) -> AppResult<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Decode an xlsx/xls/ods payload into row records, preserving row order.
pub fn decode_workbook(bytes: &[u8]) -> AppResult<Vec<Record>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Spreadsheet("workbook contains no sheets".into()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers = header_names(header_row);

    let mut records = Vec::new();
    for row in rows {
        if row.iter().all(is_blank) {
            continue;
        }

        let mut record = Record::new();
        for (col, name) in headers.iter().enumerate() {
            let value = row
                .get(col)
                .map(cell_value)
                .unwrap_or_else(|| Value::String(String::new()));
            record.set(name.clone(), value);
        }
        records.push(record);
    }

    Ok(records)
}

/// Column titles from the header row; blanks become `__EMPTY` and repeated
/// titles get `_1`, `_2`, ... appended.
fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(row.len());

    for cell in row {
        let text = cell.to_string();
        let base = if text.trim().is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            text
        };

        let name = match seen.get_mut(&base) {
            Some(count) => {
                let name = format!("{base}_{count}");
                *count += 1;
                name
            }
            None => base.clone(),
        };
        seen.entry(base).or_insert(1);
        names.push(name);
    }

    names
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::String(String::new()),
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => float_value(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(e.to_string()),
    }
}

/// Integral floats (ids, counts) are kept as integers so they print without `.0`.
fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Value::from(f as i64)
    } else {
        Value::from(f)
    }
}

/// Decoding on a dedicated thread: one request in, one terminal reply out.
///
/// There is no progress and no cancellation; [`ParseTask::wait`] receives the
/// reply and tears the worker down.
pub struct ParseTask {
    reply: Receiver<AppResult<Vec<Record>>>,
    worker: JoinHandle<()>,
}

impl ParseTask {
    pub fn spawn(bytes: Vec<u8>) -> AppResult<Self> {
        let (tx, reply) = mpsc::sync_channel(1);
        let worker = thread::Builder::new()
            .name("xlsx-decode".into())
            .spawn(move || {
                // The receiver may already be gone; nothing left to report to then.
                let _ = tx.send(decode_workbook(&bytes));
            })?;

        Ok(Self { reply, worker })
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        Self::spawn(read_file(path)?)
    }

    pub fn wait(self) -> AppResult<Vec<Record>> {
        let reply = self.reply.recv();
        let joined = self.worker.join();

        match (reply, joined) {
            (Ok(result), _) => result,
            (Err(_), Err(_)) => Err(AppError::Ingest("decoder thread panicked".into())),
            (Err(_), Ok(())) => Err(AppError::Ingest("decoder exited without a reply".into())),
        }
    }
}
