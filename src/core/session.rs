//! In-memory marking session: every ingested row plus one include flag per row.
//!
//! All mutation goes through [`MarkingSession`]. `load` is the only operation
//! that changes the number of records, and it keeps the flag vector the same
//! length.

use crate::core::ingest::ParseTask;
use crate::errors::{AppError, AppResult};
use crate::export::model::INCLUDED_TOKEN;
use crate::models::record::{Record, fields};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Standard marking works on full song metadata; SV mode on the reduced
/// chart/copyright set of the secondary chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkingMode {
    #[default]
    Standard,
    Sv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Waiting,
    Loading,
    Loaded,
}

#[derive(Debug, Clone)]
pub struct MarkingSession {
    mode: MarkingMode,
    status: SessionStatus,
    records: Vec<Record>,
    include: Vec<bool>,
    page: usize,
    page_size: usize,
}

impl Default for MarkingSession {
    fn default() -> Self {
        Self::new(MarkingMode::Standard, DEFAULT_PAGE_SIZE)
    }
}

impl MarkingSession {
    pub fn new(mode: MarkingMode, page_size: usize) -> Self {
        Self {
            mode,
            status: SessionStatus::Waiting,
            records: Vec::new(),
            include: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replace the whole session. Flags are derived before anything is swapped in.
    pub fn load(&mut self, records: Vec<Record>) {
        let include = infer_include_flags(&records, self.mode);
        self.records = records;
        self.include = include;
        self.page = 1;
        self.status = SessionStatus::Loaded;
    }

    /// Wait for a decode and load its rows. On failure the session keeps what
    /// it held before the upload started.
    pub fn load_from(&mut self, task: ParseTask) -> AppResult<usize> {
        let previous = self.status;
        self.status = SessionStatus::Loading;

        match task.wait() {
            Ok(records) => {
                let count = records.len();
                self.load(records);
                Ok(count)
            }
            Err(e) => {
                self.status = previous;
                Err(e)
            }
        }
    }

    /// Rows `[(page-1)*size, page*size)`; pages past the end yield an empty slice.
    pub fn page(&self, page_number: usize, page_size: usize) -> &[Record] {
        if page_number == 0 || page_size == 0 {
            return &[];
        }
        let start = (page_number - 1)
            .saturating_mul(page_size)
            .min(self.records.len());
        let end = start.saturating_add(page_size).min(self.records.len());
        &self.records[start..end]
    }

    pub fn current_page(&self) -> &[Record] {
        self.page(self.page, self.page_size)
    }

    /// Index of the first row on the current page.
    pub fn page_offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(self.page_size)
    }

    pub fn set_page(&mut self, page: usize) -> AppResult<()> {
        let total = self.page_count();
        if page < 1 || page > total {
            return Err(AppError::InvalidPage { page, total });
        }
        self.page = page;
        Ok(())
    }

    /// Move to the page holding `index` and return that page number.
    pub fn jump_to(&mut self, index: usize) -> AppResult<usize> {
        self.check_index(index)?;
        self.page = index / self.page_size + 1;
        Ok(self.page)
    }

    pub fn set_include(&mut self, index: usize, value: bool) -> AppResult<()> {
        self.check_index(index)?;
        self.include[index] = value;
        Ok(())
    }

    pub fn set_all_included(&mut self, value: bool) {
        self.include.iter_mut().for_each(|flag| *flag = value);
    }

    /// Replace one row wholesale with an edited field set.
    pub fn update_record(&mut self, index: usize, record: Record) -> AppResult<()> {
        self.check_index(index)?;
        self.records[index] = record;
        Ok(())
    }

    /// Edit a single field by building the new row and replacing the old one.
    pub fn update_field(
        &mut self,
        index: usize,
        field: &str,
        value: impl Into<Value>,
    ) -> AppResult<()> {
        self.check_index(index)?;
        let mut edited = self.records[index].clone();
        edited.set(field, value);
        self.update_record(index, edited)
    }

    /// Indices of rows whose title, producer, vocalist, bvid or index contain
    /// `query`, ignoring case. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.records
            .iter()
            .enumerate()
            .filter(|(index, record)| search_text(record, *index).contains(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn include_flags(&self) -> &[bool] {
        &self.include
    }

    pub fn is_included(&self, index: usize) -> Option<bool> {
        self.include.get(index).copied()
    }

    pub fn included_count(&self) -> usize {
        self.include.iter().filter(|f| **f).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn mode(&self) -> MarkingMode {
        self.mode
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    fn check_index(&self, index: usize) -> AppResult<()> {
        if index >= self.records.len() {
            return Err(AppError::InvalidIndex {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}

/// Initial include flags. The first record decides which rule applies to all rows:
///
/// 1. SV mode, first row has an `include` value: included iff `include == "收录"`.
/// 2. SV mode otherwise: everything included.
/// 3. Standard mode, first row has a `status`: included iff status is `auto` or `done`.
/// 4. Otherwise: included iff the row names a synthesizer.
pub fn infer_include_flags(records: &[Record], mode: MarkingMode) -> Vec<bool> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    match mode {
        MarkingMode::Sv if first.is_truthy(fields::INCLUDE) => records
            .iter()
            .map(|r| r.text(fields::INCLUDE) == INCLUDED_TOKEN)
            .collect(),
        MarkingMode::Sv => vec![true; records.len()],
        MarkingMode::Standard if first.is_truthy(fields::STATUS) => records
            .iter()
            .map(|r| matches!(r.text(fields::STATUS).as_str(), "auto" | "done"))
            .collect(),
        MarkingMode::Standard => records
            .iter()
            .map(|r| r.is_truthy(fields::SYNTHESIZER))
            .collect(),
    }
}

fn search_text(record: &Record, index: usize) -> String {
    format!(
        "{} {} {} {} {}",
        record.text(fields::TITLE),
        record.text(fields::PRODUCER),
        record.text(fields::VOCALIST),
        record.text(fields::BVID),
        index
    )
    .to_lowercase()
}
