//! Upload a ranking or data workbook and trigger the matching server job.
//!
//! Board files (`2024-07.xlsx`, `新曲2024-07-06.xlsx`, `20240701与20240630.xlsx`)
//! are checked and then fed to the streaming ranking update. Data files
//! (`20240701.xlsx`) only refresh the snapshot for their date. The name is
//! classified and validated before any network call.

use crate::api::client::{ApiClient, CheckReport, UploadReceipt};
use crate::api::events::{self, CancelHandle, JobStream};
use crate::core::filename::classify;
use crate::errors::{AppError, AppResult};
use crate::models::identity::{BoardIdentity, DataIdentity, FileIdentity};
use serde_json::Value;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// The server calls the upload flow needs. [`ApiClient`] is the real one.
pub trait RankingBackend {
    fn upload_file(&self, path: &Path) -> AppResult<UploadReceipt>;
    fn check_file(&self, board: &str, part: &str, issue: i64) -> AppResult<CheckReport>;
    fn update_ranking(
        &self,
        board: &str,
        part: &str,
        issue: i64,
        old: bool,
        cancel: CancelHandle,
    ) -> AppResult<JobStream<Box<dyn BufRead + Send>>>;
    fn update_snapshot(&self, date: &str, old: bool) -> AppResult<Value>;
}

impl RankingBackend for ApiClient {
    fn upload_file(&self, path: &Path) -> AppResult<UploadReceipt> {
        ApiClient::upload_file(self, path)
    }

    fn check_file(&self, board: &str, part: &str, issue: i64) -> AppResult<CheckReport> {
        ApiClient::check_file(self, board, part, issue)
    }

    fn update_ranking(
        &self,
        board: &str,
        part: &str,
        issue: i64,
        old: bool,
        cancel: CancelHandle,
    ) -> AppResult<JobStream<Box<dyn BufRead + Send>>> {
        ApiClient::update_ranking(self, board, part, issue, old, cancel)
    }

    fn update_snapshot(&self, date: &str, old: bool) -> AppResult<Value> {
        ApiClient::update_snapshot(self, date, old)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Stop after the pre-update check (board files) or after the upload (data files).
    pub check_only: bool,
    /// Ask the server to process with its legacy pipeline.
    pub old: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Board {
        url: Option<String>,
        identity: BoardIdentity,
        issue: i64,
        /// Completion message of the ranking job; `None` when only checked.
        completion: Option<String>,
    },
    Data {
        url: Option<String>,
        date: String,
        updated: bool,
    },
}

#[derive(Debug, Clone)]
pub struct UploadPlan {
    pub path: PathBuf,
    pub identity: FileIdentity,
}

impl UploadPlan {
    /// Classify `path` by its file name. Fails on anything that is not an
    /// `.xlsx` file or whose embedded date does not parse.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::InvalidFileName(path.display().to_string()))?;

        if !file_name.ends_with(".xlsx") {
            return Err(AppError::InvalidFileName(format!(
                "{file_name}: only .xlsx files can be uploaded"
            )));
        }

        let identity = classify(file_name);
        identity.validate()?;

        Ok(Self {
            path: path.to_path_buf(),
            identity,
        })
    }

    /// Upload the file, then run the follow-up job for its kind.
    pub fn execute<B, F>(
        &self,
        backend: &B,
        options: UploadOptions,
        cancel: CancelHandle,
        on_progress: F,
    ) -> AppResult<UploadOutcome>
    where
        B: RankingBackend + ?Sized,
        F: FnMut(&str),
    {
        let receipt = backend.upload_file(&self.path)?;
        match &self.identity {
            FileIdentity::Board(board) => {
                run_board(backend, board, receipt.url, options, cancel, on_progress)
            }
            FileIdentity::Data(data) => run_data(backend, data, receipt.url, options),
        }
    }
}

/// Check, then stream the ranking update. A non-empty check detail aborts
/// before the update starts.
pub fn run_board<B, F>(
    backend: &B,
    identity: &BoardIdentity,
    url: Option<String>,
    options: UploadOptions,
    cancel: CancelHandle,
    on_progress: F,
) -> AppResult<UploadOutcome>
where
    B: RankingBackend + ?Sized,
    F: FnMut(&str),
{
    let issue = identity.issue()?;
    let board = identity.board.as_str();
    let part = identity.part.as_str();

    let report = backend.check_file(board, part, issue)?;
    if !report.is_clean() {
        return Err(AppError::CheckRejected(report.detail));
    }

    let completion = if options.check_only {
        None
    } else {
        let stream = backend.update_ranking(board, part, issue, options.old, cancel)?;
        Some(events::drive(stream, on_progress)?)
    };

    Ok(UploadOutcome::Board {
        url,
        identity: identity.clone(),
        issue,
        completion,
    })
}

pub fn run_data<B>(
    backend: &B,
    identity: &DataIdentity,
    url: Option<String>,
    options: UploadOptions,
) -> AppResult<UploadOutcome>
where
    B: RankingBackend + ?Sized,
{
    let date = identity.date_string()?;
    if !options.check_only {
        backend.update_snapshot(&date, options.old)?;
    }

    Ok(UploadOutcome::Data {
        url,
        date,
        updated: !options.check_only,
    })
}
