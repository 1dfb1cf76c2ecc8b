//! What an uploaded spreadsheet is, as told by its file name.

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SequentialBoard {
    #[serde(rename = "vocaloid-monthly")]
    Monthly,
    #[serde(rename = "vocaloid-weekly")]
    Weekly,
    #[serde(rename = "vocaloid-daily")]
    Daily,
}

impl SequentialBoard {
    /// Wire value used by the ranking API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SequentialBoard::Monthly => "vocaloid-monthly",
            SequentialBoard::Weekly => "vocaloid-weekly",
            SequentialBoard::Daily => "vocaloid-daily",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SequentialBoard::Monthly => "月刊",
            SequentialBoard::Weekly => "周刊",
            SequentialBoard::Daily => "日刊",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Part {
    Main,
    New,
}

impl Part {
    pub fn as_str(&self) -> &'static str {
        match self {
            Part::Main => "main",
            Part::New => "new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Part::Main => "主榜",
            Part::New => "新曲榜",
        }
    }
}

/// Which ranking issue a ranking file belongs to.
///
/// A malformed date in the file name leaves `date` and `issue` empty; the
/// error only surfaces when [`BoardIdentity::issue`] is asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardIdentity {
    pub board: SequentialBoard,
    pub part: Part,
    pub date_text: String,
    pub date: Option<NaiveDate>,
    #[serde(rename = "issue")]
    pub(crate) issue_number: Option<i64>,
}

impl BoardIdentity {
    pub fn issue(&self) -> AppResult<i64> {
        self.issue_number
            .ok_or_else(|| AppError::InvalidDate(self.date_text.clone()))
    }
}

/// Which calendar day a snapshot file covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataIdentity {
    pub date_text: String,
    #[serde(rename = "date")]
    pub(crate) parsed: Option<NaiveDate>,
}

impl DataIdentity {
    pub fn date(&self) -> AppResult<NaiveDate> {
        self.parsed
            .ok_or_else(|| AppError::InvalidDate(self.date_text.clone()))
    }

    /// `yyyy-MM-dd`, the format the snapshot endpoint expects.
    pub fn date_string(&self) -> AppResult<String> {
        Ok(self.date()?.format("%Y-%m-%d").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileIdentity {
    Board(BoardIdentity),
    Data(DataIdentity),
}

impl FileIdentity {
    pub fn as_board(&self) -> Option<&BoardIdentity> {
        match self {
            FileIdentity::Board(b) => Some(b),
            FileIdentity::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&DataIdentity> {
        match self {
            FileIdentity::Data(d) => Some(d),
            FileIdentity::Board(_) => None,
        }
    }

    /// Fails if the date embedded in the name could not be parsed.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            FileIdentity::Board(b) => b.issue().map(|_| ()),
            FileIdentity::Data(d) => d.date().map(|_| ()),
        }
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileIdentity::Board(b) => {
                let issue = b
                    .issue_number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string());
                write!(
                    f,
                    "{} ({}) / {} ({}) / issue #{}",
                    b.board.label(),
                    b.board.as_str(),
                    b.part.label(),
                    b.part.as_str(),
                    issue
                )
            }
            FileIdentity::Data(d) => match d.parsed {
                Some(date) => write!(f, "snapshot data for {}", date.format("%Y-%m-%d")),
                None => write!(f, "snapshot data with unreadable date '{}'", d.date_text),
            },
        }
    }
}
