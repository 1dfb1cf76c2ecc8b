use crate::core::issue::{end_time_of, issue_now, start_time_of};
use crate::errors::{AppError, AppResult};
use crate::utils::date::now_local;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Publication cycle of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Daily,
    Weekly,
    Monthly,
    Special,
}

/// Sections whose issues are bound to a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicSection {
    Daily,
    Weekly,
    Monthly,
}

impl BasicSection {
    pub const ALL: [BasicSection; 3] = [
        BasicSection::Daily,
        BasicSection::Weekly,
        BasicSection::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BasicSection::Daily => "daily",
            BasicSection::Weekly => "weekly",
            BasicSection::Monthly => "monthly",
        }
    }
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Daily => "daily",
            Section::Weekly => "weekly",
            Section::Monthly => "monthly",
            Section::Special => "special",
        }
    }

    /// `None` for `special`, which has no time window.
    pub fn basic(&self) -> Option<BasicSection> {
        match self {
            Section::Daily => Some(BasicSection::Daily),
            Section::Weekly => Some(BasicSection::Weekly),
            Section::Monthly => Some(BasicSection::Monthly),
            Section::Special => None,
        }
    }
}

impl From<BasicSection> for Section {
    fn from(s: BasicSection) -> Self {
        match s {
            BasicSection::Daily => Section::Daily,
            BasicSection::Weekly => Section::Weekly,
            BasicSection::Monthly => Section::Monthly,
        }
    }
}

impl FromStr for Section {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Section::Daily),
            "weekly" => Ok(Section::Weekly),
            "monthly" => Ok(Section::Monthly),
            "special" => Ok(Section::Special),
            other => Err(AppError::InvalidBoard(format!("unknown section '{other}'"))),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue numbers for every time-bounded section at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IssueSet {
    pub daily: i64,
    pub weekly: i64,
    pub monthly: i64,
}

impl IssueSet {
    pub fn get(&self, section: BasicSection) -> i64 {
        match section {
            BasicSection::Daily => self.daily,
            BasicSection::Weekly => self.weekly,
            BasicSection::Monthly => self.monthly,
        }
    }

    /// Shift every section by the same number of issues.
    pub fn offset(&self, by: i64) -> Self {
        Self {
            daily: self.daily + by,
            weekly: self.weekly + by,
            monthly: self.monthly + by,
        }
    }
}

/// A board together with the issue being looked at,
/// e.g. `vocaloid-weekly-new` issue 12.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub name: String,
    pub section: Section,
    pub part: String,
    pub issue: i64,
}

impl Board {
    /// Parse `name-section[-part]`. Without an explicit issue the board points to
    /// the issue currently open (or issue 1 for `special`).
    pub fn new(board_id: &str, issue: Option<i64>) -> AppResult<Self> {
        Self::at(board_id, issue, now_local())
    }

    /// Same as [`Board::new`], resolving the default issue at `now`.
    pub fn at(board_id: &str, issue: Option<i64>, now: NaiveDateTime) -> AppResult<Self> {
        let mut items = board_id.splitn(3, '-');
        let name = items
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::InvalidBoard(board_id.to_string()))?;
        let section: Section = items
            .next()
            .ok_or_else(|| AppError::InvalidBoard(format!("missing section in '{board_id}'")))?
            .parse()?;
        let part = items
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or("main")
            .to_string();

        let issue = match (issue, section.basic()) {
            (Some(n), _) => n,
            (None, None) => 1,
            (None, Some(basic)) => issue_now(now).get(basic),
        };

        Ok(Self {
            name: name.to_string(),
            section,
            part,
            issue,
        })
    }

    /// Board pointing at "latest" (issue -1), as the API expects.
    pub fn latest(board_id: &str) -> AppResult<Self> {
        let mut board = Self::new(board_id, None)?;
        board.issue = -1;
        Ok(board)
    }

    pub fn id(&self) -> String {
        format!("{}-{}", self.name, self.section)
    }

    pub fn full_id(&self) -> String {
        format!("{}-{}-{}", self.name, self.section, self.part)
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.section
            .basic()
            .map(|section| start_time_of(self.issue, section))
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.section
            .basic()
            .map(|section| end_time_of(self.issue, section))
    }

    pub fn display_name(&self) -> String {
        let title = match self.section {
            Section::Daily => "日刊虚拟歌手外语排行榜",
            Section::Weekly => "周刊虚拟歌手外语排行榜",
            Section::Monthly => "月刊虚拟歌手外语排行榜",
            Section::Special => "专题虚拟歌手外语排行榜",
        };
        format!("{title} #{}", self.issue)
    }

    /// `yyyy-MM-dd HH:mm——yyyy-MM-dd HH:mm`, or `None` for `special` boards.
    pub fn rank_date_range(&self) -> Option<String> {
        const FMT: &str = "%Y-%m-%d %H:%M";
        let start = self.start_time()?;
        let end = self.end_time()?;
        Some(format!("{}——{}", start.format(FMT), end.format(FMT)))
    }
}
