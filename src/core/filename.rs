//! Classify an uploaded spreadsheet by its file name.
//!
//! | name shape                    | result         | date part   |
//! |-------------------------------|----------------|-------------|
//! | one `-`                       | monthly board  | `yyyy-MM`   |
//! | two or more `-`               | weekly board   | `yyyy-MM-dd`|
//! | no `-`, contains `与`         | daily board    | `yyyyMMdd` before `与` |
//! | anything else                 | snapshot data  | `yyyyMMdd`  |
//!
//! Parsing never fails here: a bad date is carried inside the identity and
//! reported when the issue/date is read.

use crate::core::issue::{close_anchor, whole_periods};
use crate::models::board::BasicSection;
use crate::models::identity::{BoardIdentity, DataIdentity, FileIdentity, Part, SequentialBoard};
use chrono::{Datelike, NaiveDate, NaiveTime};

/// Marks a new-track ranking file on monthly and weekly names.
const NEW_TRACK_PREFIX: &str = "新曲";
/// Marks a new-track ranking file on daily names.
const NEW_TRACK_DAILY_PREFIX: &str = "新曲榜";
/// Separates the two days a daily ranking compares.
const DAILY_SEPARATOR: char = '与';

pub fn classify(file_name: &str) -> FileIdentity {
    let name = file_name.strip_suffix(".xlsx").unwrap_or(file_name);
    let hyphens = name.matches('-').count();

    if hyphens == 1 {
        FileIdentity::Board(monthly(name))
    } else if hyphens > 1 {
        FileIdentity::Board(weekly(name))
    } else if name.contains(DAILY_SEPARATOR) {
        FileIdentity::Board(daily(name))
    } else {
        FileIdentity::Data(DataIdentity {
            date_text: name.to_string(),
            parsed: parse_compact_date(name),
        })
    }
}

fn monthly(name: &str) -> BoardIdentity {
    let (part, date_text) = split_part(name, NEW_TRACK_PREFIX);
    let date = NaiveDate::parse_from_str(&format!("{date_text}-01"), "%Y-%m-%d").ok();
    let issue = date.map(|d| i64::from(d.year() - 2024) * 12 + i64::from(d.month()) - 6);

    BoardIdentity {
        board: SequentialBoard::Monthly,
        part,
        date_text: date_text.to_string(),
        date,
        issue_number: issue,
    }
}

fn weekly(name: &str) -> BoardIdentity {
    let (part, date_text) = split_part(name, NEW_TRACK_PREFIX);
    let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").ok();
    let issue = date.map(|d| periods_since(d, BasicSection::Weekly));

    BoardIdentity {
        board: SequentialBoard::Weekly,
        part,
        date_text: date_text.to_string(),
        date,
        issue_number: issue,
    }
}

fn daily(name: &str) -> BoardIdentity {
    let (part, rest) = split_part(name, NEW_TRACK_DAILY_PREFIX);
    let date_text = rest.split(DAILY_SEPARATOR).next().unwrap_or_default();
    let date = parse_compact_date(date_text);
    let issue = date.map(|d| periods_since(d, BasicSection::Daily));

    BoardIdentity {
        board: SequentialBoard::Daily,
        part,
        date_text: date_text.to_string(),
        date,
        issue_number: issue,
    }
}

fn split_part<'a>(name: &'a str, prefix: &str) -> (Part, &'a str) {
    match name.strip_prefix(prefix) {
        Some(rest) => (Part::New, rest),
        None => (Part::Main, name),
    }
}

/// `yyyyMMdd`, exactly eight digits.
fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").ok()
}

/// Whole periods between the section's issue-0 close and midnight of `date`.
fn periods_since(date: NaiveDate, section: BasicSection) -> i64 {
    whole_periods(close_anchor(section), date.and_time(NaiveTime::MIN), section)
}
