//! Vocabulary used when reviewing a record: copyright codes, song types,
//! SV chart codes and the tag lists stored in single cells.

use crate::core::session::MarkingMode;
use crate::models::record::{Record, fields};
use serde::Serialize;

/// Separator between names inside one cell, e.g. `初音ミク、鏡音リン`.
pub const TAG_SEPARATOR: char = '、';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Copyright {
    Original,
    Repost,
    OriginalAlt,
    RepostAsOriginal,
    OriginalAsRepost,
}

impl Copyright {
    pub const ALL: [Copyright; 5] = [
        Copyright::Original,
        Copyright::Repost,
        Copyright::OriginalAlt,
        Copyright::RepostAsOriginal,
        Copyright::OriginalAsRepost,
    ];

    pub fn code(&self) -> i64 {
        match self {
            Copyright::Original => 1,
            Copyright::Repost => 2,
            Copyright::OriginalAlt => 3,
            Copyright::RepostAsOriginal => 101,
            Copyright::OriginalAsRepost => 100,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Copyright::Original => "自制",
            Copyright::Repost => "转载",
            Copyright::OriginalAlt => "自制（3）",
            Copyright::RepostAsOriginal => "转载投自制",
            Copyright::OriginalAsRepost => "自制投转载",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SongType {
    Original,
    Cover,
    Remake,
    Medley,
}

impl SongType {
    pub const ALL: [SongType; 4] = [
        SongType::Original,
        SongType::Cover,
        SongType::Remake,
        SongType::Medley,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SongType::Original => "原创",
            SongType::Cover => "翻唱",
            SongType::Remake => "本家重置",
            SongType::Medley => "串烧",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s.trim())
    }
}

/// Charts an SV-mode row can be filed under; stored as codes in `synthesizer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SvChart {
    Sv,
    Domestic,
    Utau,
}

impl SvChart {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(SvChart::Sv),
            "2" => Some(SvChart::Domestic),
            "3" => Some(SvChart::Utau),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SvChart::Sv => "SV榜",
            SvChart::Domestic => "国产榜",
            SvChart::Utau => "UTAU榜",
        }
    }
}

/// Split a `、`-separated cell, dropping empty pieces. Surrounding blanks are kept
/// so that [`has_stray_whitespace`] can still flag them.
pub fn split_tags(cell: &str) -> Vec<String> {
    cell.split(TAG_SEPARATOR)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    let mut out = String::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push(TAG_SEPARATOR);
        }
        out.push_str(tag.as_ref());
    }
    out
}

/// Leading or trailing blanks in a name almost always mean a copy/paste slip.
pub fn has_stray_whitespace(tag: &str) -> bool {
    !tag.is_empty() && tag.trim() != tag
}

/// Tags in `cell` with leading or trailing blanks.
pub fn suspicious_tags(cell: &str) -> Vec<String> {
    split_tags(cell)
        .into_iter()
        .filter(|t| has_stray_whitespace(t))
        .collect()
}

/// Link to the video behind a record. Standard rows carry a bvid, SV rows an aid.
pub fn video_url(record: &Record, mode: MarkingMode) -> Option<String> {
    let id = match mode {
        MarkingMode::Standard => {
            let bvid = record.text(fields::BVID);
            if bvid.is_empty() {
                let aid = record.text(fields::AID);
                if aid.is_empty() {
                    return None;
                }
                format!("av{aid}")
            } else {
                bvid
            }
        }
        MarkingMode::Sv => {
            let aid = record.text(fields::AID);
            if aid.is_empty() {
                return None;
            }
            format!("av{aid}")
        }
    };
    Some(format!("https://www.bilibili.com/video/{id}"))
}
