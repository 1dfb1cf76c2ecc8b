use serde::{Deserialize, Serialize};

/// A staff annotation on one row of the loaded spreadsheet.
/// The title is stored redundantly so a bookmark stays readable after the
/// file it points into has been replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub index: usize,
    pub title: String,
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Input for batch creation; the timestamp is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewBookmark {
    pub index: usize,
    pub title: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewBookmark {
    pub fn new(index: usize, title: impl Into<String>, note: Option<String>) -> Self {
        Self {
            index,
            title: title.into(),
            note,
        }
    }
}
