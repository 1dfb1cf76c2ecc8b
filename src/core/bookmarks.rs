//! Bookmarks over the rows of the loaded file.
//!
//! The collection stays sorted by index with at most one entry per index, and
//! every mutation writes the whole collection through the injected
//! [`BookmarkPersistence`].

use crate::errors::{AppError, AppResult};
use crate::models::bookmark::{Bookmark, NewBookmark};
use crate::ui::messages::warning;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

/// Where the serialized bookmark collection lives between runs.
pub trait BookmarkPersistence {
    /// The stored JSON document, or `None` when nothing was saved yet.
    fn load(&self) -> AppResult<Option<String>>;
    fn save(&mut self, json: &str) -> AppResult<()>;
}

/// Keeps the document in memory; for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryBookmarkPersistence {
    pub document: Option<String>,
    pub writes: usize,
}

impl BookmarkPersistence for MemoryBookmarkPersistence {
    fn load(&self) -> AppResult<Option<String>> {
        Ok(self.document.clone())
    }

    fn save(&mut self, json: &str) -> AppResult<()> {
        self.document = Some(json.to_string());
        self.writes += 1;
        Ok(())
    }
}

pub struct BookmarkStore<P: BookmarkPersistence> {
    bookmarks: Vec<Bookmark>,
    persistence: P,
}

impl<P: BookmarkPersistence> BookmarkStore<P> {
    /// Hydrate from storage. Missing data starts an empty store; unreadable data
    /// is reported and also starts empty.
    pub fn open(persistence: P) -> AppResult<Self> {
        let bookmarks = match persistence.load()? {
            Some(json) => match serde_json::from_str::<Vec<Bookmark>>(&json) {
                Ok(mut list) => {
                    normalize(&mut list);
                    list
                }
                Err(e) => {
                    warning(format!("Stored bookmarks are unreadable, starting empty: {e}"));
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self {
            bookmarks,
            persistence,
        })
    }

    pub fn all(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bookmark> {
        self.position(index).ok().map(|pos| &self.bookmarks[pos])
    }

    pub fn is_bookmarked(&self, index: usize) -> bool {
        self.position(index).is_ok()
    }

    /// Returns `false` (and changes nothing) if `index` is already bookmarked.
    pub fn add(&mut self, index: usize, title: &str, note: Option<String>) -> AppResult<bool> {
        let Err(pos) = self.position(index) else {
            return Ok(false);
        };
        self.bookmarks.insert(pos, new_bookmark(index, title, note));
        self.persist()?;
        Ok(true)
    }

    /// Returns whether a bookmark was removed.
    pub fn remove(&mut self, index: usize) -> AppResult<bool> {
        let Ok(pos) = self.position(index) else {
            return Ok(false);
        };
        self.bookmarks.remove(pos);
        self.persist()?;
        Ok(true)
    }

    /// Remove if present, add otherwise. Returns whether `index` is now bookmarked.
    pub fn toggle(&mut self, index: usize, title: &str, note: Option<String>) -> AppResult<bool> {
        if self.is_bookmarked(index) {
            self.remove(index)?;
            Ok(false)
        } else {
            self.add(index, title, note)
        }
    }

    /// Returns `false` when `index` has no bookmark.
    pub fn update_note(&mut self, index: usize, note: &str) -> AppResult<bool> {
        let Ok(pos) = self.position(index) else {
            return Ok(false);
        };
        self.bookmarks[pos].note = Some(note.to_string());
        self.persist()?;
        Ok(true)
    }

    /// Add every entry whose index is free; returns how many were added.
    pub fn add_batch(&mut self, entries: &[NewBookmark]) -> AppResult<usize> {
        let mut added = 0;
        for entry in entries {
            if let Err(pos) = self.position(entry.index) {
                self.bookmarks
                    .insert(pos, new_bookmark(entry.index, &entry.title, entry.note.clone()));
                added += 1;
            }
        }
        if added > 0 {
            self.persist()?;
        }
        Ok(added)
    }

    pub fn clear(&mut self) -> AppResult<()> {
        self.bookmarks.clear();
        self.persist()
    }

    /// Pretty-printed JSON array of the whole collection.
    pub fn export_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.bookmarks)?)
    }

    /// Replace the collection with `document`, but only when every element has a
    /// numeric `index` and a string `title`. Otherwise nothing changes.
    pub fn import_json(&mut self, document: &str) -> AppResult<usize> {
        let mut imported = parse_import(document)?;
        normalize(&mut imported);
        let count = imported.len();
        self.bookmarks = imported;
        self.persist()?;
        Ok(count)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn into_persistence(self) -> P {
        self.persistence
    }

    fn position(&self, index: usize) -> Result<usize, usize> {
        self.bookmarks.binary_search_by_key(&index, |b| b.index)
    }

    fn persist(&mut self) -> AppResult<()> {
        let json = serde_json::to_string(&self.bookmarks)?;
        self.persistence.save(&json)
    }
}

/// `bookmarks_YYYY-MM-DD.json`
pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("bookmarks_{}.json", date.format("%Y-%m-%d"))
}

fn new_bookmark(index: usize, title: &str, note: Option<String>) -> Bookmark {
    Bookmark {
        index,
        title: title.to_string(),
        timestamp: Utc::now().timestamp_millis(),
        note,
    }
}

fn parse_import(document: &str) -> AppResult<Vec<Bookmark>> {
    let value: Value = serde_json::from_str(document)
        .map_err(|e| AppError::InvalidBookmarks(format!("not valid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(AppError::InvalidBookmarks("expected a JSON array".into()));
    };

    items
        .iter()
        .enumerate()
        .map(|(pos, item)| parse_item(item).ok_or_else(|| {
            AppError::InvalidBookmarks(format!(
                "element {pos} needs a non-negative integer `index` and a string `title`"
            ))
        }))
        .collect()
}

fn parse_item(item: &Value) -> Option<Bookmark> {
    let index = parse_index(item.get("index")?)?;
    let title = item.get("title")?.as_str()?.to_string();
    let timestamp = item.get("timestamp").and_then(Value::as_i64).unwrap_or(0);
    let note = item.get("note").and_then(Value::as_str).map(str::to_string);

    Some(Bookmark {
        index,
        title,
        timestamp,
        note,
    })
}

/// A non-negative integral number; `3.0` counts, `3.5` and `-1` do not.
fn parse_index(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 || f < 0.0 || f > usize::MAX as f64 {
        return None;
    }
    Some(f as usize)
}

/// Sort by index and keep the first entry for each index.
fn normalize(list: &mut Vec<Bookmark>) {
    list.sort_by_key(|b| b.index);
    list.dedup_by_key(|b| b.index);
}
