use serde::{Deserialize, Serialize};

use super::category::CategoryId;

/// Store-assigned identifier of a bookmark.
pub type BookmarkId = i64;

/// Page size used when no listing settings are supplied.
pub const DEFAULT_PAGE_SIZE: i64 = 30;

/// Represents a saved bookmark as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub name: String,
    pub url: String,
    /// Category name, empty when the bookmark is uncategorized.
    pub category: String,
    /// 1-based display position within the owner's list.
    pub seq: i64,
}

/// The user-editable fields of a bookmark, as submitted for add or edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub category: String,
}

impl BookmarkDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            category: category.into(),
        }
    }

    /// True when `bookmark` already holds exactly these values.
    pub fn matches(&self, bookmark: &Bookmark) -> bool {
        self.name == bookmark.name
            && self.url == bookmark.url
            && self.category.trim() == bookmark.category
    }
}

/// Which bookmarks a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Uncategorized,
    Category(CategoryId),
}

impl CategoryFilter {
    /// Decodes the wire form: `-1` for all, `0` for uncategorized, otherwise a category id.
    pub fn from_wire(value: i64) -> Self {
        match value {
            -1 => CategoryFilter::All,
            0 => CategoryFilter::Uncategorized,
            id => CategoryFilter::Category(id),
        }
    }
}

/// A bookmark column that must be unique per owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Name,
    Url,
}

impl UniqueField {
    pub fn column(self) -> &'static str {
        match self {
            UniqueField::Name => "name",
            UniqueField::Url => "url",
        }
    }
}

/// An inclusive block of sequence positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqRange {
    pub start: i64,
    pub end: i64,
}

impl SeqRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Every position strictly after `seq`.
    pub fn after(seq: i64) -> Self {
        Self {
            start: seq + 1,
            end: i64::MAX,
        }
    }

    pub fn contains(&self, seq: i64) -> bool {
        self.start <= seq && seq <= self.end
    }
}
