use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a category.
pub type CategoryId = i64;

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_LEN: usize = 15;

/// Labels the UI uses for its built-in views; users cannot create categories with these names.
pub const RESERVED_CATEGORY_NAMES: [&str; 2] = ["All Bookmarks", "Uncategorized"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_CATEGORY_NAMES.contains(&name)
}

pub fn exceeds_length_limit(name: &str) -> bool {
    name.chars().count() > MAX_CATEGORY_LEN
}

/// A category together with the number of bookmarks currently filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub id: CategoryId,
    pub category: String,
    pub count: i64,
}

/// Result of resolving a submitted category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedCategory {
    /// Blank input: the bookmark is uncategorized.
    None,
    /// Longer than [`MAX_CATEGORY_LEN`]; nothing was looked up or created.
    TooLong,
    /// One of [`RESERVED_CATEGORY_NAMES`]; nothing was looked up or created.
    Reserved,
    /// Found or freshly created.
    Existing(CategoryId),
}

impl ResolvedCategory {
    /// The id to store on the bookmark, `None` meaning uncategorized.
    pub fn id(self) -> Option<CategoryId> {
        match self {
            ResolvedCategory::Existing(id) => Some(id),
            _ => None,
        }
    }
}
