// MyBookmarks state managers
// Managers translate decided operations into store calls: bookmarks, categories, uniqueness checks, users.

pub mod bookmark_manager;
pub mod category_manager;
pub mod uniqueness_checker;
pub mod user_manager;
