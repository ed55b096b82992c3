use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a user. Every bookmark and category is scoped to one.
pub type UserId = i64;

/// A provisioned account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    /// Usernames are stored trimmed and lower-cased.
    pub fn normalize_username(username: &str) -> String {
        username.trim().to_lowercase()
    }
}
