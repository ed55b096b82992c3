use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::bookmark::DEFAULT_PAGE_SIZE;

/// Top-level configuration container, persisted as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub store: StoreSettings,
    pub listing: ListingSettings,
    pub logging: LoggingSettings,
}

/// Where the SQLite file lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "mybookmarks.db".to_string(),
        }
    }
}

/// Shortest store timeout honoured; lower configured values are raised to it.
pub const MIN_STORE_TIMEOUT_SECS: u64 = 1;

/// Bounds applied to every store interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreSettings {
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl StoreSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_STORE_TIMEOUT_SECS))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListingSettings {
    pub page_size: i64,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `tracing` filter directive used when `RUST_LOG` is not set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "mybookmarks=info".to_string(),
        }
    }
}
