// MyBookmarks Settings Engine
// Loads, saves and updates the JSON configuration file (database path, store
// timeout, page size, log filter).

use std::fs;
use std::path::Path;

use crate::types::errors::SettingsError;
use crate::types::settings::Settings;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "MYBOOKMARKS_CONFIG";
/// Environment variable overriding `database.path`.
pub const DATABASE_PATH_ENV: &str = "MYBOOKMARKS_DB";

const DEFAULT_CONFIG_FILE: &str = "mybookmarks.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<Settings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &Settings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: Settings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise uses `$MYBOOKMARKS_CONFIG`, falling back to `mybookmarks.json`
    /// in the working directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        Self {
            config_path,
            settings: Settings::default(),
        }
    }

    /// Environment overrides apply to what `load` returns, never to what `save` writes.
    fn apply_env_overrides(settings: &mut Settings) {
        if let Ok(path) = std::env::var(DATABASE_PATH_ENV) {
            if !path.trim().is_empty() {
                settings.database.path = path;
            }
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file, with environment overrides applied.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<Settings, SettingsError> {
        let path = Path::new(&self.config_path);

        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

            self.settings = serde_json::from_str(&content).map_err(|e| {
                SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
            })?;
        } else {
            tracing::debug!(path = %self.config_path, "config file not found, using defaults");
            self.settings = Settings::default();
        }

        let mut effective = self.settings.clone();
        Self::apply_env_overrides(&mut effective);
        Ok(effective)
    }

    /// Writes the current settings as pretty JSON, creating the parent
    /// directory on first save.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| SettingsError::IoError(format!("{}: {}", dir.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("{}: {}", self.config_path, e)))
    }

    fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Sets one leaf such as `store.timeout_secs` and saves.
    ///
    /// Only existing leaves can be set, and the result must still deserialize
    /// into [`Settings`], so `listing.page_size = "many"` is refused.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut tree = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        let pointer = format!("/{}", key.replace('.', "/"));
        match tree.pointer_mut(&pointer) {
            Some(slot) if !slot.is_object() => *slot = value,
            _ => return Err(SettingsError::InvalidKey(key.to_string())),
        }

        self.settings = serde_json::from_value(tree)
            .map_err(|e| SettingsError::InvalidValue(format!("{}: {}", key, e)))?;
        tracing::info!(key, path = %self.config_path, "setting updated");
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = Settings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
