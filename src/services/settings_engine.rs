// Persistent ChatKing configuration, kept as one pretty-printed JSON file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ChatKingSettings;

/// Environment variable overriding the settings file location.
pub const CONFIG_PATH_ENV: &str = "CHATKING_CONFIG";

pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ChatKingSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ChatKingSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

pub struct SettingsEngine {
    config_path: String,
    settings: ChatKingSettings,
}

impl SettingsEngine {
    /// Path: `path_override`, then `$CHATKING_CONFIG`, then
    /// `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| {
                platform::get_config_dir()
                    .join("settings.json")
                    .to_string_lossy()
                    .to_string()
            });

        Self {
            config_path,
            settings: ChatKingSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file means defaults; a file that does not parse is an error.
    fn load(&mut self) -> Result<ChatKingSettings, SettingsError> {
        self.settings = match fs::read_to_string(&self.config_path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                SettingsError::SerializationError(format!("{}: {}", self.config_path, e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.config_path, "no settings file, using defaults");
                ChatKingSettings::default()
            }
            Err(e) => {
                return Err(SettingsError::IoError(format!(
                    "reading {}: {}",
                    self.config_path, e
                )))
            }
        };
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);
        let io_err = |what: &str, e: std::io::Error| {
            SettingsError::IoError(format!("{} {}: {}", what, path.display(), e))
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| io_err("creating directory for", e))?;
        }
        let body = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        fs::write(path, body).map_err(|e| io_err("writing", e))
    }

    fn get_settings(&self) -> &ChatKingSettings {
        &self.settings
    }

    /// Sets one value by dotted path (`search.safe_search`) and saves.
    /// The key must already exist and the result must still decode.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let parts: Vec<&str> = key.split('.').collect();

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        {
            let mut current = &mut json_value;
            for (i, part) in parts.iter().enumerate() {
                let map = match current {
                    serde_json::Value::Object(map) => map,
                    _ => {
                        return Err(SettingsError::InvalidKey(format!(
                            "Cannot navigate to key '{}': intermediate value is not an object",
                            key
                        )));
                    }
                };
                let not_found =
                    || SettingsError::InvalidKey(format!("Key '{}' not found in settings", key));
                if i == parts.len() - 1 {
                    let slot = map.get_mut(*part).ok_or_else(not_found)?;
                    *slot = value.clone();
                    break;
                }
                current = map.get_mut(*part).ok_or_else(not_found)?;
            }
        }

        // Round-trip through the typed struct to validate the new value
        let new_settings: ChatKingSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        self.save()?;
        debug!(key, "setting updated");

        Ok(())
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ChatKingSettings::default();
        self.save()?;
        Ok(())
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
