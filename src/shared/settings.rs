use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tauri::AppHandle;
use tokio::fs;
use ts_rs::TS;

use crate::shared::emit::emit_event;
use crate::shared::events::AppEvent;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "dist/types/settings.ts")]
pub struct AppSettings {
    pub hotkeys: HotkeySettings,
    pub api_keys: ApiKeys,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "dist/types/settings.ts")]
pub struct HotkeySettings {
    pub toggle_translator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "dist/types/settings.ts")]
pub struct ApiKeys {
    pub translation_provider: String,
    pub deepl_api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "dist/types/settings.ts")]
pub struct UserPreferences {
    pub source_lang: String,
    pub target_lang: String,
    pub theme: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            hotkeys: HotkeySettings {
                toggle_translator: "Shift+Alt+T".to_string(),
            },
            api_keys: ApiKeys {
                translation_provider: "google".to_string(),
                deepl_api_key: String::new(),
            },
            preferences: UserPreferences {
                source_lang: "ru".to_string(),
                target_lang: "en".to_string(),
                theme: "system".to_string(),
            },
        }
    }
}

const SECRET_MASK: &str = "********";

impl AppSettings {
    /// Copy with secrets replaced by a mask, safe to hand to the webview
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if !masked.api_keys.deepl_api_key.is_empty() {
            masked.api_keys.deepl_api_key = SECRET_MASK.to_string();
        }
        masked
    }

    /// Restore secrets the webview sent back still masked
    pub fn merge_secrets(&mut self, current: &AppSettings) {
        if self.api_keys.deepl_api_key == SECRET_MASK {
            self.api_keys.deepl_api_key = current.api_keys.deepl_api_key.clone();
        }
    }

    pub fn get_settings_path() -> Result<PathBuf, String> {
        ProjectDirs::from("com", "zing", "zing-translator")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| "Failed to determine config directory".to_string())
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::get_settings_path()?;

        if !path.exists() {
            let settings = Self::default();
            settings.save_to_disk().await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| format!("Failed to read settings file: {}", e))?;

        serde_json::from_str(&content).map_err(|e| format!("Failed to parse settings: {}", e))
    }

    /// Internal helper to save to disk without event emission
    async fn save_to_disk(&self) -> Result<(), String> {
        let path = Self::get_settings_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(&path, content)
            .await
            .map_err(|e| format!("Failed to write settings file: {}", e))
    }

    /// Save settings to disk and emit update event
    pub async fn save(&self, app: &AppHandle) -> Result<(), String> {
        self.save_to_disk().await?;

        emit_event(app, AppEvent::SettingsUpdated(self.clone()));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.hotkeys.toggle_translator, "Shift+Alt+T");
        assert_eq!(settings.api_keys.translation_provider, "google");
        assert_eq!(settings.preferences.source_lang, "ru");
        assert_eq!(settings.preferences.target_lang, "en");
    }

    #[test]
    fn test_secret_masking_roundtrip() {
        let mut stored = AppSettings::default();
        stored.api_keys.deepl_api_key = "real-key".to_string();

        let masked = stored.masked();
        assert_eq!(masked.api_keys.deepl_api_key, "********");

        // The webview echoes the mask back; the real key must survive
        let mut incoming = masked;
        incoming.merge_secrets(&stored);
        assert_eq!(incoming.api_keys.deepl_api_key, "real-key");
    }

    #[test]
    fn test_empty_secret_is_not_masked() {
        let settings = AppSettings::default();
        assert_eq!(settings.masked().api_keys.deepl_api_key, "");
    }

    #[test]
    fn test_roundtrip_json() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.hotkeys.toggle_translator, settings.hotkeys.toggle_translator);
    }
}
