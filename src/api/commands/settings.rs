//! Settings command module
//!
//! Persistence plus frontend logging. Secrets cross the webview boundary
//! masked; the stored value is merged back in before saving.

use serde::Deserialize;
use tauri::State;

use crate::core::translator::engine::engine_from_settings;
use crate::core::translator::TranslatorController;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;

/// Get current application settings (masked secrets)
#[tauri::command]
pub async fn get_settings() -> AppResult<AppSettings> {
    let settings = AppSettings::load().await.map_err(AppError::Io)?;
    Ok(settings.masked())
}

/// Save application settings. Hotkey and engine changes take effect
/// immediately, no restart.
#[tauri::command]
pub async fn save_settings(
    app: tauri::AppHandle,
    controller: State<'_, TranslatorController>,
    mut settings: AppSettings,
) -> AppResult<()> {
    let current = AppSettings::load().await.map_err(AppError::Io)?;
    settings.merge_secrets(&current);

    settings.save(&app).await.map_err(AppError::Io)?;

    if settings.hotkeys.toggle_translator != current.hotkeys.toggle_translator {
        crate::register_panel_hotkey(&app, &settings.hotkeys.toggle_translator)
            .map_err(AppError::System)?;
    }

    if settings.api_keys != current.api_keys {
        controller.set_engine(engine_from_settings(&settings)?);
        println!(
            "[Settings] Translation engine rebuilt: {}",
            settings.api_keys.translation_provider
        );
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
}

/// Log a message from the frontend
#[tauri::command]
pub async fn log_message(request: LogRequest) -> AppResult<()> {
    println!("[{}] {}", request.level.to_uppercase(), request.message);
    Ok(())
}
