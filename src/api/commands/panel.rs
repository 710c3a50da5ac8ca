//! Panel command module

use crate::shared::error::{AppError, AppResult};
use crate::system::window;

#[tauri::command]
pub async fn show_panel(app: tauri::AppHandle) -> AppResult<()> {
    window::show_panel(&app).map_err(AppError::System)
}

/// Bound to Escape in the webview
#[tauri::command]
pub async fn hide_panel(app: tauri::AppHandle) -> AppResult<()> {
    window::hide_panel(&app).map_err(AppError::System)
}

#[tauri::command]
pub async fn toggle_panel(app: tauri::AppHandle) -> AppResult<()> {
    window::toggle_panel(&app).map_err(AppError::System)
}
