use tauri::{AppHandle, Emitter};

use super::events::AppEvent;

/// Emit an application event to all windows
///
/// The AppEvent enum encapsulates both the event name (via serde rename)
/// and its payload, but Tauri's emit takes the name as a plain string, so
/// we dispatch manually here.
pub fn emit_event(app: &AppHandle, event: AppEvent) {
    match &event {
        AppEvent::TranslatorUpdated(state) => {
            if let Err(e) = app.emit("translator://updated", state) {
                eprintln!("Failed to emit translator update: {}", e);
            }
        }
        AppEvent::SettingsUpdated(settings) => {
            if let Err(e) = app.emit("settings://updated", settings) {
                eprintln!("Failed to emit settings update: {}", e);
            }
        }
        AppEvent::PanelVisibilityChanged(visible) => {
            if let Err(e) = app.emit("panel://visibility-changed", visible) {
                eprintln!("Failed to emit panel visibility: {}", e);
            }
        }
    }
}
