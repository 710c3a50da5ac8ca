//! Translator command module
//!
//! Thin wrappers over the managed controller. All semantics (debounce,
//! cancellation, indicator timers) live in the controller; commands just
//! relay calls from the webview.

use tauri::State;

use crate::core::translator::types::TranslatorState;
use crate::core::translator::TranslatorController;
use crate::shared::error::AppResult;

/// Current state, for the webview to render on startup or reconnect
#[tauri::command]
pub async fn get_translator_state(
    controller: State<'_, TranslatorController>,
) -> AppResult<TranslatorState> {
    Ok(controller.snapshot())
}

/// Called on every keystroke in the input field
#[tauri::command]
pub async fn set_source_text(
    controller: State<'_, TranslatorController>,
    text: String,
) -> AppResult<()> {
    controller.set_source_text(text);
    Ok(())
}

#[tauri::command]
pub async fn swap_direction(controller: State<'_, TranslatorController>) -> AppResult<()> {
    controller.swap_direction();
    Ok(())
}

#[tauri::command]
pub async fn copy_translation(controller: State<'_, TranslatorController>) -> AppResult<()> {
    controller.copy_translation()
}

#[tauri::command]
pub async fn paste_into_input(controller: State<'_, TranslatorController>) -> AppResult<()> {
    controller.paste_into_input()
}

#[tauri::command]
pub async fn clear_input(controller: State<'_, TranslatorController>) -> AppResult<()> {
    controller.clear_input();
    Ok(())
}

#[tauri::command]
pub async fn reset_translator(controller: State<'_, TranslatorController>) -> AppResult<()> {
    controller.reset();
    Ok(())
}
