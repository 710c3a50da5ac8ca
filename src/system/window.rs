//! Panel window lifecycle
//!
//! One borderless translucent window, created hidden at startup and
//! toggled by the global hotkey. Hiding never tears the window down, so
//! toggling is instant and translator state survives across shows.

pub mod nswindow;

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::shared::emit::emit_event;
use crate::shared::events::AppEvent;

pub const PANEL_LABEL: &str = "translator-panel";

const PANEL_WIDTH: f64 = 420.0;
const PANEL_HEIGHT: f64 = 260.0;

/// Create the panel hidden and reshape it into a floating panel. Called
/// once from setup; the window then lives for the process lifetime.
pub fn create_panel_window(app: &AppHandle) -> Result<(), String> {
    if app.get_webview_window(PANEL_LABEL).is_some() {
        return Ok(());
    }

    let window = WebviewWindowBuilder::new(app, PANEL_LABEL, WebviewUrl::App("index.html".into()))
        .title("Translator")
        .inner_size(PANEL_WIDTH, PANEL_HEIGHT)
        .resizable(false)
        .decorations(false)
        .transparent(true)
        .always_on_top(true)
        .skip_taskbar(true)
        .visible(false)
        .center()
        .build()
        .map_err(|e| format!("Failed to create panel window: {}", e))?;

    nswindow::configure_as_floating_panel(&window)?;

    println!("[Panel] Created hidden panel window ({}x{})", PANEL_WIDTH, PANEL_HEIGHT);
    Ok(())
}

pub fn show_panel(app: &AppHandle) -> Result<(), String> {
    let window = app
        .get_webview_window(PANEL_LABEL)
        .ok_or_else(|| format!("Window not found: {}", PANEL_LABEL))?;

    nswindow::show_panel_without_activating(&window)?;
    emit_event(app, AppEvent::PanelVisibilityChanged(true));
    Ok(())
}

/// Hide only. Translator state is deliberately left untouched.
pub fn hide_panel(app: &AppHandle) -> Result<(), String> {
    let window = app
        .get_webview_window(PANEL_LABEL)
        .ok_or_else(|| format!("Window not found: {}", PANEL_LABEL))?;

    window.hide().map_err(|e| format!("Failed to hide panel: {}", e))?;
    emit_event(app, AppEvent::PanelVisibilityChanged(false));
    Ok(())
}

pub fn toggle_panel(app: &AppHandle) -> Result<(), String> {
    let window = app
        .get_webview_window(PANEL_LABEL)
        .ok_or_else(|| format!("Window not found: {}", PANEL_LABEL))?;

    if window.is_visible().unwrap_or(false) {
        hide_panel(app)
    } else {
        show_panel(app)
    }
}
