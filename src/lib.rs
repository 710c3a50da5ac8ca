mod api;
mod core;
mod shared;
mod system;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use crate::core::translator::engine::engine_from_settings;
use crate::core::translator::types::{PanelLanguage, TranslatorState};
use crate::core::translator::{StateSink, TranslatorController};
use shared::emit::emit_event;
use shared::events::AppEvent;
use shared::settings::AppSettings;
use system::clipboard::SystemClipboard;
use system::window;

/// Production sink: every published state goes to all windows as an event
struct TauriStateSink {
    app: AppHandle,
}

impl StateSink for TauriStateSink {
    fn publish(&self, state: &TranslatorState) {
        emit_event(&self.app, AppEvent::TranslatorUpdated(state.clone()));
    }
}

/// Register (or re-register) the panel toggle hotkey. Unregisters
/// everything first so a settings change never leaves a stale binding.
pub(crate) fn register_panel_hotkey(app: &AppHandle, accelerator: &str) -> Result<(), String> {
    let shortcut: Shortcut = accelerator
        .parse()
        .map_err(|e| format!("Failed to parse hotkey '{}': {}", accelerator, e))?;

    if let Err(e) = app.global_shortcut().unregister_all() {
        // Fails when nothing was registered yet
        println!("[Hotkey] Unregister attempt: {}", e);
    }

    // Some other app may hold the combination briefly at login; retry
    // with exponential backoff before giving up.
    let max_retries = 5;
    let mut last_err = String::new();

    for attempt in 0..max_retries {
        let handle = app.clone();
        // Key repeat fires Pressed in bursts; one toggle per press
        let in_flight = Arc::new(AtomicBool::new(false));

        let result = app
            .global_shortcut()
            .on_shortcut(shortcut, move |_app, _shortcut, event| {
                if event.state() != ShortcutState::Pressed {
                    return;
                }
                if in_flight.swap(true, Ordering::Acquire) {
                    return;
                }

                let handle = handle.clone();
                let in_flight = in_flight.clone();
                tauri::async_runtime::spawn(async move {
                    if let Err(e) = window::toggle_panel(&handle) {
                        eprintln!("[Hotkey] Failed to toggle panel: {}", e);
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(250)).await;
                    in_flight.store(false, Ordering::Release);
                });
            });

        match result {
            Ok(()) => {
                println!("[Hotkey] Registered global hotkey: {}", accelerator);
                return Ok(());
            }
            Err(e) => {
                last_err = e.to_string();
                if attempt < max_retries - 1 {
                    let delay_ms = 100 * (2_u64.pow(attempt as u32));
                    eprintln!(
                        "[Hotkey] Registration attempt {} failed: {}. Retrying in {}ms...",
                        attempt + 1,
                        last_err,
                        delay_ms
                    );
                    std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                }
            }
        }
    }

    Err(format!(
        "Failed to register hotkey '{}' after {} attempts: {}",
        accelerator, max_retries, last_err
    ))
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // A second launch just brings the existing panel up
            if let Err(e) = window::show_panel(app) {
                eprintln!("[SingleInstance] Failed to show panel: {}", e);
            }
        }))
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            // Load settings up front; the hotkey and engine choice need them
            let settings = tauri::async_runtime::block_on(AppSettings::load()).unwrap_or_else(|e| {
                eprintln!("Failed to load settings, using defaults: {}", e);
                AppSettings::default()
            });

            // Menu-bar agent: no Dock icon, no space switching. Must happen
            // before the panel window exists.
            if let Err(e) = window::nswindow::set_app_activation_policy_accessory() {
                eprintln!("Failed to set accessory activation policy: {}", e);
            }

            let engine = engine_from_settings(&settings)?;
            let controller = TranslatorController::new(
                engine,
                Arc::new(SystemClipboard),
                Arc::new(TauriStateSink {
                    app: app.handle().clone(),
                }),
                PanelLanguage::from_code(&settings.preferences.source_lang),
            );
            app.manage(controller);

            window::create_panel_window(app.handle())?;

            // Tray menu
            let toggle_item =
                MenuItem::with_id(app, "toggle", "Toggle Translator", true, None::<&str>)?;
            let settings_item =
                MenuItem::with_id(app, "settings", "Open Settings File", true, None::<&str>)?;
            let separator = PredefinedMenuItem::separator(app)?;
            let quit_item = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
            let menu = Menu::with_items(
                app,
                &[&toggle_item, &separator, &settings_item, &separator, &quit_item],
            )?;

            let default_icon = app
                .default_window_icon()
                .ok_or("Failed to get default window icon")?;
            let _tray = TrayIconBuilder::new()
                .icon(default_icon.clone())
                .menu(&menu)
                .on_menu_event(|app, event| match event.id().as_ref() {
                    "toggle" => {
                        if let Err(e) = window::toggle_panel(app) {
                            eprintln!("[Tray] Failed to toggle panel: {}", e);
                        }
                    }
                    "settings" => {
                        use tauri_plugin_opener::OpenerExt;
                        match AppSettings::get_settings_path() {
                            Ok(path) => {
                                if let Err(e) =
                                    app.opener().open_path(path.to_string_lossy(), None::<&str>)
                                {
                                    eprintln!("[Tray] Failed to open settings file: {}", e);
                                }
                            }
                            Err(e) => eprintln!("[Tray] {}", e),
                        }
                    }
                    "quit" => {
                        app.exit(0);
                    }
                    _ => {}
                })
                .on_tray_icon_event(|tray, event| {
                    if let TrayIconEvent::Click { .. } = event {
                        if let Err(e) = window::toggle_panel(tray.app_handle()) {
                            eprintln!("[Tray] Failed to toggle panel: {}", e);
                        }
                    }
                })
                .build(app)?;

            if let Err(e) = register_panel_hotkey(app.handle(), &settings.hotkeys.toggle_translator)
            {
                // Not fatal: the tray menu still toggles the panel
                eprintln!("{}", e);
                eprintln!("Continuing without global hotkey. Use the tray menu instead.");
            }

            println!("[Zing] Translator ready (hotkey: {})", settings.hotkeys.toggle_translator);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Translator commands
            api::commands::translator::get_translator_state,
            api::commands::translator::set_source_text,
            api::commands::translator::swap_direction,
            api::commands::translator::copy_translation,
            api::commands::translator::paste_into_input,
            api::commands::translator::clear_input,
            api::commands::translator::reset_translator,
            // Panel commands
            api::commands::panel::show_panel,
            api::commands::panel::hide_panel,
            api::commands::panel::toggle_panel,
            // Settings commands
            api::commands::settings::get_settings,
            api::commands::settings::save_settings,
            api::commands::settings::log_message,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| {
            eprintln!("FATAL: Failed to start Tauri application: {}", e);
            eprintln!("Check system permissions and whether another instance is running.");
            std::process::exit(1);
        });
}
