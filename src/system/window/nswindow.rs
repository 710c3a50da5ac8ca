//! macOS NSWindow configuration for the non-activating floating panel
//!
//! Tauri creates a plain NSWindow; we reshape it so it behaves like a
//! Spotlight-style panel: shows over fullscreen apps, takes keystrokes,
//! and never steals the frontmost app's activation.
//!
//! Sequence matters:
//! 1. Window created hidden by Tauri
//! 2. Activation policy set to Accessory (before any show)
//! 3. Style mask, level and collection behavior applied while hidden
//! 4. Shown with orderFrontRegardless
//!
//! All AppKit calls run on the main thread.

#[cfg(target_os = "macos")]
use block::ConcreteBlock;
#[cfg(target_os = "macos")]
use cocoa::{
    appkit::NSWindowCollectionBehavior,
    base::{id, nil, YES},
};
#[cfg(target_os = "macos")]
use objc::{class, msg_send, sel, sel_impl};
#[cfg(target_os = "macos")]
use std::sync::{mpsc, Arc, Mutex};

// NSWindow.h constants. NSStatusWindowLevel sits above the menu bar and
// above fullscreen apps without going to screen-saver extremes.
#[cfg(target_os = "macos")]
const NS_STATUS_WINDOW_LEVEL: i64 = 25;

#[cfg(target_os = "macos")]
const NS_APPLICATION_ACTIVATION_POLICY_ACCESSORY: i64 = 1;

// NSWindowStyleMaskNonactivatingPanel
#[cfg(target_os = "macos")]
const NS_NONACTIVATING_PANEL_MASK: u64 = 1 << 7;

// CanJoinAllSpaces (0x1) | FullScreenAuxiliary (0x80)
#[cfg(target_os = "macos")]
const PANEL_COLLECTION_BEHAVIOR: u64 = (1 << 0) | (1 << 7);

/// Hide the app from the Dock and run as a background agent. Must be
/// called before any window is shown, otherwise activating the panel
/// forces a space switch.
#[cfg(target_os = "macos")]
pub fn set_app_activation_policy_accessory() -> Result<(), String> {
    unsafe {
        let ns_app: id = msg_send![class!(NSApplication), sharedApplication];
        if ns_app == nil {
            return Err("Failed to get NSApplication".to_string());
        }

        let current: i64 = msg_send![ns_app, activationPolicy];
        if current == NS_APPLICATION_ACTIVATION_POLICY_ACCESSORY {
            return Ok(());
        }

        let success: bool =
            msg_send![ns_app, setActivationPolicy: NS_APPLICATION_ACTIVATION_POLICY_ACCESSORY];
        if success {
            println!("[Panel] Activation policy set to Accessory");
            Ok(())
        } else {
            Err("Failed to set activation policy to Accessory".to_string())
        }
    }
}

/// Execute a closure on the main thread synchronously. Required for all
/// AppKit calls; running them off-thread is EXC_BAD_ACCESS territory.
#[cfg(target_os = "macos")]
fn run_on_main_thread<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    let is_main_thread = unsafe {
        let current_thread: id = msg_send![class!(NSThread), currentThread];
        let is_main: bool = msg_send![current_thread, isMainThread];
        is_main
    };

    if is_main_thread {
        f();
        return;
    }

    let (tx, rx) = mpsc::channel();
    // ConcreteBlock wants Fn, our closure is FnOnce
    let closure = Arc::new(Mutex::new(Some(f)));

    unsafe {
        let block = ConcreteBlock::new(move || {
            let mut guard = match closure.lock() {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(f) = guard.take() {
                f();
            }
            let _ = tx.send(());
        });
        let block = block.copy();

        let main_queue: id = msg_send![class!(NSOperationQueue), mainQueue];
        let _: () = msg_send![main_queue, addOperationWithBlock: block];
    }

    let _ = rx.recv();
}

/// Reshape the hidden Tauri window into a non-activating floating panel.
/// Call once in setup, while the window is still hidden.
#[cfg(target_os = "macos")]
pub fn configure_as_floating_panel(window: &tauri::WebviewWindow) -> Result<(), String> {
    let (tx, rx) = mpsc::channel();
    let window_clone = window.clone();

    run_on_main_thread(move || {
        let result = unsafe {
            match window_clone.ns_window() {
                Ok(ptr) => {
                    let ns_window = ptr as id;

                    let current_style: u64 = msg_send![ns_window, styleMask];
                    let _: () =
                        msg_send![ns_window, setStyleMask: current_style | NS_NONACTIVATING_PANEL_MASK];

                    let _: () = msg_send![ns_window, setLevel: NS_STATUS_WINDOW_LEVEL];

                    let behavior =
                        NSWindowCollectionBehavior::from_bits_truncate(PANEL_COLLECTION_BEHAVIOR);
                    let _: () = msg_send![ns_window, setCollectionBehavior: behavior];

                    let _: () = msg_send![ns_window, setHidesOnDeactivate: cocoa::base::NO];

                    let verified_level: i64 = msg_send![ns_window, level];
                    let verified_behavior: NSWindowCollectionBehavior =
                        msg_send![ns_window, collectionBehavior];
                    println!(
                        "[Panel] Configured floating panel: level={}, behavior=0x{:x}",
                        verified_level,
                        verified_behavior.bits()
                    );
                    Ok(())
                }
                Err(e) => Err(format!("Window handle not available: {}", e)),
            }
        };
        let _ = tx.send(result);
    });

    rx.recv()
        .map_err(|_| "Failed to receive panel configuration result".to_string())?
}

/// Order the panel front and give it keyboard focus without letting the
/// frontmost app lose activation.
#[cfg(target_os = "macos")]
pub fn show_panel_without_activating(window: &tauri::WebviewWindow) -> Result<(), String> {
    let (tx, rx) = mpsc::channel();
    let window_clone = window.clone();

    run_on_main_thread(move || {
        let result = unsafe {
            match window_clone.ns_window() {
                Ok(ptr) => {
                    let ns_window = ptr as id;

                    let _: () = msg_send![ns_window, orderFrontRegardless];

                    // Accessory policy makes this activation space-safe;
                    // without it the panel is visible but cannot take keys.
                    let ns_app: id = msg_send![class!(NSApplication), sharedApplication];
                    let _: () = msg_send![ns_app, activateIgnoringOtherApps: YES];
                    let _: () = msg_send![ns_window, makeKeyAndOrderFront: nil];

                    let is_visible: bool = msg_send![ns_window, isVisible];
                    if is_visible {
                        Ok(())
                    } else {
                        Err("Panel not visible after orderFrontRegardless".to_string())
                    }
                }
                Err(e) => Err(format!("Window handle not available: {}", e)),
            }
        };
        let _ = tx.send(result);
    });

    rx.recv()
        .map_err(|_| "Failed to receive panel show result".to_string())?
}

// Stubs so the crate builds on other platforms; the panel is macOS-only.

#[cfg(not(target_os = "macos"))]
pub fn set_app_activation_policy_accessory() -> Result<(), String> {
    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub fn configure_as_floating_panel(_window: &tauri::WebviewWindow) -> Result<(), String> {
    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub fn show_panel_without_activating(window: &tauri::WebviewWindow) -> Result<(), String> {
    window.show().map_err(|e| e.to_string())?;
    window.set_focus().map_err(|e| e.to_string())
}
