//! Translator controller
//!
//! Owns all state the panel renders and turns raw keystrokes into a
//! rate-limited, cancellation-safe sequence of engine calls:
//!
//! 1. Every text change restarts a sliding debounce timer.
//! 2. When the timer fires with no newer change, one engine call dispatches.
//! 3. A monotonically increasing request sequence identifies the current
//!    call; any resolution whose token is no longer current is dropped
//!    without touching state ("last request wins", even when a slow call
//!    resolves after a fast later one).
//!
//! The engine call itself cannot be interrupted, so cancellation is
//! cooperative: stale work is discarded at resolution time.

pub mod engine;
pub mod types;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use tokio::time::sleep;

use crate::shared::error::AppResult;
use crate::system::clipboard::ClipboardAccess;
use engine::TranslationEngine;
use types::{TranslatorState, COPY_INDICATOR_RESET, TRANSLATE_DEBOUNCE};

/// Where published state goes. The production sink emits a Tauri event to
/// all windows; tests record snapshots.
pub trait StateSink: Send + Sync {
    fn publish(&self, state: &TranslatorState);
}

/// One instance per process lifetime, created in setup and shared via
/// `app.manage`. Hiding the panel never touches it, so typed text and
/// results survive hide/show cycles.
pub struct TranslatorController {
    state: Arc<Mutex<TranslatorState>>,
    /// Bumped on every edit, swap, or reset. A dispatched call captures the
    /// value at dispatch and only applies its result while still current.
    request_seq: Arc<AtomicU64>,
    /// Separate sequence for the copied-indicator timer so a second copy
    /// restarts the revert instead of stacking reversions.
    copy_seq: Arc<AtomicU64>,
    /// Behind a lock so a settings change can swap providers without
    /// tearing down the controller. In-flight calls keep the engine they
    /// started with.
    engine: Arc<RwLock<Arc<dyn TranslationEngine>>>,
    clipboard: Arc<dyn ClipboardAccess>,
    sink: Arc<dyn StateSink>,
    debounce: Duration,
    copy_reset: Duration,
}

impl TranslatorController {
    pub fn new(
        engine: Arc<dyn TranslationEngine>,
        clipboard: Arc<dyn ClipboardAccess>,
        sink: Arc<dyn StateSink>,
        initial: types::PanelLanguage,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(TranslatorState::new(initial))),
            request_seq: Arc::new(AtomicU64::new(0)),
            copy_seq: Arc::new(AtomicU64::new(0)),
            engine: Arc::new(RwLock::new(engine)),
            clipboard,
            sink,
            debounce: TRANSLATE_DEBOUNCE,
            copy_reset: COPY_INDICATOR_RESET,
        }
    }

    /// Get a clone for sharing across threads
    pub fn clone_arc(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            request_seq: Arc::clone(&self.request_seq),
            copy_seq: Arc::clone(&self.copy_seq),
            engine: Arc::clone(&self.engine),
            clipboard: Arc::clone(&self.clipboard),
            sink: Arc::clone(&self.sink),
            debounce: self.debounce,
            copy_reset: self.copy_reset,
        }
    }

    /// Replace the translation engine. Takes effect from the next
    /// dispatch; in-flight calls resolve against the old engine and are
    /// still subject to the usual token check.
    pub fn set_engine(&self, engine: Arc<dyn TranslationEngine>) {
        let mut guard = match self.engine.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = engine;
    }

    fn current_engine(&self) -> Arc<dyn TranslationEngine> {
        match self.engine.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, TranslatorState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                eprintln!("[Translator] State mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Read-only snapshot of the current state
    pub fn snapshot(&self) -> TranslatorState {
        self.lock_state().clone()
    }

    /// Called on every keystroke. Never blocks the caller: emptiness is
    /// handled synchronously, everything else goes through the debounce.
    pub fn set_source_text(&self, text: String) {
        let token = {
            let mut st = self.lock_state();
            if st.source_text == text {
                return;
            }
            st.source_text = text.clone();
            st.error_message = None;

            // Any previous pending or in-flight call is now superseded
            let token = self.request_seq.fetch_add(1, Ordering::SeqCst) + 1;

            if text.is_empty() {
                // Emptiness bypasses the debounce: no engine call, output
                // clears in the same mutation as the input.
                st.translated_text.clear();
                st.is_translating = false;
                self.sink.publish(&st);
                return;
            }

            self.sink.publish(&st);
            token
        };

        let ctrl = self.clone_arc();
        tokio::spawn(async move {
            sleep(ctrl.debounce).await;
            if ctrl.request_seq.load(Ordering::SeqCst) != token {
                return; // a newer edit restarted the debounce
            }
            ctrl.run_translation(token).await;
        });
    }

    async fn run_translation(&self, token: u64) {
        let (text, source, target) = {
            let mut st = self.lock_state();
            if self.request_seq.load(Ordering::SeqCst) != token {
                return;
            }
            st.is_translating = true;
            self.sink.publish(&st);
            (st.source_text.clone(), st.source_lang, st.target_lang)
        };

        let result = self.current_engine().translate(&text, source, target).await;

        let mut st = self.lock_state();
        if self.request_seq.load(Ordering::SeqCst) != token {
            // Superseded while we were waiting on the engine. Not an
            // error: the result is just stale, drop it silently.
            return;
        }
        st.is_translating = false;
        match result {
            Ok(translated) => {
                st.translated_text = translated;
                st.error_message = None;
            }
            Err(e) => {
                // Engine failures become a visible message and nothing
                // else; translated_text keeps its last good value.
                st.error_message = Some(e.to_string());
            }
        }
        self.sink.publish(&st);
    }

    /// Exchange the language direction and the two texts, so the
    /// just-translated output becomes the new input. Pure exchange: it
    /// does not schedule a re-translation, so two swaps with no edits in
    /// between restore the exact previous state.
    pub fn swap_direction(&self) {
        // An in-flight result would apply to the old direction; make sure
        // it can never land.
        self.request_seq.fetch_add(1, Ordering::SeqCst);

        let mut guard = self.lock_state();
        let st = &mut *guard;
        std::mem::swap(&mut st.source_lang, &mut st.target_lang);
        std::mem::swap(&mut st.source_text, &mut st.translated_text);
        st.error_message = None;
        st.is_translating = false;
        self.sink.publish(st);
    }

    /// Copy the translation to the clipboard and flash the copied
    /// indicator for a fixed interval. A second copy before the interval
    /// elapses restarts the timer.
    pub fn copy_translation(&self) -> AppResult<()> {
        let text = {
            let st = self.lock_state();
            if st.translated_text.is_empty() {
                return Ok(());
            }
            st.translated_text.clone()
        };

        self.clipboard.copy(&text)?;

        let ticket = self.copy_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut st = self.lock_state();
            st.is_copied = true;
            self.sink.publish(&st);
        }

        let ctrl = self.clone_arc();
        tokio::spawn(async move {
            sleep(ctrl.copy_reset).await;
            if ctrl.copy_seq.load(Ordering::SeqCst) != ticket {
                return; // a newer copy restarted the timer
            }
            let mut st = ctrl.lock_state();
            st.is_copied = false;
            ctrl.sink.publish(&st);
        });

        Ok(())
    }

    /// Clear the input field. Goes through the same path as typing an
    /// empty string so input and output can never desync.
    pub fn clear_input(&self) {
        self.set_source_text(String::new());
    }

    /// Replace the input with the current clipboard contents. A missing
    /// or non-text pasteboard is a no-op, not an error.
    pub fn paste_into_input(&self) -> AppResult<()> {
        if let Some(text) = self.clipboard.paste()? {
            self.set_source_text(text);
        }
        Ok(())
    }

    /// Clear everything back to initial values. Session boundaries only;
    /// hide/show does not call this. The language direction is kept.
    pub fn reset(&self) {
        self.request_seq.fetch_add(1, Ordering::SeqCst);
        self.copy_seq.fetch_add(1, Ordering::SeqCst);

        let mut st = self.lock_state();
        st.source_text.clear();
        st.translated_text.clear();
        st.error_message = None;
        st.is_translating = false;
        st.is_copied = false;
        self.sink.publish(&st);
    }
}
