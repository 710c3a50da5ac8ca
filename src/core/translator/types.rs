use serde::{Deserialize, Serialize};
use std::time::Duration;
use ts_rs::TS;

/// Quiet period after the last keystroke before a translation dispatches
pub const TRANSLATE_DEBOUNCE: Duration = Duration::from_millis(500);

/// How long the "Copied" indicator stays on after a copy
pub const COPY_INDICATOR_RESET: Duration = Duration::from_millis(1500);

/// The supported language pair. The panel is deliberately bilingual:
/// direction is a single flag toggled by swap, not a general language set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "dist/types/bindings.ts")]
pub enum PanelLanguage {
    Russian,
    English,
}

impl PanelLanguage {
    pub fn display_name(&self) -> &'static str {
        match self {
            PanelLanguage::Russian => "Russian",
            PanelLanguage::English => "English",
        }
    }

    pub fn iso(&self) -> isolang::Language {
        match self {
            PanelLanguage::Russian => isolang::Language::Rus,
            PanelLanguage::English => isolang::Language::Eng,
        }
    }

    /// ISO 639-1 code ("ru" / "en") as used by the translation engines
    pub fn code(&self) -> &'static str {
        self.iso().to_639_1().unwrap_or("en")
    }

    pub fn other(&self) -> Self {
        match self {
            PanelLanguage::Russian => PanelLanguage::English,
            PanelLanguage::English => PanelLanguage::Russian,
        }
    }

    /// Map a settings code to a panel language, defaulting to Russian
    pub fn from_code(code: &str) -> Self {
        match code {
            "en" | "eng" => PanelLanguage::English,
            _ => PanelLanguage::Russian,
        }
    }
}

/// Everything the panel renders. Published as a whole on every change so
/// the webview never has to stitch partial updates together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "dist/types/bindings.ts")]
pub struct TranslatorState {
    pub source_text: String,
    pub translated_text: String,
    pub source_lang: PanelLanguage,
    pub target_lang: PanelLanguage,
    pub is_translating: bool,
    pub is_copied: bool,
    pub error_message: Option<String>,
}

impl TranslatorState {
    pub fn new(source_lang: PanelLanguage) -> Self {
        Self {
            source_text: String::new(),
            translated_text: String::new(),
            source_lang,
            target_lang: source_lang.other(),
            is_translating: false,
            is_copied: false,
            error_message: None,
        }
    }
}

impl Default for TranslatorState {
    fn default() -> Self {
        Self::new(PanelLanguage::Russian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(PanelLanguage::Russian.code(), "ru");
        assert_eq!(PanelLanguage::English.code(), "en");
        assert_eq!(PanelLanguage::Russian.other(), PanelLanguage::English);
        assert_eq!(PanelLanguage::from_code("en"), PanelLanguage::English);
        assert_eq!(PanelLanguage::from_code("ru"), PanelLanguage::Russian);
        assert_eq!(PanelLanguage::from_code("??"), PanelLanguage::Russian);
    }

    #[test]
    fn test_initial_state() {
        let state = TranslatorState::default();
        assert_eq!(state.source_lang, PanelLanguage::Russian);
        assert_eq!(state.target_lang, PanelLanguage::English);
        assert!(state.source_text.is_empty());
        assert!(!state.is_translating);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn export_bindings() {
        // Triggers ts-rs to export TypeScript bindings for the webview
        use ts_rs::TS;
        PanelLanguage::export().expect("Failed to export PanelLanguage");
        TranslatorState::export().expect("Failed to export TranslatorState");
    }
}
