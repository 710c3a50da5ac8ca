//! Translation engines
//!
//! The engine is the only network-facing boundary of the translator. Two
//! implementations are provided: the unofficial Google Translate endpoint
//! (free, no key, the default) and DeepL (API key from the environment or
//! the system keychain). Response parsing is kept in pure functions so it
//! can be tested without a network.

use async_trait::async_trait;
use keyring::Entry;
use reqwest::Client;
use std::sync::Arc;

use super::types::PanelLanguage;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;

const KEYRING_SERVICE: &str = "zing-translator";
const KEYRING_ACCOUNT: &str = "deepl_api_key";

#[async_trait]
pub trait TranslationEngine: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: PanelLanguage,
        target: PanelLanguage,
    ) -> AppResult<String>;
}

/// Build the engine selected in settings ("google" is the default)
pub fn engine_from_settings(settings: &AppSettings) -> AppResult<Arc<dyn TranslationEngine>> {
    match settings.api_keys.translation_provider.as_str() {
        "deepl" => Ok(Arc::new(DeepLEngine::new(Some(
            settings.api_keys.deepl_api_key.clone(),
        ))?)),
        _ => Ok(Arc::new(GoogleTranslateEngine::new()?)),
    }
}

// ---------------------------------------------------------------------------
// Google (unofficial free endpoint)
// ---------------------------------------------------------------------------

pub struct GoogleTranslateEngine {
    http: Client,
}

impl GoogleTranslateEngine {
    pub fn new() -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl TranslationEngine for GoogleTranslateEngine {
    async fn translate(
        &self,
        text: &str,
        source: PanelLanguage,
        target: PanelLanguage,
    ) -> AppResult<String> {
        let url = format!(
            "https://translate.googleapis.com/translate_a/single?client=gtx&sl={}&tl={}&dt=t&q={}",
            source.code(),
            target.code(),
            urlencoding::encode(text)
        );

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = res.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            // The endpoint rejects language codes it has no model for
            return Err(AppError::UnsupportedLanguage(format!(
                "{} -> {}",
                source.code(),
                target.code()
            )));
        }
        if !status.is_success() {
            return Err(AppError::Network(format!("Translation API error: {}", status)));
        }

        let raw_json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to parse JSON: {}", e)))?;

        parse_google_response(&raw_json)
    }
}

/// Parse the nested array the endpoint returns: `[[["Translated", ...], ...], ...]`
pub fn parse_google_response(json: &serde_json::Value) -> AppResult<String> {
    let sentences = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| AppError::Validation("Invalid response format from Google".to_string()))?;

    let mut result = String::new();
    for sentence in sentences {
        if let Some(segment) = sentence.get(0).and_then(|v| v.as_str()) {
            result.push_str(segment);
        }
    }

    if result.is_empty() {
        return Err(AppError::Validation("missing translation text".to_string()));
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// DeepL
// ---------------------------------------------------------------------------

pub struct DeepLEngine {
    http: Client,
    /// Key entered through settings. Checked before env and keyring.
    configured_key: Option<String>,
}

impl DeepLEngine {
    pub fn new(configured_key: Option<String>) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("zing/translator")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;
        Ok(Self {
            http,
            configured_key,
        })
    }

    fn get_api_key(&self) -> AppResult<String> {
        if let Some(key) = &self.configured_key {
            if !key.trim().is_empty() {
                return Ok(key.clone());
            }
        }
        if let Ok(env_key) = std::env::var("DEEPL_API_KEY") {
            if !env_key.trim().is_empty() {
                return Ok(env_key);
            }
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
            .map_err(|e| AppError::System(e.to_string()))?;
        match entry.get_password() {
            Ok(p) => Ok(p),
            Err(err) => {
                let msg = err.to_string();
                if msg.to_lowercase().contains("not found") || msg.to_lowercase().contains("no entry")
                {
                    Err(AppError::Validation("Missing API Key".to_string()))
                } else {
                    Err(AppError::System(msg))
                }
            }
        }
    }
}

#[async_trait]
impl TranslationEngine for DeepLEngine {
    async fn translate(
        &self,
        text: &str,
        source: PanelLanguage,
        target: PanelLanguage,
    ) -> AppResult<String> {
        let api_key = self.get_api_key()?;

        let form: Vec<(&str, String)> = vec![
            ("text", text.to_string()),
            ("source_lang", source.code().to_uppercase()),
            ("target_lang", target.code().to_uppercase()),
        ];

        let res = self
            .http
            .post("https://api-free.deepl.com/v2/translate")
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = res.status();
        if status.as_u16() == 456 {
            return Err(AppError::Network("DeepL quota exceeded".to_string()));
        }
        if !status.is_success() {
            return Err(AppError::Network(format!("DeepL API error: {}", status)));
        }

        let raw_json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to parse JSON: {}", e)))?;

        parse_deepl_response(&raw_json)
    }
}

/// Parse `{"translations": [{"text": "...", ...}]}`
pub fn parse_deepl_response(json: &serde_json::Value) -> AppResult<String> {
    json.get("translations")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("text"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::Validation("missing translation text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_google_single_sentence() {
        let json = json!([[["привет", "hello", null, null, 10]], null, "en"]);
        assert_eq!(parse_google_response(&json).unwrap(), "привет");
    }

    #[test]
    fn test_parse_google_multiple_segments() {
        let json = json!([
            [["Привет, мир. ", "Hello, world. ", null], ["Как дела?", "How are you?", null]],
            null,
            "en"
        ]);
        assert_eq!(parse_google_response(&json).unwrap(), "Привет, мир. Как дела?");
    }

    #[test]
    fn test_parse_google_malformed() {
        let json = json!({"unexpected": "shape"});
        assert!(matches!(
            parse_google_response(&json),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_deepl_key_from_settings() {
        let engine = DeepLEngine::new(Some("settings-key".to_string())).unwrap();
        assert_eq!(engine.get_api_key().unwrap(), "settings-key");
    }

    #[test]
    fn test_engine_from_settings_selects_deepl_with_stored_key() {
        let mut settings = AppSettings::default();
        settings.api_keys.translation_provider = "deepl".to_string();
        settings.api_keys.deepl_api_key = "stored-key".to_string();

        // Must build without env or keychain; the stored key is the source
        assert!(engine_from_settings(&settings).is_ok());
    }

    #[test]
    fn test_parse_deepl() {
        let json = json!({
            "translations": [{"detected_source_language": "RU", "text": "hello"}]
        });
        assert_eq!(parse_deepl_response(&json).unwrap(), "hello");
    }

    #[test]
    fn test_parse_deepl_empty() {
        let json = json!({"translations": []});
        assert!(parse_deepl_response(&json).is_err());
    }
}
