use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::settings::AppSettings;
use crate::core::translator::types::TranslatorState;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier frontend parsing
#[ts(export, export_to = "dist/types/events.ts")]
pub enum AppEvent {
    #[serde(rename = "translator://updated")]
    TranslatorUpdated(TranslatorState),

    #[serde(rename = "settings://updated")]
    SettingsUpdated(AppSettings),

    #[serde(rename = "panel://visibility-changed")]
    PanelVisibilityChanged(bool),
}
