//! File-backed picker settings.
//!
//! Files ending in `.json` are read as JSON, anything else as YAML. Missing
//! keys fall back to the picker defaults.

use crate::error::{PickerError, Result};
use crate::ui::theme::AppearanceSetting;
use crate::widgets::components::date_picker::DEFAULT_DATE_FORMAT;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    pub date_format: String,
    pub allow_manual_input: bool,
    pub allow_change_month: bool,
    pub months_offset_add: i32,
    pub months_offset_subtract: i32,
    /// Locale applied through `set_localization` when present.
    pub localization: Option<String>,
    pub first_weekday: Weekday,
    pub appearance: AppearanceSetting,
    pub entry_width: u16,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            allow_manual_input: true,
            allow_change_month: true,
            months_offset_add: 0,
            months_offset_subtract: 0,
            localization: None,
            first_weekday: Weekday::Mon,
            appearance: AppearanceSetting::System,
            entry_width: 12,
        }
    }
}

impl PickerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_yaml_str(&raw)
        }?;
        tracing::debug!(path = %path.display(), "loaded picker config");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|err| PickerError::Config(err.to_string()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| PickerError::Config(err.to_string()))
    }
}
