// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture configuration

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::network::{normalize_exclusions, Redactor, DEFAULT_HOST_PATTERN};

/// Default log capacity
pub const DEFAULT_MAX_LOG_SIZE: i64 = 5000;

/// Capture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureConfig {
    /// Log capacity; zero or negative disables trimming
    pub max_log_size: i64,
    /// Lowercased header names dropped from captured entries
    pub exclude_headers: BTreeSet<String>,
    /// Mask workspace tokens in captured bodies
    pub mask_tokens: bool,
    /// Feed captured entries to the user registry
    pub user_capture_enabled: bool,
    /// Log every captured entry at info level
    pub verbose: bool,
    /// Hosts eligible for capture; `None` admits every host
    pub host_pattern: Option<String>,
    /// URL include patterns; empty admits every URL the host gate admits
    pub filter: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_log_size: DEFAULT_MAX_LOG_SIZE,
            exclude_headers: normalize_exclusions(std::iter::empty::<&str>()),
            mask_tokens: true,
            user_capture_enabled: false,
            verbose: false,
            host_pattern: Some(DEFAULT_HOST_PATTERN.to_string()),
            filter: Vec::new(),
        }
    }
}

impl CaptureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set log capacity
    pub fn max_log_size(mut self, max: i64) -> Self {
        self.max_log_size = max;
        self
    }

    /// Set excluded headers; the mandatory exclusions are always added
    pub fn exclude_headers<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.exclude_headers = normalize_exclusions(names);
        self
    }

    pub fn mask_tokens(mut self, mask: bool) -> Self {
        self.mask_tokens = mask;
        self
    }

    /// Enable/disable user capture
    pub fn user_capture(mut self, enabled: bool) -> Self {
        self.user_capture_enabled = enabled;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the host gate pattern; `None` admits every host
    pub fn host_pattern(mut self, pattern: Option<&str>) -> Self {
        self.host_pattern = pattern.map(str::to_string);
        self
    }

    /// Set URL include patterns
    pub fn filter<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.filter = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Capture with the user registry fed from the start
    pub fn for_user_capture() -> Self {
        Self {
            user_capture_enabled: true,
            ..Default::default()
        }
    }

    /// Capture calls to any host
    pub fn any_host() -> Self {
        Self {
            host_pattern: None,
            ..Default::default()
        }
    }

    /// Redaction settings derived from this config
    pub fn redactor(&self) -> Redactor {
        Redactor::new(&self.exclude_headers, self.mask_tokens)
    }

    /// Apply a partial update; fields absent from the update keep their value
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(max) = update.max_log_size {
            self.max_log_size = max;
        }
        if let Some(ref names) = update.exclude_headers {
            self.exclude_headers = normalize_exclusions(names);
        }
        if let Some(mask) = update.mask_tokens {
            self.mask_tokens = mask;
        }
        if let Some(enabled) = update.user_capture_enabled {
            self.user_capture_enabled = enabled;
        }
        if let Some(verbose) = update.verbose {
            self.verbose = verbose;
        }
    }
}

/// Partial configuration change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub max_log_size: Option<i64>,
    pub exclude_headers: Option<Vec<String>>,
    pub mask_tokens: Option<bool>,
    pub user_capture_enabled: Option<bool>,
    pub verbose: Option<bool>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_log_size(mut self, max: i64) -> Self {
        self.max_log_size = Some(max);
        self
    }

    pub fn exclude_headers<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.exclude_headers = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn mask_tokens(mut self, mask: bool) -> Self {
        self.mask_tokens = Some(mask);
        self
    }

    pub fn user_capture(mut self, enabled: bool) -> Self {
        self.user_capture_enabled = Some(enabled);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Read an update from a JSON object.
    ///
    /// Unknown keys are ignored. A recognized key holding the wrong type is
    /// ignored with a warning. Anything other than an object is rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::invalid_argument("configuration must be a JSON object"))?;

        let mut update = Self::default();
        for (key, value) in object {
            let accepted = match key.as_str() {
                "maxLogSize" => value
                    .as_i64()
                    .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                    .map(|max| update.max_log_size = Some(max))
                    .is_some(),
                "excludeHeaders" => string_list(value)
                    .map(|names| update.exclude_headers = Some(names))
                    .is_some(),
                "maskTokens" => value.as_bool().map(|b| update.mask_tokens = Some(b)).is_some(),
                "userCaptureEnabled" => value
                    .as_bool()
                    .map(|b| update.user_capture_enabled = Some(b))
                    .is_some(),
                "verbose" => value.as_bool().map(|b| update.verbose = Some(b)).is_some(),
                _ => true,
            };

            if !accepted {
                tracing::warn!(key = %key, value = %value, "ignoring configuration value of the wrong type");
            }
        }

        Ok(update)
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.max_log_size, 5000);
        assert!(config.mask_tokens);
        assert!(!config.user_capture_enabled);
        assert!(config.exclude_headers.contains("authorization"));
        assert!(config.exclude_headers.contains("set-cookie"));
        assert_eq!(config.host_pattern.as_deref(), Some(DEFAULT_HOST_PATTERN));
    }

    #[test]
    fn test_presets() {
        assert!(CaptureConfig::for_user_capture().user_capture_enabled);
        assert_eq!(CaptureConfig::any_host().host_pattern, None);
    }

    #[test]
    fn test_exclusions_keep_mandatory_set() {
        let config = CaptureConfig::new().exclude_headers(["X-Slack-Req"]);
        assert!(config.exclude_headers.contains("x-slack-req"));
        assert!(config.exclude_headers.contains("cookie"));
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(CaptureConfig::default()).unwrap();
        assert_eq!(value["maxLogSize"], 5000);
        assert_eq!(value["maskTokens"], true);
        assert_eq!(value["userCaptureEnabled"], false);
    }

    #[test]
    fn test_update_from_json() {
        let update = ConfigUpdate::from_json(&json!({
            "maxLogSize": 10,
            "excludeHeaders": ["X-Trace"],
            "maskTokens": "yes",
            "verbose": true,
            "somethingElse": 1
        }))
        .unwrap();

        assert_eq!(update.max_log_size, Some(10));
        assert_eq!(update.exclude_headers, Some(vec!["X-Trace".to_string()]));
        assert_eq!(update.mask_tokens, None);
        assert_eq!(update.verbose, Some(true));

        let mut config = CaptureConfig::default();
        config.apply(&update);
        assert_eq!(config.max_log_size, 10);
        assert!(config.mask_tokens);
        assert!(config.exclude_headers.contains("x-trace"));
        assert!(config.exclude_headers.contains("authorization"));
    }

    #[test]
    fn test_update_rejects_non_object() {
        for value in [json!([1, 2]), json!("maxLogSize"), json!(null)] {
            let err = ConfigUpdate::from_json(&value).unwrap_err();
            assert!(err.is_misuse());
        }
    }

    #[test]
    fn test_mixed_exclusion_list_is_ignored() {
        let update = ConfigUpdate::from_json(&json!({"excludeHeaders": ["a", 1]})).unwrap();
        assert_eq!(update.exclude_headers, None);
    }
}
