//! The host-supplied settings map and its typed view.
//!
//! Hosts hand Cortex a string-keyed map of loosely-typed values (the merged
//! result of file defaults overridden by admin configuration); `Settings`
//! reads it once, at `Runtime` construction, into the typed fields the rest
//! of the engine relies on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One value in the host's settings map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsValue {
    Bool(bool),
    Int(i64),
    StringList(Vec<String>),
}

impl SettingsValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            SettingsValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            SettingsValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    fn as_string_list(&self) -> Option<&[String]> {
        match self {
            SettingsValue::StringList(v) => Some(v),
            _ => None,
        }
    }
}

/// Runtime configuration, read once from a settings map at construction.
///
/// Field-by-field documentation and defaults live with the host's settings
/// registry; this type just gives them names and types.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub enabled: bool,
    pub cache_enabled: bool,
    /// Seconds; 0 means "never expire".
    pub cache_ttl: u64,
    pub debug: bool,
    pub additional_allowed_functions: Vec<String>,
    pub denied_functions: Vec<String>,
    /// 0 means unlimited.
    pub max_nesting_depth: usize,
    /// 0 means unlimited; applies to pre-unescape expression length.
    pub max_expression_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enabled: true,
            cache_enabled: true,
            cache_ttl: 0,
            debug: false,
            additional_allowed_functions: Vec::new(),
            denied_functions: Vec::new(),
            max_nesting_depth: 0,
            max_expression_length: 0,
        }
    }
}

impl Settings {
    /// Build a `Settings` from a host settings map, falling back to the
    /// documented default for any missing or mistyped key.
    pub fn from_map(map: &HashMap<String, SettingsValue>) -> Self {
        let mut settings = Settings::default();

        if let Some(v) = map.get("enabled").and_then(SettingsValue::as_bool) {
            settings.enabled = v;
        }
        if let Some(v) = map.get("cache_enabled").and_then(SettingsValue::as_bool) {
            settings.cache_enabled = v;
        }
        if let Some(v) = map.get("cache_ttl").and_then(SettingsValue::as_int) {
            settings.cache_ttl = v.max(0) as u64;
        }
        if let Some(v) = map.get("debug").and_then(SettingsValue::as_bool) {
            settings.debug = v;
        }
        if let Some(v) = map
            .get("security.additional_allowed_functions")
            .and_then(SettingsValue::as_string_list)
        {
            settings.additional_allowed_functions = v.to_vec();
        }
        if let Some(v) = map
            .get("security.denied_functions")
            .and_then(SettingsValue::as_string_list)
        {
            settings.denied_functions = v.to_vec();
        }
        if let Some(v) = map
            .get("security.max_nesting_depth")
            .and_then(SettingsValue::as_int)
        {
            settings.max_nesting_depth = v.max(0) as usize;
        }
        if let Some(v) = map
            .get("security.max_expression_length")
            .and_then(SettingsValue::as_int)
        {
            settings.max_expression_length = v.max(0) as usize;
        }

        settings
    }
}
