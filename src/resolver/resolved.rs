//! The resolved configuration snapshot

use crate::config::{SettingKind, SettingValue};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Placeholder printed instead of secret values
pub const REDACTED: &str = "[REDACTED]";

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Read from the environment and coerced
    Environment,
    /// Declared default (unset, empty, malformed, or fixed setting)
    Default,
}

/// One resolved setting
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSetting {
    pub key: String,
    /// Full environment variable name that was consulted, if any
    pub env: Option<String>,
    pub value: SettingValue,
    pub origin: Origin,
    pub secret: bool,
}

impl ResolvedSetting {
    /// Value as shown to humans: secrets are masked
    #[must_use]
    pub fn display_value(&self) -> String {
        if self.secret {
            REDACTED.to_string()
        } else {
            self.value.to_string()
        }
    }
}

impl fmt::Debug for ResolvedSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ResolvedSetting");
        debug.field("key", &self.key).field("env", &self.env);
        if self.secret {
            debug.field("value", &REDACTED);
        } else {
            debug.field("value", &self.value);
        }
        debug.field("origin", &self.origin).finish()
    }
}

/// Immutable, fully resolved configuration
///
/// Every declared key has exactly one value of its declared kind. Entries keep
/// the declaration order of the setting table. The snapshot is never mutated
/// after resolution; share it by reference or wrap it in an `Arc`.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ResolvedConfig {
    entries: Vec<ResolvedSetting>,
    index: HashMap<String, usize>,
}

impl ResolvedConfig {
    pub(crate) fn from_entries(entries: Vec<ResolvedSetting>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Number of settings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Full entry for a key
    pub fn entry(&self, key: &str) -> Option<&ResolvedSetting> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Value for a key
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entry(key).map(|e| &e.value)
    }

    /// Where the value of a key came from
    pub fn origin(&self, key: &str) -> Option<Origin> {
        self.entry(key).map(|e| e.origin)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedSetting> {
        self.entries.iter()
    }

    /// Keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    fn lookup(&self, key: &str) -> Result<&SettingValue> {
        self.get(key)
            .ok_or_else(|| Error::SettingNotFound(key.to_string()))
    }

    fn mismatch(key: &str, expected: SettingKind, value: &SettingValue) -> Error {
        Error::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            actual: value.kind().to_string(),
        }
    }

    /// # Errors
    ///
    /// `SettingNotFound` for an undeclared key, `TypeMismatch` for a non-string setting.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        let value = self.lookup(key)?;
        value
            .as_str()
            .ok_or_else(|| Self::mismatch(key, SettingKind::String, value))
    }

    /// # Errors
    ///
    /// `SettingNotFound` for an undeclared key, `TypeMismatch` for a non-boolean setting.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.lookup(key)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(key, SettingKind::Boolean, value))
    }

    /// # Errors
    ///
    /// `SettingNotFound` for an undeclared key, `TypeMismatch` for a non-integer setting.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.lookup(key)?;
        value
            .as_i64()
            .ok_or_else(|| Self::mismatch(key, SettingKind::Integer, value))
    }

    /// Settings as `(KEY, value)` pairs, ready to export as environment variables
    ///
    /// Booleans render as `true`/`false`, integers in base 10. Secrets are
    /// included verbatim.
    pub fn to_env_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.value.to_string()))
            .collect()
    }

    /// Settings as `KEY=value` lines; secrets are masked unless `show_secrets`
    pub fn to_env_lines(&self, show_secrets: bool) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let value = if show_secrets {
                entry.value.to_string()
            } else {
                entry.display_value()
            };
            out.push_str(&entry.key);
            out.push('=');
            out.push_str(&value);
            out.push('\n');
        }
        out
    }

    /// Settings as a JSON object; secrets are masked unless `show_secrets`
    pub fn to_json(&self, show_secrets: bool) -> Value {
        let mut map = Map::with_capacity(self.entries.len());
        for entry in &self.entries {
            let value = if entry.secret && !show_secrets {
                Value::String(REDACTED.to_string())
            } else {
                serde_json::to_value(&entry.value).unwrap_or(Value::Null)
            };
            map.insert(entry.key.clone(), value);
        }
        Value::Object(map)
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for entry in &self.entries {
            map.entry(&entry.key, &entry.display_value());
        }
        map.finish()
    }
}

impl<'a> IntoIterator for &'a ResolvedConfig {
    type Item = &'a ResolvedSetting;
    type IntoIter = std::slice::Iter<'a, ResolvedSetting>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
