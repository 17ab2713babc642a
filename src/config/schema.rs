//! Setting specifications and the schema trait
//!
//! # Overview
//!
//! A [`SettingSpec`] declares one setting: its key, the environment variable it
//! is read from, its default value and its [`SettingKind`]. A table of specs is
//! what the resolver walks at startup.
//!
//! ```rust
//! use wpenv::{SettingSpec, SettingKind, settings};
//!
//! let specs = settings! {
//!     "DB_HOST" => SettingSpec::string("mysql:3306")
//!         .env("WORDPRESS_DB_HOST")
//!         .category("database"),
//!
//!     "WP_DEBUG" => SettingSpec::boolean(false).env("WORDPRESS_DEBUG"),
//!
//!     "WP_REDIS_PORT" => SettingSpec::integer(6379).env("REDIS_PORT"),
//!
//!     "DB_CHARSET" => SettingSpec::string("utf8mb4"),   // fixed, no env var
//! };
//!
//! assert_eq!(specs.len(), 4);
//! assert_eq!(specs[2].kind, SettingKind::Integer);
//! assert!(specs[3].is_fixed());
//! ```
//!
//! # Coercion
//!
//! | Kind | Raw value | Result |
//! |------|-----------|--------|
//! | `String` | any | the raw string, verbatim |
//! | `Boolean` | exactly `"true"` | `true` |
//! | `Boolean` | anything else (`"TRUE"`, `"1"`, `"yes"`) | `false` |
//! | `Integer` | base-10 integer | the parsed value |
//! | `Integer` | anything else | *no value*, the default is used |
//!
//! # Custom Metadata
//!
//! Specs carry free-form metadata the same way for every kind:
//!
//! ```rust
//! use wpenv::SettingSpec;
//!
//! let spec = SettingSpec::string("put your unique phrase here")
//!     .env("WORDPRESS_AUTH_KEY")
//!     .description("Authentication unique key")
//!     .meta_bool("rotate_on_deploy", true)
//!     .secret();
//!
//! assert!(spec.is_secret());
//! assert_eq!(spec.get_meta_bool("rotate_on_deploy"), Some(true));
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::resolver::ResolvedConfig;

// =============================================================================
// Well-known Metadata Keys
// =============================================================================

/// Metadata keys the library reads itself.
///
/// Anything else is custom metadata; use string literals with `.meta_str()`.
pub mod meta {
    /// Mark as secret (value masked in logs, docs and printed output)
    pub const SECRET: &str = "secret";
    /// Human readable description, used by the docs generator
    pub const DESCRIPTION: &str = "description";
    /// Grouping used by the docs generator
    pub const CATEGORY: &str = "category";
}

// =============================================================================
// Setting Kinds
// =============================================================================

/// Declared type of a setting
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SettingKind {
    /// Raw string, used verbatim
    #[default]
    String,
    /// `true` only for the exact literal `"true"`
    Boolean,
    /// Base-10 signed integer
    Integer,
}

impl SettingKind {
    /// Lowercase name of the kind
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::String => "string",
            SettingKind::Boolean => "boolean",
            SettingKind::Integer => "integer",
        }
    }

    /// Coerce a raw environment value into this kind
    ///
    /// Returns `None` when the raw value cannot represent the kind, in which
    /// case the caller falls back to the setting's default. Only `Integer` can
    /// reject a value.
    #[must_use]
    pub fn coerce(&self, raw: &str) -> Option<SettingValue> {
        match self {
            SettingKind::String => Some(SettingValue::String(raw.to_string())),
            SettingKind::Boolean => Some(SettingValue::Boolean(raw == "true")),
            SettingKind::Integer => raw.parse::<i64>().ok().map(SettingValue::Integer),
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Ok(SettingKind::String),
            "boolean" | "bool" | "toggle" => Ok(SettingKind::Boolean),
            "integer" | "int" | "number" => Ok(SettingKind::Integer),
            _ => Err(Error::UnsupportedKind {
                kind: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SettingKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

// =============================================================================
// Setting Values
// =============================================================================

/// A typed setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl SettingValue {
    /// Kind this value belongs to
    #[must_use]
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::String(_) => SettingKind::String,
            SettingValue::Boolean(_) => SettingKind::Boolean,
            SettingValue::Integer(_) => SettingKind::Integer,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(s) => f.write_str(s),
            SettingValue::Boolean(b) => write!(f, "{b}"),
            SettingValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Boolean(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

// =============================================================================
// Setting Spec
// =============================================================================

/// Declaration of a single setting
///
/// # Example
///
/// ```
/// use wpenv::{SettingSpec, SettingValue};
///
/// let port = SettingSpec::integer(6379)
///     .with_key("WP_REDIS_PORT")
///     .env("REDIS_PORT")
///     .category("cache");
///
/// assert_eq!(port.default, SettingValue::Integer(6379));
/// assert_eq!(port.env.as_deref(), Some("REDIS_PORT"));
/// assert!(port.validate_schema().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingSpec {
    /// Name of the setting in the resolved configuration
    pub key: String,

    /// Environment variable the value is read from; `None` for fixed settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    /// Declared kind
    pub kind: SettingKind,

    /// Value used when the environment provides nothing usable
    pub default: SettingValue,

    /// Developer-defined custom metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl SettingSpec {
    // =========================================================================
    // Kind-specific constructors
    // =========================================================================

    fn with_default(kind: SettingKind, default: SettingValue) -> Self {
        Self {
            key: String::new(),
            env: None,
            kind,
            default,
            metadata: HashMap::new(),
        }
    }

    /// Create a string setting
    pub fn string(default: impl Into<String>) -> Self {
        Self::with_default(SettingKind::String, SettingValue::String(default.into()))
    }

    /// Create a boolean setting
    pub fn boolean(default: bool) -> Self {
        Self::with_default(SettingKind::Boolean, SettingValue::Boolean(default))
    }

    /// Create an integer setting
    pub fn integer(default: i64) -> Self {
        Self::with_default(SettingKind::Integer, SettingValue::Integer(default))
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the key (the `settings!` macro calls this for you)
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Read this setting from the given environment variable
    #[must_use]
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(self, text: impl Into<String>) -> Self {
        self.meta_str(meta::DESCRIPTION, text)
    }

    #[must_use]
    pub fn category(self, name: impl Into<String>) -> Self {
        self.meta_str(meta::CATEGORY, name)
    }

    /// Mark setting as secret
    ///
    /// Secret values are never logged and are masked in docs and printed
    /// output. They are still resolved and handed to the bootstrap verbatim.
    #[must_use]
    pub fn secret(self) -> Self {
        self.meta_bool(meta::SECRET, true)
    }

    // =========================================================================
    // Dynamic metadata methods
    // =========================================================================

    /// Add custom string metadata
    #[must_use]
    pub fn meta_str(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata
            .insert(key.to_string(), Value::String(value.into()));
        self
    }

    /// Add custom boolean metadata
    #[must_use]
    pub fn meta_bool(mut self, key: &str, value: bool) -> Self {
        self.metadata.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Add custom JSON metadata
    #[must_use]
    pub fn meta(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn get_meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    pub fn get_meta_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(|v| v.as_bool())
    }

    pub fn is_secret(&self) -> bool {
        self.get_meta_bool(meta::SECRET).unwrap_or(false)
    }

    /// A fixed setting has no environment variable and always resolves to its default
    pub fn is_fixed(&self) -> bool {
        self.env.is_none()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate the declaration itself
    ///
    /// Checks:
    /// - Key is not empty
    /// - Environment variable name is usable (non-empty, no `=` or NUL)
    /// - Default value is of the declared kind
    pub fn validate_schema(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::invalid(&self.key, "key cannot be empty"));
        }

        if let Some(ref name) = self.env {
            if name.is_empty() {
                return Err(Error::invalid(
                    &self.key,
                    "environment variable name cannot be empty",
                ));
            }
            if name.contains('=') || name.contains('\0') {
                return Err(Error::invalid(
                    &self.key,
                    format!("invalid environment variable name '{name}'"),
                ));
            }
        }

        let default_kind = self.default.kind();
        if default_kind != self.kind {
            return Err(Error::invalid(
                &self.key,
                format!(
                    "default value {:?} is a {default_kind}, declared kind is {}",
                    self.default, self.kind
                ),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Settings Schema Trait
// =============================================================================

/// Trait for types that are built from a table of settings
///
/// Implement this for a typed configuration struct: `get_settings` declares
/// the table, `from_resolved` reads the typed view out of a resolved snapshot.
pub trait SettingsSchema: Sized {
    /// Declared settings, in resolution order
    fn get_settings() -> Vec<SettingSpec>;

    /// Build the typed view from a resolved configuration
    fn from_resolved(config: &ResolvedConfig) -> Result<Self>;

    /// List of categories in display order
    #[must_use]
    fn get_categories() -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for spec in Self::get_settings() {
            if let Some(category) = spec.get_meta_str(meta::CATEGORY) {
                if !categories.iter().any(|c| c == category) {
                    categories.push(category.to_string());
                }
            }
        }
        categories
    }
}

/// Macro for building a setting table
///
/// Each entry is `"KEY" => spec`; the key is attached to the spec and the
/// table keeps declaration order.
///
/// # Example
/// ```rust
/// use wpenv::{settings, SettingSpec};
///
/// let specs = settings! {
///     "TABLE_PREFIX" => SettingSpec::string("wp_").env("WORDPRESS_TABLE_PREFIX"),
///     "WP_CACHE" => SettingSpec::boolean(true),
/// };
/// assert_eq!(specs[0].key, "TABLE_PREFIX");
/// ```
#[macro_export]
macro_rules! settings {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut specs: Vec<$crate::SettingSpec> = Vec::new();
        $(
            specs.push($value.with_key($key));
        )*
        specs
    }};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_builder() {
        let spec = SettingSpec::string("wordpress")
            .with_key("DB_NAME")
            .env("WORDPRESS_DB_NAME")
            .description("Database name")
            .category("database");

        assert_eq!(spec.key, "DB_NAME");
        assert_eq!(spec.kind, SettingKind::String);
        assert_eq!(spec.default, SettingValue::from("wordpress"));
        assert_eq!(spec.get_meta_str(meta::DESCRIPTION), Some("Database name"));
        assert_eq!(spec.get_meta_str(meta::CATEGORY), Some("database"));
        assert!(!spec.is_secret());
        assert!(!spec.is_fixed());
    }

    #[test]
    fn test_boolean_coercion_is_exact() {
        let kind = SettingKind::Boolean;
        assert_eq!(kind.coerce("true"), Some(SettingValue::Boolean(true)));

        for raw in ["false", "TRUE", "True", "1", "yes", "on", " true", "true "] {
            assert_eq!(
                kind.coerce(raw),
                Some(SettingValue::Boolean(false)),
                "raw value {raw:?}"
            );
        }
    }

    #[test]
    fn test_integer_coercion() {
        let kind = SettingKind::Integer;
        assert_eq!(kind.coerce("6379"), Some(SettingValue::Integer(6379)));
        assert_eq!(kind.coerce("-12"), Some(SettingValue::Integer(-12)));
        assert_eq!(kind.coerce("notanumber"), None);
        assert_eq!(kind.coerce("63.79"), None);
        assert_eq!(kind.coerce("0x1F"), None);
        assert_eq!(kind.coerce(" 6379"), None);
        assert_eq!(kind.coerce("99999999999999999999"), None);
    }

    #[test]
    fn test_string_coercion_is_verbatim() {
        let kind = SettingKind::String;
        assert_eq!(
            kind.coerce("  spaced value "),
            Some(SettingValue::from("  spaced value "))
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("string".parse::<SettingKind>().unwrap(), SettingKind::String);
        assert_eq!("Bool".parse::<SettingKind>().unwrap(), SettingKind::Boolean);
        assert_eq!("int".parse::<SettingKind>().unwrap(), SettingKind::Integer);

        let err = "float".parse::<SettingKind>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind { ref kind } if kind == "float"));
    }

    #[test]
    fn test_schema_validation() {
        let valid = SettingSpec::integer(6379).with_key("WP_REDIS_PORT");
        assert!(valid.validate_schema().is_ok());

        let no_key = SettingSpec::boolean(false);
        assert!(no_key.validate_schema().is_err());

        let bad_env = SettingSpec::string("x").with_key("A").env("A=B");
        assert!(bad_env.validate_schema().is_err());

        let mut mismatched = SettingSpec::string("6379").with_key("WP_REDIS_PORT");
        mismatched.kind = SettingKind::Integer;
        let err = mismatched.validate_schema().unwrap_err();
        assert!(err.is_fatal_schema_error());
        assert!(err.to_string().contains("WP_REDIS_PORT"));
    }

    #[test]
    fn test_deserialize_spec() {
        let spec: SettingSpec = serde_json::from_value(json!({
            "key": "WP_REDIS_PORT",
            "env": "REDIS_PORT",
            "kind": "integer",
            "default": 6379
        }))
        .unwrap();

        assert_eq!(spec.kind, SettingKind::Integer);
        assert_eq!(spec.default, SettingValue::Integer(6379));
        assert!(spec.validate_schema().is_ok());
    }

    #[test]
    fn test_deserialize_unsupported_kind() {
        let result: std::result::Result<SettingSpec, _> = serde_json::from_value(json!({
            "key": "RATIO",
            "kind": "float",
            "default": 0
        }));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Unsupported setting kind 'float'"));
    }

    #[test]
    fn test_settings_macro_keeps_order() {
        let specs = settings! {
            "B" => SettingSpec::boolean(true),
            "A" => SettingSpec::string("a"),
            "C" => SettingSpec::integer(3),
        };

        let keys: Vec<_> = specs.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(SettingValue::from("wp_").to_string(), "wp_");
        assert_eq!(SettingValue::from(true).to_string(), "true");
        assert_eq!(SettingValue::from(6379).to_string(), "6379");
    }
}
