//! Environment sources and resolver options

use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Environment Sources
// =============================================================================

/// Read-only lookup of raw environment values
///
/// The resolver never mutates a source. Implement this for anything that can
/// answer "what is the value of `name`": the process environment, a map in a
/// test, a secrets sidecar.
pub trait EnvSource: Send + Sync {
    /// Raw value of `name`, or `None` if it is not set
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, name: &str) -> Option<String> {
        match std::env::var_os(name)?.into_string() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Environment variable {name} is not valid unicode, ignoring it");
                None
            }
        }
    }
}

/// In-memory environment, ordered by name
///
/// # Example
///
/// ```
/// use wpenv::{EnvSource, MapEnvSource};
///
/// let env = MapEnvSource::new()
///     .with("WORDPRESS_DEBUG", "true")
///     .with("REDIS_PORT", "7000");
///
/// assert_eq!(env.var("REDIS_PORT").as_deref(), Some("7000"));
/// assert_eq!(env.var("REDIS_HOST"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnvSource {
    vars: BTreeMap<String, String>,
}

impl MapEnvSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment (non-unicode entries skipped)
    #[must_use]
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for MapEnvSource {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<S: std::hash::BuildHasher + Send + Sync> EnvSource for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Source backed by a lookup closure
pub struct FnEnvSource<F>(F);

impl<F> EnvSource for FnEnvSource<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn var(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}

/// Wrap a lookup closure as an [`EnvSource`]
///
/// ```
/// use wpenv::{from_fn, EnvSource};
///
/// let env = from_fn(|name| (name == "REDIS_HOST").then(|| "cache.internal".to_string()));
/// assert_eq!(env.var("REDIS_HOST").as_deref(), Some("cache.internal"));
/// ```
pub fn from_fn<F>(lookup: F) -> FnEnvSource<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    FnEnvSource(lookup)
}

// =============================================================================
// Resolver Options
// =============================================================================

/// How an environment variable that is set to the empty string is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyValue {
    /// Same as unset: the default is used
    #[default]
    Unset,
    /// Kept as a value: `""` for strings, `false` for booleans; integers still
    /// fall back to the default because `""` does not parse
    Literal,
}

/// Options for a [`ConfigResolver`](crate::ConfigResolver)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Treatment of variables set to `""`
    pub empty_values: EmptyValue,

    /// Prefix for every environment variable name (e.g. "SITE1" -> SITE1_REDIS_PORT)
    /// If None, names are used as declared
    pub env_prefix: Option<String>,
}

impl ResolverOptions {
    /// Create a new builder for ResolverOptions
    ///
    /// # Example
    /// ```rust
    /// use wpenv::{EmptyValue, ResolverOptions};
    ///
    /// let options = ResolverOptions::builder()
    ///     .with_env_prefix("BLOG")
    ///     .empty_values(EmptyValue::Literal)
    ///     .build();
    ///
    /// assert_eq!(options.env_name("REDIS_PORT"), "BLOG_REDIS_PORT");
    /// ```
    #[must_use]
    pub fn builder() -> ResolverOptionsBuilder {
        ResolverOptionsBuilder::new()
    }

    /// Full environment variable name for a declared name
    #[must_use]
    pub fn env_name(&self, declared: &str) -> String {
        match self.env_prefix {
            Some(ref prefix) => format!("{}_{declared}", prefix.to_uppercase()),
            None => declared.to_string(),
        }
    }
}

/// Builder for creating ResolverOptions with a fluent API
#[derive(Debug, Clone, Default)]
pub struct ResolverOptionsBuilder {
    empty_values: EmptyValue,
    env_prefix: Option<String>,
}

impl ResolverOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how variables set to `""` are treated (default: [`EmptyValue::Unset`])
    #[must_use]
    pub fn empty_values(mut self, mode: EmptyValue) -> Self {
        self.empty_values = mode;
        self
    }

    /// Prefix every environment variable name
    ///
    /// The prefix is uppercased and joined with `_`. An empty prefix is ignored.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.env_prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    #[must_use]
    pub fn build(self) -> ResolverOptions {
        ResolverOptions {
            empty_values: self.empty_values,
            env_prefix: self.env_prefix,
        }
    }
}
