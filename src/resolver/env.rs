//! Environment variable handling for the resolver
//!
//! Helper struct to encapsulate env var naming and raw value lookup.

use crate::config::{EmptyValue, EnvSource, ResolverOptions};

/// Handles environment variable lookups
pub struct EnvironmentHandler<'a> {
    options: &'a ResolverOptions,
    source: &'a dyn EnvSource,
}

impl<'a> EnvironmentHandler<'a> {
    pub fn new(options: &'a ResolverOptions, source: &'a dyn EnvSource) -> Self {
        Self { options, source }
    }

    /// Get the environment variable name for a declared name
    ///
    /// Format: {PREFIX}_{NAME} when a prefix is configured, otherwise {NAME}
    pub fn get_env_var_name(&self, declared: &str) -> String {
        self.options.env_name(declared)
    }

    /// Raw value for a declared name, after applying the empty-value rule
    ///
    /// Returns None when the variable is unset, or set to `""` while empty
    /// values count as unset.
    pub fn get_raw(&self, declared: &str) -> Option<String> {
        let name = self.get_env_var_name(declared);
        let value = self.source.var(&name)?;

        if value.is_empty() && self.options.empty_values == EmptyValue::Unset {
            return None;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnvSource;

    #[test]
    fn test_empty_counts_as_unset_by_default() {
        let options = ResolverOptions::default();
        let env = MapEnvSource::new().with("REDIS_HOST", "");
        let handler = EnvironmentHandler::new(&options, &env);

        assert_eq!(handler.get_raw("REDIS_HOST"), None);
    }

    #[test]
    fn test_empty_literal() {
        let options = ResolverOptions::builder()
            .empty_values(EmptyValue::Literal)
            .build();
        let env = MapEnvSource::new().with("REDIS_HOST", "");
        let handler = EnvironmentHandler::new(&options, &env);

        assert_eq!(handler.get_raw("REDIS_HOST").as_deref(), Some(""));
        assert_eq!(handler.get_raw("REDIS_PORT"), None);
    }

    #[test]
    fn test_prefixed_lookup() {
        let options = ResolverOptions::builder().with_env_prefix("blog").build();
        let env = MapEnvSource::new()
            .with("REDIS_PORT", "1")
            .with("BLOG_REDIS_PORT", "2");
        let handler = EnvironmentHandler::new(&options, &env);

        assert_eq!(handler.get_env_var_name("REDIS_PORT"), "BLOG_REDIS_PORT");
        assert_eq!(handler.get_raw("REDIS_PORT").as_deref(), Some("2"));
    }
}
