//! Settings resolution
//!
//! This module contains the [`ConfigResolver`] which turns a setting table and
//! an environment source into an immutable [`ResolvedConfig`].

use crate::config::{EnvSource, ResolverOptions, SettingSpec, SettingsSchema};
use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::collections::HashSet;

mod env;
mod resolved;

use env::EnvironmentHandler;
pub use resolved::{Origin, REDACTED, ResolvedConfig, ResolvedSetting};

/// Resolves a validated setting table against an environment source.
///
/// The table is checked once, when the resolver is built. After that,
/// [`resolve`](ConfigResolver::resolve) cannot fail: every declared key ends up
/// with a value of its declared kind, falling back to the default whenever the
/// environment has nothing usable.
///
/// # Example
///
/// ```rust
/// use wpenv::{ConfigResolver, MapEnvSource, Origin, SettingSpec, settings};
///
/// let resolver = ConfigResolver::new(settings! {
///     "WP_DEBUG" => SettingSpec::boolean(false).env("WORDPRESS_DEBUG"),
///     "WP_REDIS_PORT" => SettingSpec::integer(6379).env("REDIS_PORT"),
/// })?;
///
/// let env = MapEnvSource::new()
///     .with("WORDPRESS_DEBUG", "true")
///     .with("REDIS_PORT", "abc");
/// let config = resolver.resolve(&env);
///
/// assert!(config.get_bool("WP_DEBUG")?);
/// assert_eq!(config.get_int("WP_REDIS_PORT")?, 6379);
/// assert_eq!(config.origin("WP_REDIS_PORT"), Some(Origin::Default));
/// # Ok::<(), wpenv::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    specs: Vec<SettingSpec>,
    options: ResolverOptions,
}

impl ConfigResolver {
    /// Create a resolver with default options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSetting` if a spec is malformed (empty key, bad env var
    /// name, default of the wrong kind) or a key is declared twice.
    pub fn new(specs: Vec<SettingSpec>) -> Result<Self> {
        Self::with_options(specs, ResolverOptions::default())
    }

    /// Create a resolver with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigResolver::new`].
    pub fn with_options(specs: Vec<SettingSpec>, options: ResolverOptions) -> Result<Self> {
        validate_table(&specs)?;
        debug!("Setting table validated ({} settings)", specs.len());
        Ok(Self { specs, options })
    }

    /// Create a resolver for the table of a [`SettingsSchema`].
    ///
    /// # Errors
    ///
    /// Same as [`ConfigResolver::new`].
    pub fn for_schema<S: SettingsSchema>(options: ResolverOptions) -> Result<Self> {
        Self::with_options(S::get_settings(), options)
    }

    /// Declared settings, in resolution order
    pub fn specs(&self) -> &[SettingSpec] {
        &self.specs
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve every declared setting against `source`.
    ///
    /// Pure with respect to `source`: the same source always yields an equal
    /// snapshot, and the source is only read.
    pub fn resolve(&self, source: &dyn EnvSource) -> ResolvedConfig {
        let handler = EnvironmentHandler::new(&self.options, source);
        let mut overridden = 0usize;

        let entries = self
            .specs
            .iter()
            .map(|spec| {
                let entry = resolve_one(spec, &handler);
                if entry.origin == Origin::Environment {
                    overridden += 1;
                }
                if spec.is_secret() {
                    debug!("Resolved {} from {:?} (secret)", entry.key, entry.origin);
                } else {
                    debug!(
                        "Resolved {} = {} from {:?}",
                        entry.key, entry.value, entry.origin
                    );
                }
                entry
            })
            .collect();

        let config = ResolvedConfig::from_entries(entries);
        info!(
            "Resolved {} settings ({} from environment, {} defaults)",
            config.len(),
            overridden,
            config.len() - overridden
        );
        config
    }

    /// Resolve and build the typed view of a [`SettingsSchema`].
    ///
    /// # Errors
    ///
    /// Returns whatever `S::from_resolved` reports, typically a
    /// `SettingNotFound` or `TypeMismatch` when this resolver's table does not
    /// match the schema.
    pub fn resolve_as<S: SettingsSchema>(&self, source: &dyn EnvSource) -> Result<S> {
        S::from_resolved(&self.resolve(source))
    }
}

/// Validate and resolve in one step.
///
/// # Errors
///
/// Returns `InvalidSetting` if the table is malformed; see [`ConfigResolver::new`].
pub fn resolve(specs: &[SettingSpec], source: &dyn EnvSource) -> Result<ResolvedConfig> {
    Ok(ConfigResolver::new(specs.to_vec())?.resolve(source))
}

fn validate_table(specs: &[SettingSpec]) -> Result<()> {
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        spec.validate_schema()?;
        if !seen.insert(spec.key.as_str()) {
            return Err(Error::invalid(&spec.key, "key is declared more than once"));
        }
    }
    Ok(())
}

fn resolve_one(spec: &SettingSpec, handler: &EnvironmentHandler<'_>) -> ResolvedSetting {
    let env = spec
        .env
        .as_deref()
        .map(|declared| handler.get_env_var_name(declared));

    let coerced = spec.env.as_deref().and_then(|declared| {
        let raw = handler.get_raw(declared)?;
        let value = spec.kind.coerce(&raw);
        if value.is_none() {
            let name = handler.get_env_var_name(declared);
            if spec.is_secret() {
                warn!("{name} is not a valid {}, using default", spec.kind);
            } else {
                warn!("{name}={raw:?} is not a valid {}, using default", spec.kind);
            }
        }
        value
    });

    let (value, origin) = match coerced {
        Some(value) => (value, Origin::Environment),
        None => (spec.default.clone(), Origin::Default),
    };

    ResolvedSetting {
        key: spec.key.clone(),
        env,
        value,
        origin,
        secret: spec.is_secret(),
    }
}
