//! # wpenv - typed environment configuration for containerized WordPress
//!
//! Resolves a table of typed settings from environment variables once at
//! startup, then hands the immutable result to the application.
//!
//! ## Features
//!
//! - **Typed settings**: string, boolean and integer kinds with declared defaults
//! - **Strict coercion**: booleans are `true` only for the literal `"true"`;
//!   malformed integers fall back to the default instead of failing
//! - **Immutable snapshot**: [`ResolvedConfig`] records each value and whether
//!   it came from the environment or the default
//! - **WordPress table**: the database, auth keys, debug, Redis and hardening
//!   settings a WordPress container needs, with a typed [`WordPressConfig`] view
//! - **Bootstrap hand-off**: export the resolved constants to an entry point
//! - **Docs**: markdown environment reference generated from the table
//!
//! ## Quick Start
//!
//! ```rust
//! use wpenv::{ConfigResolver, MapEnvSource, SettingSpec, settings};
//!
//! let resolver = ConfigResolver::new(settings! {
//!     "DB_HOST" => SettingSpec::string("mysql:3306").env("WORDPRESS_DB_HOST"),
//!     "WP_DEBUG" => SettingSpec::boolean(false).env("WORDPRESS_DEBUG"),
//!     "WP_REDIS_PORT" => SettingSpec::integer(6379).env("REDIS_PORT"),
//! })?;
//!
//! let env = MapEnvSource::new().with("REDIS_PORT", "7000");
//! let config = resolver.resolve(&env);
//!
//! assert_eq!(config.get_str("DB_HOST")?, "mysql:3306");
//! assert!(!config.get_bool("WP_DEBUG")?);
//! assert_eq!(config.get_int("WP_REDIS_PORT")?, 7000);
//! # Ok::<(), wpenv::Error>(())
//! ```
//!
//! ## Reading the process environment
//!
//! ```rust,no_run
//! use wpenv::{DefaultEnvSource, WordPressConfig};
//!
//! let wp = WordPressConfig::from_source(&DefaultEnvSource)?;
//! println!("connecting to {}", wp.cache.url());
//! # Ok::<(), wpenv::Error>(())
//! ```
//!
//! ## Empty values
//!
//! By default a variable set to `""` is treated exactly like an unset one.
//! Choose [`EmptyValue::Literal`] to keep explicit empty strings:
//!
//! ```rust
//! use wpenv::{ConfigResolver, EmptyValue, MapEnvSource, ResolverOptions, SettingSpec, settings};
//!
//! let options = ResolverOptions::builder()
//!     .empty_values(EmptyValue::Literal)
//!     .build();
//! let resolver = ConfigResolver::with_options(
//!     settings! { "DB_COLLATE" => SettingSpec::string("utf8mb4_unicode_ci").env("DB_COLLATE") },
//!     options,
//! )?;
//!
//! let config = resolver.resolve(&MapEnvSource::new().with("DB_COLLATE", ""));
//! assert_eq!(config.get_str("DB_COLLATE")?, "");
//! # Ok::<(), wpenv::Error>(())
//! ```

// Core modules
mod bootstrap;
mod docs;
mod error;
mod resolver;
pub mod wordpress;

// Grouped modules
pub mod config;

// Re-exports from core
pub use bootstrap::{Bootstrap, CommandBootstrap};
pub use docs::{DocsConfig, generate_docs, generate_docs_from_specs};
pub use error::{Error, Result};
pub use resolver::{ConfigResolver, Origin, REDACTED, ResolvedConfig, ResolvedSetting, resolve};
pub use wordpress::WordPressConfig;

// Re-exports from config
pub use config::{
    DefaultEnvSource, EmptyValue, EnvSource, FnEnvSource, MapEnvSource, ResolverOptions,
    ResolverOptionsBuilder, SettingKind, SettingSpec, SettingValue, SettingsSchema, from_fn,
};
