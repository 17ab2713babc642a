//! WordPress container configuration
//!
//! The setting table a containerized WordPress needs at boot, and a typed
//! view over the resolved values.
//!
//! | Key | Environment | Default |
//! |-----|-------------|---------|
//! | `DB_NAME` / `DB_USER` / `DB_PASSWORD` | `WORDPRESS_DB_*` | `wordpress` |
//! | `DB_HOST` | `WORDPRESS_DB_HOST` | `mysql:3306` |
//! | `AUTH_KEY` ... `NONCE_SALT` | `WORDPRESS_<KEY>` | placeholder phrase |
//! | `TABLE_PREFIX` | `WORDPRESS_TABLE_PREFIX` | `wp_` |
//! | `WP_DEBUG` / `WP_DEBUG_LOG` | `WORDPRESS_DEBUG` / `WORDPRESS_DEBUG_LOG` | `false` |
//! | `WP_REDIS_HOST` / `WP_REDIS_PORT` | `REDIS_HOST` / `REDIS_PORT` | `redis` / `6379` |
//! | `FORCE_SSL_ADMIN` | `WORDPRESS_FORCE_SSL` | `false` |
//!
//! Everything else in the table is fixed: charset, memory limits, script
//! compression, file editing and auto-update policy.

use crate::config::{EnvSource, ResolverOptions, SettingSpec, SettingsSchema};
use crate::error::Result;
use crate::resolver::{ConfigResolver, REDACTED, ResolvedConfig};
use crate::settings;
use log::warn;
use std::fmt;

/// Default value of every authentication key and salt
pub const PLACEHOLDER_PHRASE: &str = "put your unique phrase here";

/// Default MySQL port when `DB_HOST` does not carry one
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Setting keys
pub mod keys {
    pub const DB_NAME: &str = "DB_NAME";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASSWORD: &str = "DB_PASSWORD";
    pub const DB_HOST: &str = "DB_HOST";
    pub const DB_CHARSET: &str = "DB_CHARSET";
    pub const DB_COLLATE: &str = "DB_COLLATE";

    pub const AUTH_KEY: &str = "AUTH_KEY";
    pub const SECURE_AUTH_KEY: &str = "SECURE_AUTH_KEY";
    pub const LOGGED_IN_KEY: &str = "LOGGED_IN_KEY";
    pub const NONCE_KEY: &str = "NONCE_KEY";
    pub const AUTH_SALT: &str = "AUTH_SALT";
    pub const SECURE_AUTH_SALT: &str = "SECURE_AUTH_SALT";
    pub const LOGGED_IN_SALT: &str = "LOGGED_IN_SALT";
    pub const NONCE_SALT: &str = "NONCE_SALT";

    /// All authentication keys and salts, in declaration order
    pub const AUTH_SECRETS: [&str; 8] = [
        AUTH_KEY,
        SECURE_AUTH_KEY,
        LOGGED_IN_KEY,
        NONCE_KEY,
        AUTH_SALT,
        SECURE_AUTH_SALT,
        LOGGED_IN_SALT,
        NONCE_SALT,
    ];

    pub const TABLE_PREFIX: &str = "TABLE_PREFIX";

    pub const WP_DEBUG: &str = "WP_DEBUG";
    pub const WP_DEBUG_LOG: &str = "WP_DEBUG_LOG";
    pub const WP_DEBUG_DISPLAY: &str = "WP_DEBUG_DISPLAY";

    pub const WP_REDIS_HOST: &str = "WP_REDIS_HOST";
    pub const WP_REDIS_PORT: &str = "WP_REDIS_PORT";
    pub const WP_CACHE: &str = "WP_CACHE";

    pub const WP_MEMORY_LIMIT: &str = "WP_MEMORY_LIMIT";
    pub const WP_MAX_MEMORY_LIMIT: &str = "WP_MAX_MEMORY_LIMIT";
    pub const CONCATENATE_SCRIPTS: &str = "CONCATENATE_SCRIPTS";
    pub const COMPRESS_SCRIPTS: &str = "COMPRESS_SCRIPTS";
    pub const COMPRESS_CSS: &str = "COMPRESS_CSS";
    pub const ENFORCE_GZIP: &str = "ENFORCE_GZIP";

    pub const DISALLOW_FILE_EDIT: &str = "DISALLOW_FILE_EDIT";
    pub const FORCE_SSL_ADMIN: &str = "FORCE_SSL_ADMIN";

    pub const WP_AUTO_UPDATE_CORE: &str = "WP_AUTO_UPDATE_CORE";
}

fn auth_secret(env: &str, description: &str) -> SettingSpec {
    SettingSpec::string(PLACEHOLDER_PHRASE)
        .env(env)
        .category("authentication")
        .description(description)
        .secret()
}

/// The WordPress setting table
pub fn settings() -> Vec<SettingSpec> {
    settings! {
        // Database
        keys::DB_NAME => SettingSpec::string("wordpress")
            .env("WORDPRESS_DB_NAME")
            .category("database")
            .description("Name of the WordPress database"),
        keys::DB_USER => SettingSpec::string("wordpress")
            .env("WORDPRESS_DB_USER")
            .category("database")
            .description("MySQL user"),
        keys::DB_PASSWORD => SettingSpec::string("wordpress")
            .env("WORDPRESS_DB_PASSWORD")
            .category("database")
            .description("MySQL password")
            .secret(),
        keys::DB_HOST => SettingSpec::string("mysql:3306")
            .env("WORDPRESS_DB_HOST")
            .category("database")
            .description("MySQL host, optionally with `:port`"),
        keys::DB_CHARSET => SettingSpec::string("utf8mb4")
            .category("database")
            .description("Charset used when creating tables"),
        keys::DB_COLLATE => SettingSpec::string("")
            .category("database")
            .description("Collation; empty lets MySQL pick"),

        // Authentication keys and salts
        keys::AUTH_KEY => auth_secret("WORDPRESS_AUTH_KEY", "Authentication unique key"),
        keys::SECURE_AUTH_KEY => auth_secret("WORDPRESS_SECURE_AUTH_KEY", "Secure authentication unique key"),
        keys::LOGGED_IN_KEY => auth_secret("WORDPRESS_LOGGED_IN_KEY", "Logged-in cookie key"),
        keys::NONCE_KEY => auth_secret("WORDPRESS_NONCE_KEY", "Nonce key"),
        keys::AUTH_SALT => auth_secret("WORDPRESS_AUTH_SALT", "Authentication salt"),
        keys::SECURE_AUTH_SALT => auth_secret("WORDPRESS_SECURE_AUTH_SALT", "Secure authentication salt"),
        keys::LOGGED_IN_SALT => auth_secret("WORDPRESS_LOGGED_IN_SALT", "Logged-in cookie salt"),
        keys::NONCE_SALT => auth_secret("WORDPRESS_NONCE_SALT", "Nonce salt"),

        keys::TABLE_PREFIX => SettingSpec::string("wp_")
            .env("WORDPRESS_TABLE_PREFIX")
            .category("database")
            .description("Prefix for every WordPress table"),

        // Debugging
        keys::WP_DEBUG => SettingSpec::boolean(false)
            .env("WORDPRESS_DEBUG")
            .category("debugging")
            .description("Enable debug mode (only the literal `true` enables it)"),
        keys::WP_DEBUG_LOG => SettingSpec::boolean(false)
            .env("WORDPRESS_DEBUG_LOG")
            .category("debugging")
            .description("Write debug output to wp-content/debug.log"),
        keys::WP_DEBUG_DISPLAY => SettingSpec::boolean(false)
            .category("debugging")
            .description("Never print debug output into pages"),

        // Object cache
        keys::WP_REDIS_HOST => SettingSpec::string("redis")
            .env("REDIS_HOST")
            .category("cache")
            .description("Redis host for the object cache"),
        keys::WP_REDIS_PORT => SettingSpec::integer(6379)
            .env("REDIS_PORT")
            .category("cache")
            .description("Redis port; malformed values fall back to the default"),
        keys::WP_CACHE => SettingSpec::boolean(true)
            .category("cache")
            .description("Object cache is always enabled"),

        // Performance
        keys::WP_MEMORY_LIMIT => SettingSpec::string("256M").category("performance"),
        keys::WP_MAX_MEMORY_LIMIT => SettingSpec::string("512M").category("performance"),
        keys::CONCATENATE_SCRIPTS => SettingSpec::boolean(false).category("performance"),
        keys::COMPRESS_SCRIPTS => SettingSpec::boolean(true).category("performance"),
        keys::COMPRESS_CSS => SettingSpec::boolean(true).category("performance"),
        keys::ENFORCE_GZIP => SettingSpec::boolean(true).category("performance"),

        // Security
        keys::DISALLOW_FILE_EDIT => SettingSpec::boolean(true)
            .category("security")
            .description("Disable the theme and plugin editors"),
        keys::FORCE_SSL_ADMIN => SettingSpec::boolean(false)
            .env("WORDPRESS_FORCE_SSL")
            .category("security")
            .description("Require HTTPS for logins and the admin area"),

        keys::WP_AUTO_UPDATE_CORE => SettingSpec::string("minor")
            .category("updates")
            .description("Apply minor core updates automatically"),
    }
}

// =============================================================================
// Typed view
// =============================================================================

/// Database connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub name: String,
    pub user: String,
    password: String,
    pub host: String,
    pub charset: String,
    pub collate: String,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("host", &self.host)
            .field("charset", &self.charset)
            .field("collate", &self.collate)
            .finish()
    }
}

impl DatabaseSettings {
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Split `host` into host name and port.
    ///
    /// `mysql:3306` gives `("mysql", 3306)`, `db` gives `("db", 3306)` and
    /// `[::1]:3307` gives `("::1", 3307)`. An empty or out-of-range port
    /// (`mysql:`, `mysql:99999`) uses the default port. Anything after the last
    /// `:` that is not numeric (a socket path, a bare IPv6 address) keeps the
    /// whole string as the host.
    pub fn host_and_port(&self) -> (&str, u16) {
        let host = self.host.as_str();

        if let Some(rest) = host.strip_prefix('[') {
            if let Some((addr, tail)) = rest.split_once(']') {
                let port = tail
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_DB_PORT);
                return (addr, port);
            }
        }

        match host.rsplit_once(':') {
            Some((name, port))
                if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) =>
            {
                (name, port.parse().unwrap_or(DEFAULT_DB_PORT))
            }
            _ => (host, DEFAULT_DB_PORT),
        }
    }
}

/// Authentication keys and salts
#[derive(Clone, PartialEq, Eq)]
pub struct AuthKeys {
    values: [String; 8],
}

impl fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("AuthKeys");
        for name in keys::AUTH_SECRETS {
            debug.field(name, &REDACTED);
        }
        debug.finish()
    }
}

impl AuthKeys {
    /// Value of one key or salt, by setting key (e.g. `"NONCE_SALT"`)
    pub fn get(&self, key: &str) -> Option<&str> {
        keys::AUTH_SECRETS
            .iter()
            .position(|k| *k == key)
            .map(|i| self.values[i].as_str())
    }

    /// Names of the keys and salts still set to the placeholder phrase
    pub fn placeholders(&self) -> Vec<&'static str> {
        keys::AUTH_SECRETS
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| value.as_str() == PLACEHOLDER_PHRASE)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Debug output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugSettings {
    pub enabled: bool,
    pub log: bool,
    pub display: bool,
}

/// Redis object cache settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub host: String,
    pub port: i64,
}

impl CacheSettings {
    /// Connection URL, e.g. `redis://redis:6379`
    pub fn url(&self) -> String {
        format!("redis://{}:{}", self.host, self.port)
    }
}

/// Memory and asset delivery settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceSettings {
    pub memory_limit: String,
    pub max_memory_limit: String,
    pub concatenate_scripts: bool,
    pub compress_scripts: bool,
    pub compress_css: bool,
    pub enforce_gzip: bool,
}

/// Typed WordPress configuration
///
/// # Example
///
/// ```rust
/// use wpenv::{MapEnvSource, WordPressConfig};
///
/// let env = MapEnvSource::new()
///     .with("WORDPRESS_DEBUG", "true")
///     .with("REDIS_PORT", "7000");
/// let wp = WordPressConfig::from_source(&env)?;
///
/// assert!(wp.debug.enabled);
/// assert_eq!(wp.cache.url(), "redis://redis:7000");
/// assert_eq!(wp.database.host_and_port(), ("mysql", 3306));
/// # Ok::<(), wpenv::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPressConfig {
    pub database: DatabaseSettings,
    pub keys: AuthKeys,
    pub table_prefix: String,
    pub debug: DebugSettings,
    pub cache: CacheSettings,
    pub performance: PerformanceSettings,
    pub force_ssl_admin: bool,
    pub disallow_file_edit: bool,
    pub auto_update_core: String,
}

impl WordPressConfig {
    /// Resolve the WordPress table against `source` with default options.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in table is malformed.
    pub fn from_source(source: &dyn EnvSource) -> Result<Self> {
        ConfigResolver::for_schema::<Self>(ResolverOptions::default())?.resolve_as(source)
    }
}

impl SettingsSchema for WordPressConfig {
    fn get_settings() -> Vec<SettingSpec> {
        settings()
    }

    fn from_resolved(config: &ResolvedConfig) -> Result<Self> {
        let string = |key: &str| config.get_str(key).map(str::to_string);

        let mut values: [String; 8] = Default::default();
        for (slot, key) in values.iter_mut().zip(keys::AUTH_SECRETS) {
            *slot = string(key)?;
        }
        let auth_keys = AuthKeys { values };

        let placeholders = auth_keys.placeholders();
        if !placeholders.is_empty() {
            warn!(
                "Authentication keys still use the placeholder phrase: {}",
                placeholders.join(", ")
            );
        }

        Ok(Self {
            database: DatabaseSettings {
                name: string(keys::DB_NAME)?,
                user: string(keys::DB_USER)?,
                password: string(keys::DB_PASSWORD)?,
                host: string(keys::DB_HOST)?,
                charset: string(keys::DB_CHARSET)?,
                collate: string(keys::DB_COLLATE)?,
            },
            keys: auth_keys,
            table_prefix: string(keys::TABLE_PREFIX)?,
            debug: DebugSettings {
                enabled: config.get_bool(keys::WP_DEBUG)?,
                log: config.get_bool(keys::WP_DEBUG_LOG)?,
                display: config.get_bool(keys::WP_DEBUG_DISPLAY)?,
            },
            cache: CacheSettings {
                enabled: config.get_bool(keys::WP_CACHE)?,
                host: string(keys::WP_REDIS_HOST)?,
                port: config.get_int(keys::WP_REDIS_PORT)?,
            },
            performance: PerformanceSettings {
                memory_limit: string(keys::WP_MEMORY_LIMIT)?,
                max_memory_limit: string(keys::WP_MAX_MEMORY_LIMIT)?,
                concatenate_scripts: config.get_bool(keys::CONCATENATE_SCRIPTS)?,
                compress_scripts: config.get_bool(keys::COMPRESS_SCRIPTS)?,
                compress_css: config.get_bool(keys::COMPRESS_CSS)?,
                enforce_gzip: config.get_bool(keys::ENFORCE_GZIP)?,
            },
            force_ssl_admin: config.get_bool(keys::FORCE_SSL_ADMIN)?,
            disallow_file_edit: config.get_bool(keys::DISALLOW_FILE_EDIT)?,
            auto_update_core: string(keys::WP_AUTO_UPDATE_CORE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnvSource;

    fn database(host: &str) -> DatabaseSettings {
        DatabaseSettings {
            name: "wordpress".into(),
            user: "wordpress".into(),
            password: "secret".into(),
            host: host.into(),
            charset: "utf8mb4".into(),
            collate: String::new(),
        }
    }

    #[test]
    fn test_table_is_valid() {
        let resolver = ConfigResolver::new(settings()).unwrap();
        assert_eq!(resolver.specs().len(), 30);

        let env_backed = resolver.specs().iter().filter(|s| !s.is_fixed()).count();
        assert_eq!(env_backed, 18);
    }

    #[test]
    fn test_categories() {
        let categories = WordPressConfig::get_categories();
        assert_eq!(
            categories,
            vec![
                "database",
                "authentication",
                "debugging",
                "cache",
                "performance",
                "security",
                "updates"
            ]
        );
    }

    #[test]
    fn test_host_and_port() {
        assert_eq!(database("mysql:3306").host_and_port(), ("mysql", 3306));
        assert_eq!(database("db.internal").host_and_port(), ("db.internal", 3306));
        assert_eq!(database("db:3307").host_and_port(), ("db", 3307));
        assert_eq!(database("[::1]:3308").host_and_port(), ("::1", 3308));
        assert_eq!(database("[::1]").host_and_port(), ("::1", 3306));
        assert_eq!(database("mysql:").host_and_port(), ("mysql", 3306));
        assert_eq!(database("mysql:99999").host_and_port(), ("mysql", 3306));
        assert_eq!(database(":3307").host_and_port(), ("", 3307));
        assert_eq!(database("::1").host_and_port(), ("::1", 3306));
        assert_eq!(
            database("localhost:/run/mysqld/mysqld.sock").host_and_port(),
            ("localhost:/run/mysqld/mysqld.sock", 3306)
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let env = MapEnvSource::new()
            .with("WORDPRESS_DB_PASSWORD", "s3cr3t-pass")
            .with("WORDPRESS_NONCE_SALT", "s3cr3t-salt");
        let wp = WordPressConfig::from_source(&env).unwrap();

        assert_eq!(wp.database.password(), "s3cr3t-pass");
        assert_eq!(wp.keys.get(keys::NONCE_SALT), Some("s3cr3t-salt"));

        let debug = format!("{wp:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains(REDACTED));
    }

    #[test]
    fn test_placeholders() {
        let env = MapEnvSource::new()
            .with("WORDPRESS_AUTH_KEY", "a")
            .with("WORDPRESS_AUTH_SALT", "b");
        let wp = WordPressConfig::from_source(&env).unwrap();

        let placeholders = wp.keys.placeholders();
        assert_eq!(placeholders.len(), 6);
        assert!(!placeholders.contains(&keys::AUTH_KEY));
        assert!(placeholders.contains(&keys::NONCE_KEY));
    }

    #[test]
    fn test_from_resolved_reports_missing_keys() {
        let partial = ConfigResolver::new(settings! {
            keys::DB_NAME => SettingSpec::string("wordpress"),
        })
        .unwrap()
        .resolve(&MapEnvSource::new());

        let err = WordPressConfig::from_resolved(&partial).unwrap_err();
        assert!(err.is_not_found());
    }
}
