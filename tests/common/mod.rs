//! Common test utilities for wpenv integration tests
//!
//! Provides shared setting tables, environments and helper functions.

#![allow(dead_code)]

use wpenv::{
    ConfigResolver, MapEnvSource, ResolvedConfig, SettingSpec, SettingValue, settings, wordpress,
};

// =============================================================================
// Setting Tables
// =============================================================================

/// A small table covering every kind, a secret and a fixed setting
pub fn sample_settings() -> Vec<SettingSpec> {
    settings! {
        "SITE_NAME" => SettingSpec::string("example").env("SITE_NAME")
            .category("general"),
        "SITE_DEBUG" => SettingSpec::boolean(false).env("SITE_DEBUG")
            .category("general"),
        "SITE_WORKERS" => SettingSpec::integer(4).env("SITE_WORKERS")
            .category("general"),
        "SITE_TOKEN" => SettingSpec::string("changeme").env("SITE_TOKEN")
            .category("security")
            .secret(),
        "SITE_CHARSET" => SettingSpec::string("utf8mb4")
            .category("general"),
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Resolver over the WordPress table with default options
pub fn wordpress_resolver() -> ConfigResolver {
    ConfigResolver::new(wordpress::settings()).expect("WordPress table must be valid")
}

/// Resolve the WordPress table against the given variables
pub fn resolve_wordpress(vars: &[(&str, &str)]) -> ResolvedConfig {
    let env: MapEnvSource = vars.iter().copied().collect();
    wordpress_resolver().resolve(&env)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Route resolver log output through the test harness
pub fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Keys whose value differs from the declared default
pub fn changed_keys(config: &ResolvedConfig, specs: &[SettingSpec]) -> Vec<String> {
    specs
        .iter()
        .filter(|spec| config.get(&spec.key) != Some(&spec.default))
        .map(|spec| spec.key.clone())
        .collect()
}

/// Assert every key resolved to its declared default
pub fn assert_all_defaults(config: &ResolvedConfig, specs: &[SettingSpec]) {
    for spec in specs {
        let value: Option<&SettingValue> = config.get(&spec.key);
        assert_eq!(value, Some(&spec.default), "key {}", spec.key);
    }
}
