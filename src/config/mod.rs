//! Core configuration types and traits
//!
//! This module contains the foundational types for settings resolution:
//! - `SettingSpec` - Declaration of one setting (key, env var, default, kind)
//! - `SettingsSchema` - Trait for typed views built from a setting table
//! - `EnvSource` - Where raw values come from
//! - `ResolverOptions` - Knobs for the resolver

mod schema;
mod types;

pub use schema::{SettingKind, SettingSpec, SettingValue, SettingsSchema, meta};

pub use types::{
    DefaultEnvSource, EmptyValue, EnvSource, FnEnvSource, MapEnvSource, ResolverOptions,
    ResolverOptionsBuilder, from_fn,
};
