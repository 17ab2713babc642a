//! Documentation generator for setting tables
//!
//! Generates a markdown environment reference from `SettingSpec` metadata.

use crate::config::{SettingSpec, SettingValue, SettingsSchema, meta};
use crate::resolver::REDACTED;

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
    /// Whether to list fixed settings (no environment variable)
    pub include_fixed: bool,
    /// Whether to group by category
    pub group_by_category: bool,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group_by_category: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    #[must_use]
    pub fn include_fixed(mut self) -> Self {
        self.include_fixed = true;
        self
    }

    #[must_use]
    pub fn flat(mut self) -> Self {
        self.group_by_category = false;
        self
    }
}

/// Generate markdown documentation for a schema
#[must_use]
pub fn generate_docs<T: SettingsSchema>(config: DocsConfig) -> String {
    generate_docs_from_specs(&T::get_settings(), config)
}

/// Generate docs from a raw setting table
#[must_use]
pub fn generate_docs_from_specs(specs: &[SettingSpec], config: DocsConfig) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    let title = config
        .title
        .unwrap_or_else(|| "Environment Reference".to_string());
    let _ = writeln!(output, "# {title}\n");

    if let Some(desc) = config.description {
        let _ = writeln!(output, "{desc}\n");
    }

    let settings: Vec<&SettingSpec> = specs
        .iter()
        .filter(|s| config.include_fixed || !s.is_fixed())
        .collect();

    if config.group_by_category {
        // Categories in order of first appearance
        let mut categories: Vec<&str> = Vec::new();
        for spec in &settings {
            let category = category_of(spec);
            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        for category in categories {
            let _ = writeln!(output, "## {}\n", capitalize(category));
            table_header(&mut output);
            for spec in settings.iter().filter(|s| category_of(s) == category) {
                format_row(&mut output, spec);
            }
            output.push('\n');
        }
    } else {
        output.push_str("## Settings\n\n");
        table_header(&mut output);
        for spec in &settings {
            format_row(&mut output, spec);
        }
        output.push('\n');
    }

    output
}

fn category_of(spec: &SettingSpec) -> &str {
    spec.get_meta_str(meta::CATEGORY).unwrap_or("general")
}

fn table_header(out: &mut String) {
    out.push_str("| Variable | Setting | Default | Type | Notes |\n");
    out.push_str("|----------|---------|---------|------|-------|\n");
}

fn format_row(out: &mut String, spec: &SettingSpec) {
    use std::fmt::Write;

    let variable = spec
        .env
        .as_deref()
        .map_or_else(|| "*(fixed)*".to_string(), |name| format!("`{name}`"));

    let default = if spec.is_secret() {
        REDACTED.to_string()
    } else {
        format!("`{}`", format_value(&spec.default))
    };

    let mut notes = Vec::new();
    if spec.is_secret() {
        notes.push("**Secret**".to_string());
    }
    if let Some(desc) = spec.get_meta_str(meta::DESCRIPTION) {
        notes.push(desc.replace('|', "\\|"));
    }

    let _ = writeln!(
        out,
        "| {variable} | `{}` | {default} | {} | {} |",
        spec.key,
        spec.kind,
        notes.join(" ")
    );
}

fn format_value(v: &SettingValue) -> String {
    match v {
        SettingValue::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordpress::WordPressConfig;

    #[test]
    fn test_generate_docs() {
        let docs = generate_docs::<WordPressConfig>(
            DocsConfig::new()
                .with_title("WordPress Container")
                .with_description("Variables read at container start"),
        );

        assert!(docs.contains("# WordPress Container"));
        assert!(docs.contains("Variables read at container start"));
        assert!(docs.contains("## Database"));
        assert!(docs.contains("## Cache"));
        assert!(docs.contains("| `REDIS_PORT` | `WP_REDIS_PORT` | `6379` | integer |"));
        assert!(docs.contains("| `WORDPRESS_DEBUG` | `WP_DEBUG` | `false` | boolean |"));
        assert!(docs.contains("| `WORDPRESS_TABLE_PREFIX` | `TABLE_PREFIX` | `\"wp_\"` | string |"));
    }

    #[test]
    fn test_secrets_masked() {
        let docs = generate_docs::<WordPressConfig>(DocsConfig::new());

        assert!(docs.contains("**Secret**"));
        assert!(!docs.contains("put your unique phrase here"));
        assert!(docs.contains(&format!("| `WORDPRESS_DB_PASSWORD` | `DB_PASSWORD` | {REDACTED} |")));
    }

    #[test]
    fn test_fixed_settings_hidden_by_default() {
        let docs = generate_docs::<WordPressConfig>(DocsConfig::new());
        assert!(!docs.contains("DB_CHARSET"));
        assert!(!docs.contains("## Performance"));

        let docs = generate_docs::<WordPressConfig>(DocsConfig::new().include_fixed());
        assert!(docs.contains("| *(fixed)* | `DB_CHARSET` | `\"utf8mb4\"` | string |"));
        assert!(docs.contains("## Performance"));
    }

    #[test]
    fn test_flat_layout() {
        let docs = generate_docs::<WordPressConfig>(DocsConfig::new().flat());

        assert!(docs.contains("## Settings"));
        assert!(!docs.contains("## Database"));
    }
}
