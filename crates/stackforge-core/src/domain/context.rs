//! Variable context for the post-copy render pass.

use std::collections::BTreeMap;

use chrono::{Datelike, Utc};

use crate::domain::config::ProjectConfig;

/// The key/value set substituted into `{{placeholder}}` markers.
///
/// Backed by a sorted map so iteration (and thus any diagnostic listing of
/// the variables) is deterministic. Unknown placeholders in a template are
/// left untouched; the renderer only replaces keys that exist here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// Derive the standard variable set from a configuration.
    pub fn from_config(config: &ProjectConfig) -> Self {
        let mut ctx = Self::default();
        ctx.insert("projectName", &config.name);
        ctx.insert("databaseType", config.database_type.as_str());
        ctx.insert("databaseProvider", &config.database_provider);
        ctx.insert("orm", config.orm.as_str());
        ctx.insert("hasAuth", if config.auth { "true" } else { "false" });
        ctx.insert("hasMailing", if config.mailing { "true" } else { "false" });
        ctx.insert("currentYear", &Utc::now().year().to_string());
        ctx
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{DatabaseType, Orm};

    #[test]
    fn standard_variables_are_derived() {
        let mut config = ProjectConfig::new("my-app");
        config.database_type = DatabaseType::Postgresql;
        config.database_provider = "neon".into();
        config.orm = Orm::Drizzle;
        config.auth = true;

        let ctx = RenderContext::from_config(&config);
        assert_eq!(ctx.get("projectName"), Some("my-app"));
        assert_eq!(ctx.get("databaseType"), Some("postgresql"));
        assert_eq!(ctx.get("databaseProvider"), Some("neon"));
        assert_eq!(ctx.get("orm"), Some("drizzle"));
        assert_eq!(ctx.get("hasAuth"), Some("true"));
        assert_eq!(ctx.get("hasMailing"), Some("false"));
        assert!(ctx.get("currentYear").is_some());
    }

    #[test]
    fn with_variable_overrides() {
        let ctx = RenderContext::default()
            .with_variable("projectName", "a")
            .with_variable("projectName", "b");
        assert_eq!(ctx.get("projectName"), Some("b"));
    }

    #[test]
    fn unknown_key_is_none() {
        assert_eq!(RenderContext::default().get("nope"), None);
    }

    #[test]
    fn iteration_is_sorted() {
        let ctx = RenderContext::default()
            .with_variable("zeta", "1")
            .with_variable("alpha", "2");
        let keys: Vec<_> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
