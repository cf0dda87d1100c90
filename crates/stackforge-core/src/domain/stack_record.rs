//! The persisted stack record (`.stackrc`).
//!
//! A project created by the engine carries a small JSON file at its root
//! recording which stack choices produced it. It is read back by the
//! retrofit path (to know what is already installed) and by stack replay
//! (to recreate an equivalent project elsewhere).
//!
//! Loading is deliberately forgiving in one direction and strict in the
//! other: *missing* optional fields are backfilled with their defaults,
//! because older records predate some fields; *malformed* fields (wrong
//! type, unknown enum value) are schema violations, reported all at once
//! with their field path rather than failing on the first one.
//!
//! Unknown top-level keys a user added by hand survive load/store untouched.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::config::{
    AuthProvider, Baas, DatabaseType, MailingProvider, Orm, PackageManager, ProjectConfig,
    UiLibrary,
};

/// Filename of the stack record at the project root.
pub const STACK_FILE: &str = ".stackrc";

// ── SchemaViolation ───────────────────────────────────────────────────────────

/// One malformed field in a stack record, addressed by its JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

// ── StackRecord ───────────────────────────────────────────────────────────────

/// The typed contents of `.stackrc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackRecord {
    pub project_name: String,
    pub ui: UiLibrary,
    pub database_type: DatabaseType,
    pub database_provider: String,
    pub orm: Orm,
    pub baas: Baas,
    pub auth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<AuthProvider>,
    pub mailing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_provider: Option<MailingProvider>,
    pub install_deps: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
    /// Redundant per-category summary for quick inspection: the provider or
    /// selection name when a category is on, `false` when it is off.
    /// Recomputed from the typed fields on every save, never trusted on load.
    pub features: Map<String, Value>,
    pub created_at: String,
    pub last_updated: String,
    /// Keys this version does not know about, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StackRecord {
    /// Build a fresh record from a configuration, stamping both timestamps
    /// with the current time.
    pub fn from_config(config: &ProjectConfig) -> Self {
        let now = Utc::now().to_rfc3339();
        let mut record = Self {
            project_name: config.name.clone(),
            ui: config.ui,
            database_type: config.database_type,
            database_provider: config.database_provider.clone(),
            orm: config.orm,
            baas: config.baas,
            auth: config.auth,
            auth_provider: config.auth_provider,
            mailing: config.mailing,
            mailing_provider: config.mailing_provider,
            install_deps: config.install_deps,
            package_manager: config.package_manager,
            features: Map::new(),
            created_at: now.clone(),
            last_updated: now,
            extra: Map::new(),
        };
        record.features = record.feature_summary();
        record
    }

    /// Build the per-category summary from the typed fields.
    fn feature_summary(&self) -> Map<String, Value> {
        let on = |enabled: bool, name: &str| {
            if enabled {
                Value::String(name.to_string())
            } else {
                Value::Bool(false)
            }
        };

        let mut features = Map::new();
        features.insert("ui".into(), on(self.ui != UiLibrary::None, self.ui.as_str()));
        features.insert(
            "orm".into(),
            on(self.orm != Orm::None, self.orm.as_str()),
        );
        features.insert(
            "auth".into(),
            on(
                self.auth,
                self.auth_provider.unwrap_or(AuthProvider::Nextauth).as_str(),
            ),
        );
        features.insert(
            "baas".into(),
            on(self.baas != Baas::None, self.baas.as_str()),
        );
        features.insert(
            "mailing".into(),
            on(
                self.mailing,
                self.mailing_provider
                    .unwrap_or(MailingProvider::Nodemailer)
                    .as_str(),
            ),
        );
        features
    }

    /// Reconstruct the configuration this record describes.
    pub fn to_config(&self) -> ProjectConfig {
        ProjectConfig {
            name: self.project_name.clone(),
            ui: self.ui,
            database_type: self.database_type,
            database_provider: self.database_provider.clone(),
            orm: self.orm,
            baas: self.baas,
            auth: self.auth,
            auth_provider: self.auth_provider,
            mailing: self.mailing,
            mailing_provider: self.mailing_provider,
            install_deps: self.install_deps,
            package_manager: self.package_manager,
        }
    }

    /// Validate and load a record from parsed JSON.
    ///
    /// All violations are collected before returning, so a hand-edited file
    /// with three broken fields reports three paths, not one. Missing
    /// optional fields backfill their defaults; a missing `projectName` is
    /// the only required-field violation.
    pub fn from_value(value: &Value) -> Result<Self, Vec<SchemaViolation>> {
        let Some(obj) = value.as_object() else {
            return Err(vec![SchemaViolation::new("$", "expected a JSON object")]);
        };

        let mut violations = Vec::new();

        let project_name = match obj.get("projectName") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) => {
                violations.push(SchemaViolation::new("projectName", "must not be empty"));
                String::new()
            }
            Some(_) => {
                violations.push(SchemaViolation::new("projectName", "expected a string"));
                String::new()
            }
            None => {
                violations.push(SchemaViolation::new("projectName", "missing required field"));
                String::new()
            }
        };

        let ui = parse_enum_field(obj, "ui", UiLibrary::None, &mut violations);
        let database_type =
            parse_enum_field(obj, "databaseType", DatabaseType::None, &mut violations);
        let orm = parse_enum_field(obj, "orm", Orm::None, &mut violations);
        let baas = parse_enum_field(obj, "baas", Baas::None, &mut violations);

        let database_provider = parse_string_field(obj, "databaseProvider", "none", &mut violations);

        let auth = parse_bool_field(obj, "auth", false, &mut violations);
        let mailing = parse_bool_field(obj, "mailing", false, &mut violations);
        let install_deps = parse_bool_field(obj, "installDeps", false, &mut violations);

        let auth_provider = parse_auth_provider(obj, &mut violations);
        let mailing_provider =
            parse_optional_enum(obj, "mailingProvider", &mut violations);
        let package_manager = parse_optional_enum(obj, "packageManager", &mut violations);

        let created_at = parse_string_field(obj, "createdAt", "", &mut violations);
        let last_updated = parse_string_field(obj, "lastUpdated", "", &mut violations);

        if !violations.is_empty() {
            return Err(violations);
        }

        let known = [
            "projectName",
            "ui",
            "databaseType",
            "databaseProvider",
            "orm",
            "baas",
            "auth",
            "authProvider",
            "mailing",
            "mailingProvider",
            "installDeps",
            "packageManager",
            "features",
            "createdAt",
            "lastUpdated",
        ];
        let extra: Map<String, Value> = obj
            .iter()
            .filter(|(k, _)| !known.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut record = Self {
            project_name,
            ui,
            database_type,
            database_provider,
            orm,
            baas,
            auth,
            auth_provider,
            mailing,
            mailing_provider,
            install_deps,
            package_manager,
            features: Map::new(),
            created_at,
            last_updated,
            extra,
        };
        record.features = record.feature_summary();
        Ok(record)
    }

    pub fn from_json(text: &str) -> Result<Self, Vec<SchemaViolation>> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| vec![SchemaViolation::new("$", format!("invalid JSON: {e}"))])?;
        Self::from_value(&value)
    }

    /// Deterministic two-space pretty serialization, newline-terminated.
    pub fn to_json_pretty(&self) -> String {
        let mut out = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into());
        out.push('\n');
        out
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now().to_rfc3339();
    }
}

// ── Field parsers ─────────────────────────────────────────────────────────────

fn parse_enum_field<T>(
    obj: &Map<String, Value>,
    field: &str,
    default: T,
    violations: &mut Vec<SchemaViolation>,
) -> T
where
    T: std::str::FromStr,
{
    match obj.get(field) {
        None | Some(Value::Null) => default,
        Some(Value::String(s)) => match s.parse() {
            Ok(v) => v,
            Err(_) => {
                violations.push(SchemaViolation::new(field, format!("unknown value: {s}")));
                default
            }
        },
        Some(_) => {
            violations.push(SchemaViolation::new(field, "expected a string"));
            default
        }
    }
}

fn parse_optional_enum<T>(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<SchemaViolation>,
) -> Option<T>
where
    T: std::str::FromStr,
{
    match obj.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match s.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                violations.push(SchemaViolation::new(field, format!("unknown value: {s}")));
                None
            }
        },
        Some(_) => {
            violations.push(SchemaViolation::new(field, "expected a string"));
            None
        }
    }
}

/// Early records wrote `authProvider: "supabase"` before BaaS became its own
/// field; that value is dropped on load rather than reported.
fn parse_auth_provider(
    obj: &Map<String, Value>,
    violations: &mut Vec<SchemaViolation>,
) -> Option<AuthProvider> {
    if let Some(Value::String(s)) = obj.get("authProvider") {
        if s == "supabase" {
            return None;
        }
    }
    parse_optional_enum(obj, "authProvider", violations)
}

fn parse_string_field(
    obj: &Map<String, Value>,
    field: &str,
    default: &str,
    violations: &mut Vec<SchemaViolation>,
) -> String {
    match obj.get(field) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            violations.push(SchemaViolation::new(field, "expected a string"));
            default.to_string()
        }
    }
}

fn parse_bool_field(
    obj: &Map<String, Value>,
    field: &str,
    default: bool,
    violations: &mut Vec<SchemaViolation>,
) -> bool {
    match obj.get(field) {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            violations.push(SchemaViolation::new(field, "expected a boolean"));
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_through_config() {
        let mut config = ProjectConfig::new("demo");
        config.database_type = DatabaseType::Postgresql;
        config.orm = Orm::Prisma;
        config.auth = true;
        config.auth_provider = Some(AuthProvider::Lucia);

        let record = StackRecord::from_config(&config);
        assert_eq!(record.to_config(), config);
        assert_eq!(record.created_at, record.last_updated);
    }

    #[test]
    fn loads_complete_record() {
        let record = StackRecord::from_value(&json!({
            "projectName": "demo",
            "ui": "shadcn",
            "databaseType": "postgresql",
            "databaseProvider": "neon",
            "orm": "drizzle",
            "baas": "none",
            "auth": true,
            "authProvider": "nextauth",
            "mailing": false,
            "installDeps": true,
            "packageManager": "pnpm",
            "createdAt": "2024-01-01T00:00:00Z",
            "lastUpdated": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.project_name, "demo");
        assert_eq!(record.ui, UiLibrary::Shadcn);
        assert_eq!(record.package_manager, Some(PackageManager::Pnpm));
    }

    #[test]
    fn missing_optional_fields_backfill_defaults() {
        let record = StackRecord::from_value(&json!({
            "projectName": "demo",
            "auth": false,
            "mailing": false
        }))
        .unwrap();

        assert_eq!(record.ui, UiLibrary::None);
        assert_eq!(record.database_type, DatabaseType::None);
        assert_eq!(record.database_provider, "none");
        assert_eq!(record.orm, Orm::None);
        assert_eq!(record.baas, Baas::None);
        assert!(!record.install_deps);
    }

    #[test]
    fn missing_project_name_is_a_violation() {
        let violations = StackRecord::from_value(&json!({"auth": true})).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "projectName");
    }

    #[test]
    fn all_violations_are_collected() {
        let violations = StackRecord::from_value(&json!({
            "projectName": "demo",
            "ui": "angular",
            "databaseType": 42,
            "auth": "yes"
        }))
        .unwrap_err();

        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["ui", "databaseType", "auth"]);
    }

    #[test]
    fn non_object_root_is_a_violation() {
        let violations = StackRecord::from_value(&json!([1, 2])).unwrap_err();
        assert_eq!(violations[0].path, "$");
    }

    #[test]
    fn invalid_json_text_is_a_violation() {
        let violations = StackRecord::from_json("{not json").unwrap_err();
        assert!(violations[0].message.contains("invalid JSON"));
    }

    #[test]
    fn legacy_supabase_auth_provider_is_dropped() {
        let record = StackRecord::from_value(&json!({
            "projectName": "demo",
            "auth": true,
            "authProvider": "supabase"
        }))
        .unwrap();
        assert_eq!(record.auth_provider, None);
    }

    #[test]
    fn unknown_top_level_keys_survive() {
        let record = StackRecord::from_value(&json!({
            "projectName": "demo",
            "customNote": "hand-edited"
        }))
        .unwrap();

        assert_eq!(record.extra["customNote"], json!("hand-edited"));
        assert!(record.to_json_pretty().contains("customNote"));
    }

    #[test]
    fn feature_summary_names_enabled_categories() {
        let mut config = ProjectConfig::new("demo");
        config.orm = Orm::Drizzle;
        config.auth = true;

        let record = StackRecord::from_config(&config);
        assert_eq!(record.features["orm"], json!("drizzle"));
        assert_eq!(record.features["auth"], json!("nextauth"));
        assert_eq!(record.features["mailing"], json!(false));
        assert!(record.to_json_pretty().contains("\"features\""));
    }

    #[test]
    fn persisted_feature_summary_is_recomputed_on_load() {
        // A stale hand-edited summary never wins over the typed fields.
        let record = StackRecord::from_value(&json!({
            "projectName": "demo",
            "mailing": true,
            "mailingProvider": "resend",
            "features": {"mailing": false}
        }))
        .unwrap();
        assert_eq!(record.features["mailing"], json!("resend"));
        assert!(!record.extra.contains_key("features"));
    }

    #[test]
    fn touch_updates_only_last_updated() {
        let mut record = StackRecord::from_config(&ProjectConfig::new("demo"));
        let created = record.created_at.clone();
        record.touch();
        assert_eq!(record.created_at, created);
    }
}
