//! Project configuration value objects.
//!
//! # Design
//!
//! These are pure value types: `Copy` where possible, equality-by-value, no
//! identity. They hold NO resolution logic. Which template fragment a choice
//! maps to lives in `resolver.rs`. This file's only job is to define the
//! types, their string representations, and their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Author the template fragment directory of the same name
//! 4. Done; nothing else changes

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── UiLibrary ─────────────────────────────────────────────────────────────────

/// A supported UI component library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiLibrary {
    #[default]
    None,
    Shadcn,
    Chakra,
    Mantine,
    Nextui,
}

impl UiLibrary {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Shadcn => "shadcn",
            Self::Chakra => "chakra",
            Self::Mantine => "mantine",
            Self::Nextui => "nextui",
        }
    }
}

impl fmt::Display for UiLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UiLibrary {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "shadcn" => Ok(Self::Shadcn),
            "chakra" => Ok(Self::Chakra),
            "mantine" => Ok(Self::Mantine),
            "nextui" => Ok(Self::Nextui),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown UI library: {other}"
            ))),
        }
    }
}

// ── DatabaseType ──────────────────────────────────────────────────────────────

/// The database engine the project targets.
///
/// Descriptive metadata only: together with [`ProjectConfig::database_provider`]
/// it feeds environment-variable templating and the persisted stack record.
/// Fragment selection is driven by the [`Orm`] choice, never by this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    None,
    Postgresql,
    Mysql,
    Sqlite,
}

impl DatabaseType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "postgresql" | "postgres" | "pg" => Ok(Self::Postgresql),
            "mysql" => Ok(Self::Mysql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown database type: {other}"
            ))),
        }
    }
}

// ── Orm ───────────────────────────────────────────────────────────────────────

/// The object-relational mapper whose fragment supplies the database setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orm {
    #[default]
    None,
    Prisma,
    Drizzle,
}

impl Orm {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Prisma => "prisma",
            Self::Drizzle => "drizzle",
        }
    }
}

impl fmt::Display for Orm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "prisma" => Ok(Self::Prisma),
            "drizzle" => Ok(Self::Drizzle),
            other => Err(DomainError::InvalidConfig(format!("unknown ORM: {other}"))),
        }
    }
}

// ── Baas ──────────────────────────────────────────────────────────────────────

/// Backend-as-a-service selection. Currently only one provider exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Baas {
    #[default]
    None,
    Supabase,
}

impl Baas {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Supabase => "supabase",
        }
    }
}

impl fmt::Display for Baas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Baas {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "supabase" => Ok(Self::Supabase),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown BaaS provider: {other}"
            ))),
        }
    }
}

// ── AuthProvider ──────────────────────────────────────────────────────────────

/// An authentication provider. Only meaningful when auth is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Nextauth,
    Lucia,
    Clerk,
}

impl AuthProvider {
    pub const ALL: [Self; 3] = [Self::Nextauth, Self::Lucia, Self::Clerk];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nextauth => "nextauth",
            Self::Lucia => "lucia",
            Self::Clerk => "clerk",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nextauth" | "next-auth" => Ok(Self::Nextauth),
            "lucia" => Ok(Self::Lucia),
            "clerk" => Ok(Self::Clerk),
            other => Err(DomainError::UnsupportedProvider {
                category: "auth",
                provider: other.to_string(),
                supported: vec!["nextauth", "lucia", "clerk"],
            }),
        }
    }
}

// ── MailingProvider ───────────────────────────────────────────────────────────

/// A transactional mail provider. Only meaningful when mailing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailingProvider {
    Nodemailer,
    Resend,
    Sendgrid,
    Postmark,
}

impl MailingProvider {
    pub const ALL: [Self; 4] = [
        Self::Nodemailer,
        Self::Resend,
        Self::Sendgrid,
        Self::Postmark,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nodemailer => "nodemailer",
            Self::Resend => "resend",
            Self::Sendgrid => "sendgrid",
            Self::Postmark => "postmark",
        }
    }
}

impl fmt::Display for MailingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailingProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nodemailer" => Ok(Self::Nodemailer),
            "resend" => Ok(Self::Resend),
            "sendgrid" => Ok(Self::Sendgrid),
            "postmark" => Ok(Self::Postmark),
            other => Err(DomainError::UnsupportedProvider {
                category: "mailing",
                provider: other.to_string(),
                supported: vec!["nodemailer", "resend", "sendgrid", "postmark"],
            }),
        }
    }
}

// ── PackageManager ────────────────────────────────────────────────────────────

/// The package manager used for the optional dependency-install step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// The executable invoked for installation.
    pub const fn command(&self) -> &'static str {
        self.as_str()
    }

    /// Arguments to that executable. Bare `yarn` installs; the rest take
    /// an explicit `install` subcommand.
    pub const fn install_args(&self) -> &'static [&'static str] {
        match self {
            Self::Yarn => &[],
            Self::Npm | Self::Pnpm | Self::Bun => &["install"],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown package manager: {other}"
            ))),
        }
    }
}

// ── ProjectConfig ─────────────────────────────────────────────────────────────

/// The validated, immutable record of user choices for one creation run.
///
/// Created once per run (from CLI flags or a replayed stack record) and
/// never mutated afterwards. When defaults must be backfilled (an older
/// record missing `baas`, say) a new value is derived via
/// [`ProjectConfig::normalized`].
///
/// Invariant: `auth_provider` / `mailing_provider` are only meaningful when
/// their parent toggle is enabled; `normalized()` clears them otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub ui: UiLibrary,
    #[serde(default)]
    pub database_type: DatabaseType,
    #[serde(default = "default_provider")]
    pub database_provider: String,
    #[serde(default)]
    pub orm: Orm,
    #[serde(default)]
    pub baas: Baas,
    pub auth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<AuthProvider>,
    pub mailing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailing_provider: Option<MailingProvider>,
    #[serde(default)]
    pub install_deps: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
}

fn default_provider() -> String {
    "none".to_string()
}

impl ProjectConfig {
    /// A minimal configuration with every feature disabled.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ui: UiLibrary::None,
            database_type: DatabaseType::None,
            database_provider: default_provider(),
            orm: Orm::None,
            baas: Baas::None,
            auth: false,
            auth_provider: None,
            mailing: false,
            mailing_provider: None,
            install_deps: false,
            package_manager: None,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidProjectName {
                name: self.name.clone(),
                reason: "name cannot be empty".into(),
            });
        }
        if self.name.contains('/') || self.name.contains('\\') {
            return Err(DomainError::InvalidProjectName {
                name: self.name.clone(),
                reason: "name cannot contain path separators".into(),
            });
        }
        Ok(())
    }

    /// Derive a configuration with disabled sub-choices cleared.
    ///
    /// Sub-choices of a disabled parent toggle are ignored per the config
    /// invariant; clearing them here means downstream code never has to
    /// re-check the toggle.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        if !out.auth {
            out.auth_provider = None;
        }
        if !out.mailing {
            out.mailing_provider = None;
        }
        if !out.install_deps {
            out.package_manager = None;
        }
        if out.database_type == DatabaseType::None {
            out.orm = Orm::None;
            out.database_provider = default_provider();
        }
        out
    }

    /// The auth provider that will actually be requested (default: nextauth).
    pub fn effective_auth_provider(&self) -> Option<AuthProvider> {
        self.auth
            .then(|| self.auth_provider.unwrap_or(AuthProvider::Nextauth))
    }

    /// The mailing provider that will actually be requested (default: nodemailer).
    pub fn effective_mailing_provider(&self) -> Option<MailingProvider> {
        self.mailing
            .then(|| self.mailing_provider.unwrap_or(MailingProvider::Nodemailer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase() {
        assert_eq!(UiLibrary::Shadcn.to_string(), "shadcn");
        assert_eq!(DatabaseType::Postgresql.to_string(), "postgresql");
        assert_eq!(Orm::Drizzle.to_string(), "drizzle");
        assert_eq!(AuthProvider::Nextauth.to_string(), "nextauth");
    }

    #[test]
    fn from_str_accepts_aliases() {
        assert_eq!(
            "pg".parse::<DatabaseType>().unwrap(),
            DatabaseType::Postgresql
        );
        assert_eq!(
            "next-auth".parse::<AuthProvider>().unwrap(),
            AuthProvider::Nextauth
        );
    }

    #[test]
    fn from_str_unknown_errors() {
        assert!("angular".parse::<UiLibrary>().is_err());
        assert!("mongo".parse::<DatabaseType>().is_err());
        assert!("".parse::<Orm>().is_err());
    }

    #[test]
    fn unsupported_provider_error_lists_supported_set() {
        let err = "okta".parse::<AuthProvider>().unwrap_err();
        match err {
            DomainError::UnsupportedProvider { supported, .. } => {
                assert!(supported.contains(&"nextauth"));
                assert!(supported.contains(&"clerk"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn package_manager_install_args() {
        assert_eq!(PackageManager::Yarn.install_args(), &[] as &[&str]);
        assert_eq!(PackageManager::Pnpm.install_args(), &["install"]);
    }

    #[test]
    fn empty_name_is_invalid() {
        let config = ProjectConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(DomainError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn path_separator_in_name_is_invalid() {
        assert!(ProjectConfig::new("a/b").validate().is_err());
        assert!(ProjectConfig::new("a\\b").validate().is_err());
    }

    #[test]
    fn valid_names_pass() {
        for name in &["my-app", "my_app", "demo123", "MyApp"] {
            assert!(ProjectConfig::new(*name).validate().is_ok());
        }
    }

    #[test]
    fn normalized_clears_disabled_sub_choices() {
        let mut config = ProjectConfig::new("demo");
        config.auth_provider = Some(AuthProvider::Clerk);
        config.mailing_provider = Some(MailingProvider::Resend);
        config.orm = Orm::Prisma;

        let normalized = config.normalized();
        assert_eq!(normalized.auth_provider, None);
        assert_eq!(normalized.mailing_provider, None);
        assert_eq!(normalized.orm, Orm::None);
    }

    #[test]
    fn normalized_keeps_enabled_sub_choices() {
        let mut config = ProjectConfig::new("demo");
        config.auth = true;
        config.auth_provider = Some(AuthProvider::Lucia);
        config.database_type = DatabaseType::Postgresql;
        config.orm = Orm::Drizzle;

        let normalized = config.normalized();
        assert_eq!(normalized.auth_provider, Some(AuthProvider::Lucia));
        assert_eq!(normalized.orm, Orm::Drizzle);
    }

    #[test]
    fn effective_providers_default_when_enabled() {
        let mut config = ProjectConfig::new("demo");
        assert_eq!(config.effective_auth_provider(), None);

        config.auth = true;
        config.mailing = true;
        assert_eq!(
            config.effective_auth_provider(),
            Some(AuthProvider::Nextauth)
        );
        assert_eq!(
            config.effective_mailing_provider(),
            Some(MailingProvider::Nodemailer)
        );
    }

    #[test]
    fn serde_uses_camel_case_field_names() {
        let mut config = ProjectConfig::new("demo");
        config.database_type = DatabaseType::Sqlite;
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"databaseType\":\"sqlite\""));
        assert!(json.contains("\"installDeps\":false"));
    }
}
