//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use stackforge_core::domain::{
    Baas, DatabaseType, FeatureCategory, Orm, PackageManager, UiLibrary,
};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stackforge",
    bin_name = "stackforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Full-stack web-app scaffolding from composable templates",
    long_about = "Stackforge composes a Next.js project from feature template \
                  fragments: base, ORM, auth, BaaS, mailing, and UI library.",
    after_help = "EXAMPLES:\n\
        \x20 stackforge new my-app --db postgresql --orm drizzle --auth\n\
        \x20 stackforge new my-app --ui shadcn --mailing --mailing-provider resend\n\
        \x20 stackforge add mailing --provider resend\n\
        \x20 stackforge completions bash > /usr/share/bash-completion/completions/stackforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from the template catalog.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 stackforge new my-app\n\
            \x20 stackforge new my-app --db postgresql --orm drizzle --auth --ui shadcn\n\
            \x20 stackforge new my-app --stack ../other-app/.stackrc\n\
            \x20 stackforge new my-app --install --pm pnpm"
    )]
    New(NewArgs),

    /// Add a feature to an existing project.
    #[command(
        about = "Add a feature to an existing project",
        after_help = "EXAMPLES:\n\
            \x20 stackforge add auth\n\
            \x20 stackforge add auth --provider lucia\n\
            \x20 stackforge add mailing --provider resend --dir ./my-app"
    )]
    Add(AddArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stackforge completions bash > ~/.local/share/bash-completion/completions/stackforge\n\
            \x20 stackforge completions zsh  > ~/.zfunc/_stackforge\n\
            \x20 stackforge completions fish > ~/.config/fish/completions/stackforge.fish"
    )]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `stackforge new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name. The project is created at `./<name>`.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// UI component library.
    #[arg(
        short = 'u',
        long = "ui",
        value_name = "LIBRARY",
        value_enum,
        default_value = "none",
        help = "UI component library"
    )]
    pub ui: UiOpt,

    /// Database engine.
    #[arg(
        short = 'd',
        long = "db",
        value_name = "DATABASE",
        value_enum,
        default_value = "none",
        help = "Database engine"
    )]
    pub database: DatabaseOpt,

    /// Database hosting provider (free-form, feeds templating only).
    #[arg(
        long = "db-provider",
        value_name = "PROVIDER",
        default_value = "none",
        help = "Database hosting provider (e.g. neon, planetscale)"
    )]
    pub database_provider: String,

    /// ORM. Requires a database engine.
    #[arg(
        short = 'o',
        long = "orm",
        value_name = "ORM",
        value_enum,
        default_value = "none",
        help = "Object-relational mapper"
    )]
    pub orm: OrmOpt,

    /// Backend-as-a-service provider.
    #[arg(
        long = "baas",
        value_name = "PROVIDER",
        value_enum,
        default_value = "none",
        help = "Backend-as-a-service provider"
    )]
    pub baas: BaasOpt,

    /// Enable authentication.
    #[arg(short = 'a', long = "auth", help = "Include authentication")]
    pub auth: bool,

    /// Authentication provider (default: nextauth).
    #[arg(
        long = "auth-provider",
        value_name = "PROVIDER",
        help = "Auth provider (nextauth, lucia, clerk)"
    )]
    pub auth_provider: Option<String>,

    /// Enable transactional mailing.
    #[arg(short = 'm', long = "mailing", help = "Include mailing setup")]
    pub mailing: bool,

    /// Mailing provider (default: nodemailer).
    #[arg(
        long = "mailing-provider",
        value_name = "PROVIDER",
        help = "Mailing provider (nodemailer, resend, sendgrid, postmark)"
    )]
    pub mailing_provider: Option<String>,

    /// Install dependencies after composition.
    #[arg(short = 'i', long = "install", help = "Run the package manager install step")]
    pub install: bool,

    /// Package manager for the install step.
    #[arg(
        long = "pm",
        value_name = "MANAGER",
        value_enum,
        help = "Package manager (npm, pnpm, yarn, bun)"
    )]
    pub package_manager: Option<PackageManagerOpt>,

    /// Recreate the stack from an existing `.stackrc`.
    ///
    /// Stack-selection flags (`--ui`, `--db`, ...) are ignored when this is
    /// set; `--install` and `--pm` still apply.
    #[arg(
        long = "stack",
        value_name = "FILE",
        help = "Replay a .stackrc stack record"
    )]
    pub stack: Option<PathBuf>,
}

// ── add ───────────────────────────────────────────────────────────────────────

/// Arguments for `stackforge add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Feature category to add.
    #[arg(value_enum, help = "Feature to add")]
    pub feature: FeatureOpt,

    /// Provider within the feature category.
    #[arg(
        short = 'p',
        long = "provider",
        value_name = "PROVIDER",
        help = "Feature provider (defaults per feature)"
    )]
    pub provider: Option<String>,

    /// Project directory.
    #[arg(
        long = "dir",
        value_name = "DIR",
        default_value = ".",
        help = "Project directory"
    )]
    pub dir: PathBuf,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stackforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// UI library choices at the CLI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum UiOpt {
    None,
    Shadcn,
    Chakra,
    Mantine,
    Nextui,
}

impl From<UiOpt> for UiLibrary {
    fn from(opt: UiOpt) -> Self {
        match opt {
            UiOpt::None => Self::None,
            UiOpt::Shadcn => Self::Shadcn,
            UiOpt::Chakra => Self::Chakra,
            UiOpt::Mantine => Self::Mantine,
            UiOpt::Nextui => Self::Nextui,
        }
    }
}

/// Database engine choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum DatabaseOpt {
    None,
    /// Also accepted as `pg` or `postgres`.
    #[value(alias = "pg", alias = "postgres")]
    Postgresql,
    Mysql,
    Sqlite,
}

impl From<DatabaseOpt> for DatabaseType {
    fn from(opt: DatabaseOpt) -> Self {
        match opt {
            DatabaseOpt::None => Self::None,
            DatabaseOpt::Postgresql => Self::Postgresql,
            DatabaseOpt::Mysql => Self::Mysql,
            DatabaseOpt::Sqlite => Self::Sqlite,
        }
    }
}

/// ORM choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OrmOpt {
    None,
    Prisma,
    Drizzle,
}

impl From<OrmOpt> for Orm {
    fn from(opt: OrmOpt) -> Self {
        match opt {
            OrmOpt::None => Self::None,
            OrmOpt::Prisma => Self::Prisma,
            OrmOpt::Drizzle => Self::Drizzle,
        }
    }
}

/// BaaS choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum BaasOpt {
    None,
    Supabase,
}

impl From<BaasOpt> for Baas {
    fn from(opt: BaasOpt) -> Self {
        match opt {
            BaasOpt::None => Self::None,
            BaasOpt::Supabase => Self::Supabase,
        }
    }
}

/// Package manager choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PackageManagerOpt {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl From<PackageManagerOpt> for PackageManager {
    fn from(opt: PackageManagerOpt) -> Self {
        match opt {
            PackageManagerOpt::Npm => Self::Npm,
            PackageManagerOpt::Pnpm => Self::Pnpm,
            PackageManagerOpt::Yarn => Self::Yarn,
            PackageManagerOpt::Bun => Self::Bun,
        }
    }
}

/// Retrofittable feature categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum FeatureOpt {
    Auth,
    Mailing,
}

impl From<FeatureOpt> for FeatureCategory {
    fn from(opt: FeatureOpt) -> Self {
        match opt {
            FeatureOpt::Auth => Self::Auth,
            FeatureOpt::Mailing => Self::Mailing,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
