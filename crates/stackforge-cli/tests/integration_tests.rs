//! Integration tests for the `stackforge` binary.
//!
//! Each test gets its own working directory and template catalog on disk,
//! then drives the real binary through `assert_cmd`.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a minimal but realistic template catalog.
fn seed_templates(root: &Path) {
    let write = |rel: &str, contents: &str| {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    };

    write(
        "base/package.json",
        r#"{
  "name": "{{projectName}}",
  "version": "0.1.0",
  "dependencies": {"next": "14.0.0", "react": "^18"},
  "scripts": {"dev": "next dev", "build": "next build"}
}"#,
    );
    write(
        "base/tsconfig.json",
        r#"{"compilerOptions": {"strict": true}, "include": ["src"]}"#,
    );
    write("base/.env", "DATABASE_URL=postgres://localhost/dev\n");
    write("base/README.md", "# {{projectName}}\n");
    write("base/src/app/page.tsx", "export default function Page() {}\n");

    write(
        "drizzle/package.json",
        r#"{"dependencies": {"drizzle-orm": "^0.30"}, "scripts": {"db:push": "drizzle-kit push"}}"#,
    );
    write("drizzle/.env", "DB_POOL_SIZE=5\n");
    write("drizzle/src/db/schema.ts", "export const schema = {};\n");

    write(
        "nextauth/package.json",
        r#"{"dependencies": {"next-auth": "^4"}}"#,
    );
    write("nextauth/.env", "NEXTAUTH_SECRET=changeme\n");
    write("nextauth/src/auth/config.ts", "export const authConfig = {};\n");

    write(
        "mailing/package.json",
        r#"{"dependencies": {"nodemailer": "^6"}}"#,
    );
    write("mailing/.env", "SMTP_HOST=localhost\n");
    write("mailing/src/mail/send.ts", "export async function send() {}\n");
}

struct Sandbox {
    work: TempDir,
    templates: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let sandbox = Self {
            work: TempDir::new().unwrap(),
            templates: TempDir::new().unwrap(),
        };
        seed_templates(sandbox.templates.path());
        sandbox
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stackforge").unwrap();
        cmd.current_dir(self.work.path())
            .env_remove("STACKFORGE_TEMPLATES")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--templates")
            .arg(self.templates.path());
        cmd
    }

    fn project_file(&self, project: &str, rel: &str) -> String {
        fs::read_to_string(self.work.path().join(project).join(rel)).unwrap()
    }
}

#[test]
fn new_creates_a_base_project() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["new", "my-app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let manifest = sandbox.project_file("my-app", "package.json");
    assert!(manifest.contains("\"name\": \"my-app\""));

    let readme = sandbox.project_file("my-app", "README.md");
    assert_eq!(readme, "# my-app\n");

    assert!(sandbox.work.path().join("my-app/src/app/page.tsx").exists());
    assert!(sandbox.work.path().join("my-app/.stackrc").exists());
}

#[test]
fn new_with_orm_merges_manifests_and_env() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["new", "my-app", "--db", "postgresql", "--orm", "drizzle"])
        .assert()
        .success();

    let manifest = sandbox.project_file("my-app", "package.json");
    assert!(manifest.contains("\"drizzle-orm\": \"^0.30\""));
    assert!(manifest.contains("\"next\": \"14.0.0\""));
    assert!(manifest.contains("\"db:push\": \"drizzle-kit push\""));
    assert!(manifest.contains("\"dev\": \"next dev\""));

    let env = sandbox.project_file("my-app", ".env");
    assert!(env.contains("DATABASE_URL=postgres://localhost/dev"));
    assert!(env.contains("DB_POOL_SIZE=5"));
}

#[test]
fn unavailable_auth_provider_falls_back_with_warning() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["new", "my-app", "--auth", "--auth-provider", "clerk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("using 'nextauth'"));

    assert!(sandbox.work.path().join("my-app/src/auth/config.ts").exists());
}

#[test]
fn unknown_auth_provider_is_a_user_error() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["new", "my-app", "--auth", "--auth-provider", "okta"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("okta"));
}

#[test]
fn occupied_destination_is_a_user_error() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.work.path().join("my-app")).unwrap();
    fs::write(sandbox.work.path().join("my-app/keep.txt"), "x").unwrap();

    sandbox
        .cmd()
        .args(["new", "my-app"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not empty"));

    // Nothing was written next to the existing file.
    assert!(!sandbox.work.path().join("my-app/package.json").exists());
}

#[test]
fn missing_templates_directory_is_a_configuration_error() {
    let work = TempDir::new().unwrap();
    Command::cargo_bin("stackforge")
        .unwrap()
        .current_dir(work.path())
        .env_remove("STACKFORGE_TEMPLATES")
        .env("NO_COLOR", "1")
        .args(["new", "my-app", "--templates", "/definitely/not/here"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("templates"));
}

#[test]
fn add_mailing_retrofits_an_existing_project() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["new", "my-app"]).assert().success();

    sandbox
        .cmd()
        .args(["add", "mailing", "--dir", "my-app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added mailing"));

    let manifest = sandbox.project_file("my-app", "package.json");
    assert!(manifest.contains("\"nodemailer\": \"^6\""));

    let env = sandbox.project_file("my-app", ".env");
    assert!(env.contains("SMTP_HOST=localhost"));
    assert!(env.contains("DATABASE_URL=postgres://localhost/dev"));

    let record: serde_json::Value =
        serde_json::from_str(&sandbox.project_file("my-app", ".stackrc")).unwrap();
    assert_eq!(record["mailing"], serde_json::json!(true));
    assert_eq!(record["mailingProvider"], serde_json::json!("nodemailer"));
}

#[test]
fn add_outside_a_project_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["add", "auth", "--dir", "nowhere"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("No project found"));
}

#[test]
fn stack_replay_recreates_the_same_stack() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["new", "first", "--db", "postgresql", "--orm", "drizzle", "--auth"])
        .assert()
        .success();

    let stackrc = sandbox.work.path().join("first/.stackrc");
    sandbox
        .cmd()
        .args(["new", "second", "--stack"])
        .arg(&stackrc)
        .assert()
        .success();

    let record: serde_json::Value =
        serde_json::from_str(&sandbox.project_file("second", ".stackrc")).unwrap();
    assert_eq!(record["projectName"], serde_json::json!("second"));
    assert_eq!(record["orm"], serde_json::json!("drizzle"));
    assert_eq!(record["auth"], serde_json::json!(true));
    assert!(sandbox.work.path().join("second/src/db/schema.ts").exists());
}

#[test]
fn replaying_a_missing_stack_file_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["new", "my-app", "--stack", "ghost/.stackrc"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Stack file not found"));
}

#[test]
fn completions_render_for_bash() {
    Command::cargo_bin("stackforge")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stackforge"));
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("stackforge")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("completions"));
}
