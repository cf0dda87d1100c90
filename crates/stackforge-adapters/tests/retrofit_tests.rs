//! Retrofit runs against an already-scaffolded project.

use std::path::PathBuf;

use stackforge_adapters::{MemoryCatalog, MemoryFilesystem, PlaceholderRenderer};
use stackforge_core::application::ports::Filesystem;
use stackforge_core::application::{ApplicationError, RetrofitService};
use stackforge_core::domain::{FeatureCategory, Resolution};
use stackforge_core::error::ForgeError;

fn catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_fragment(
            "mailing",
            &[
                (
                    "package.json",
                    r#"{
  "dependencies": {"nodemailer": "^6"},
  "scripts": {"email:test": "node scripts/email-test.js"}
}"#,
                ),
                (".env", "SMTP_HOST=localhost\nAPP_NAME={{projectName}}\n"),
                ("src/mail/send.ts", "export async function send() {}\n"),
            ],
        )
        .with_fragment(
            "nextauth",
            &[
                ("package.json", r#"{"dependencies": {"next-auth": "^4"}}"#),
                ("src/auth/config.ts", "export const authConfig = {};\n"),
            ],
        )
}

fn project_dir() -> PathBuf {
    PathBuf::from("/projects/existing")
}

/// A minimal project as the create flow would have left it, plus a
/// hand-added key in the stack record.
fn seed_project(fs: &MemoryFilesystem) {
    let dir = project_dir();
    fs.write_file(
        &dir.join("package.json"),
        br#"{
  "name": "existing",
  "version": "0.1.0",
  "dependencies": {"next": "14.0.0"},
  "scripts": {"dev": "next dev"}
}"#,
    )
    .unwrap();
    fs.write_file(&dir.join(".env"), b"DATABASE_URL=postgres://localhost/dev\n")
        .unwrap();
    fs.write_file(
        &dir.join(".stackrc"),
        br#"{
  "projectName": "existing",
  "databaseType": "postgresql",
  "orm": "drizzle",
  "auth": false,
  "mailing": false,
  "customNote": "hand-edited",
  "createdAt": "2024-01-01T00:00:00+00:00",
  "lastUpdated": "2024-01-01T00:00:00+00:00"
}"#,
    )
    .unwrap();
}

fn service(fs: &MemoryFilesystem) -> RetrofitService {
    RetrofitService::new(
        Box::new(catalog()),
        Box::new(fs.clone()),
        Box::new(PlaceholderRenderer::new()),
    )
}

fn text(fs: &MemoryFilesystem, relative: &str) -> String {
    fs.file_text(&project_dir().join(relative))
        .unwrap_or_else(|| panic!("missing file: {relative}"))
}

#[test]
fn adds_mailing_files_and_dependencies() {
    let fs = MemoryFilesystem::new();
    seed_project(&fs);

    let report = service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap();

    assert_eq!(report.files_copied, 1);
    assert!(text(&fs, "src/mail/send.ts").contains("send"));

    let manifest = text(&fs, "package.json");
    assert!(manifest.contains("\"nodemailer\": \"^6\""));
    assert!(manifest.contains("\"next\": \"14.0.0\""));
}

#[test]
fn scripts_are_not_merged_on_retrofit() {
    let fs = MemoryFilesystem::new();
    seed_project(&fs);

    service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap();

    let manifest = text(&fs, "package.json");
    assert!(manifest.contains("\"dev\": \"next dev\""));
    assert!(!manifest.contains("email:test"));
}

#[test]
fn env_keys_append_without_overriding() {
    let fs = MemoryFilesystem::new();
    seed_project(&fs);

    service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap();

    let env = text(&fs, ".env");
    assert!(env.contains("DATABASE_URL=postgres://localhost/dev"));
    assert!(env.contains("SMTP_HOST=localhost"));
    // Appended keys still pass through the render context.
    assert!(env.contains("APP_NAME=existing"));
}

#[test]
fn existing_files_are_never_overwritten() {
    let fs = MemoryFilesystem::new();
    seed_project(&fs);
    fs.write_file(
        &project_dir().join("src/mail/send.ts"),
        b"// customized by the user\n",
    )
    .unwrap();

    let report = service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap();

    assert_eq!(report.files_copied, 0);
    assert_eq!(report.files_skipped, 1);
    assert!(text(&fs, "src/mail/send.ts").contains("customized"));
}

#[test]
fn stack_record_is_updated_and_unknown_keys_survive() {
    let fs = MemoryFilesystem::new();
    seed_project(&fs);

    service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap();

    let record: serde_json::Value = serde_json::from_str(&text(&fs, ".stackrc")).unwrap();
    assert_eq!(record["mailing"], serde_json::json!(true));
    assert_eq!(record["mailingProvider"], serde_json::json!("nodemailer"));
    assert_eq!(record["customNote"], serde_json::json!("hand-edited"));
    assert_eq!(record["createdAt"], serde_json::json!("2024-01-01T00:00:00+00:00"));
    assert_ne!(record["lastUpdated"], serde_json::json!("2024-01-01T00:00:00+00:00"));
}

#[test]
fn auth_provider_falls_back_and_records_what_was_installed() {
    let fs = MemoryFilesystem::new();
    seed_project(&fs);

    let report = service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Auth, Some("clerk"))
        .unwrap();

    assert!(matches!(report.resolution, Resolution::Fallback { .. }));
    let record: serde_json::Value = serde_json::from_str(&text(&fs, ".stackrc")).unwrap();
    assert_eq!(record["auth"], serde_json::json!(true));
    assert_eq!(record["authProvider"], serde_json::json!("nextauth"));
}

#[test]
fn unsupported_provider_is_an_error() {
    let fs = MemoryFilesystem::new();
    seed_project(&fs);

    let err = service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Auth, Some("okta"))
        .unwrap_err();
    assert!(matches!(err, ForgeError::Domain(_)));
}

#[test]
fn missing_project_directory_is_rejected() {
    let fs = MemoryFilesystem::new();

    let err = service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ForgeError::Application(ApplicationError::ProjectNotFound { .. })
    ));
}

#[test]
fn missing_stack_record_gets_a_minimal_one() {
    let fs = MemoryFilesystem::new();
    fs.write_file(&project_dir().join("package.json"), b"{}")
        .unwrap();

    let report = service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap();
    assert!(report.stack_violations.is_empty());

    let record: serde_json::Value = serde_json::from_str(&text(&fs, ".stackrc")).unwrap();
    assert_eq!(record["mailing"], serde_json::json!(true));
    assert_eq!(record["features"]["mailing"], serde_json::json!("nodemailer"));
    assert!(record["createdAt"].is_string());
    assert!(record["lastUpdated"].is_string());
}

#[test]
fn invalid_stack_record_is_replaced_and_violations_reported() {
    let fs = MemoryFilesystem::new();
    fs.write_file(
        &project_dir().join(".stackrc"),
        br#"{"projectName": "x", "ui": "angular", "auth": "yes", "mailing": false}"#,
    )
    .unwrap();

    let report = service(&fs)
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap();

    let paths: Vec<_> = report
        .stack_violations
        .iter()
        .map(|v| v.path.as_str())
        .collect();
    assert_eq!(paths, vec!["ui", "auth"]);

    // The broken record was treated as absent and rewritten from scratch.
    let record: serde_json::Value = serde_json::from_str(&text(&fs, ".stackrc")).unwrap();
    assert_eq!(record["mailing"], serde_json::json!(true));
    assert!(record.get("ui").is_none());
}

#[test]
fn nested_package_json_in_fragment_copies_verbatim() {
    let fs = MemoryFilesystem::new();
    seed_project(&fs);
    let catalog = MemoryCatalog::new().with_fragment(
        "mailing",
        &[("emails/preview/package.json", r#"{"name": "preview"}"#)],
    );
    let service = RetrofitService::new(
        Box::new(catalog),
        Box::new(fs.clone()),
        Box::new(PlaceholderRenderer::new()),
    );

    service
        .add_feature(&project_dir(), FeatureCategory::Mailing, None)
        .unwrap();

    assert_eq!(
        text(&fs, "emails/preview/package.json"),
        r#"{"name": "preview"}"#
    );
    // The root manifest was left untouched.
    assert!(text(&fs, "package.json").contains("\"next\": \"14.0.0\""));
}
