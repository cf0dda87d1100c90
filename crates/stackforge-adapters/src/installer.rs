//! Dependency installation via the system package manager.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{info, instrument};

use stackforge_core::domain::PackageManager;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("package manager '{command}' is not available on PATH")]
    CommandNotFound { command: String },

    #[error("'{command}' exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("failed to run '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Runs the chosen package manager inside the project directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Installer;

impl Installer {
    pub fn new() -> Self {
        Self
    }

    /// True when the package manager executable answers `--version`.
    pub fn is_available(&self, manager: PackageManager) -> bool {
        Command::new(manager.command())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run the install command with the project directory as working
    /// directory. Child output is discarded; the caller owns progress
    /// display.
    #[instrument(skip_all, fields(manager = %manager))]
    pub fn install(&self, manager: PackageManager, project_dir: &Path) -> Result<(), InstallError> {
        let command = manager.command();
        let status = Command::new(command)
            .args(manager.install_args())
            .current_dir(project_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    InstallError::CommandNotFound {
                        command: command.to_string(),
                    }
                } else {
                    InstallError::Io {
                        command: command.to_string(),
                        source: e,
                    }
                }
            })?;

        if !status.success() {
            return Err(InstallError::Failed {
                command: command.to_string(),
                status,
            });
        }
        info!("dependencies installed");
        Ok(())
    }
}
