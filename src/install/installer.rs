//! Running the CPython Windows installer

use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::install::error::InstallError;

/// Builds the installer command line.
///
/// Order: `/quiet`, `extra`, `InstallAllUsers`, `TargetDir` (only when set),
/// then the additional options in the order they were configured.
pub fn installer_arguments(config: &Config, extra: &[&str]) -> Vec<String> {
    let mut args = vec!["/quiet".to_string()];
    args.extend(extra.iter().map(|arg| arg.to_string()));
    args.push(format!("InstallAllUsers={}", u8::from(config.for_all_user)));

    if let Some(dir) = &config.target_directory {
        args.push(format!("TargetDir={}", dir.display()));
    }

    args.extend(
        config
            .additional_installer_options
            .iter()
            .map(|(key, value)| format!("{}={}", key, value)),
    );
    args
}

/// Runs a downloaded installer
#[async_trait::async_trait]
pub trait InstallerRunner: Send + Sync {
    async fn run(&self, artifact: &Path, args: &[String]) -> Result<(), InstallError>;
}

/// Spawns the installer as a child process and waits for it
pub struct ProcessInstaller;

#[async_trait::async_trait]
impl InstallerRunner for ProcessInstaller {
    async fn run(&self, artifact: &Path, args: &[String]) -> Result<(), InstallError> {
        if !cfg!(windows) {
            return Err(InstallError::UnsupportedPlatform);
        }

        debug!("call: {} {}", artifact.display(), args.join(" "));
        let output = tokio::process::Command::new(artifact)
            .args(args)
            .output()
            .await
            .map_err(|source| InstallError::Launch {
                path: artifact.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(InstallError::Failed {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        info!("Installer finished: {}", artifact.display());
        Ok(())
    }
}
