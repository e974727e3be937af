use std::io::Write;

use tracing::{info, warn};

use crate::commands::{CommandError, Session};
use crate::install::error::InstallError;
use crate::version::identifier::{ReleaseLine, Version};
use crate::version::resolution::{ResolutionEngine, UpdateResolution};
use crate::version::update::detect_updatable;

impl Session {
    /// `update VERSION`: only the line of `VERSION` matters
    pub async fn update(&mut self, version: &str, out: &mut impl Write) -> Result<(), CommandError> {
        let requested: Version = version.parse()?;
        let installed = self.installed.list_installed().await;
        let current = installed
            .get(requested.minor)
            .filter(|v| v.major == requested.major)
            .cloned()
            .ok_or(InstallError::NotInstalled(ReleaseLine {
                major: requested.major,
                minor: requested.minor,
            }))?;

        match self.update_one(&current).await? {
            Some(updated) => writeln!(out, "updated python {} -> {}", current, updated)?,
            None => writeln!(out, "python {} is already the latest version", current)?,
        }
        Ok(())
    }

    /// `update --all`: every installed line with a newer release, continuing
    /// past lines that fail
    pub async fn update_all(&mut self, out: &mut impl Write) -> Result<(), CommandError> {
        self.service.ensure().await?;
        let installed = self.installed.list_installed().await;
        let updatable = detect_updatable(&installed, &self.service);

        if updatable.is_empty() {
            writeln!(out, "There is no updatable python.")?;
            return Ok(());
        }

        writeln!(out, "update versions are:")?;
        for current in installed.iter() {
            if let Some(target) = updatable.get(&current.minor) {
                writeln!(out, "{} -> {}", current, target)?;
            }
        }

        if !self.prompt.confirm("Do you want to update all updatable python? [Y/n]: ") {
            writeln!(out, "canceled.")?;
            return Ok(());
        }

        writeln!(out, "start updating...")?;
        for current in installed.iter().filter(|v| updatable.contains_key(&v.minor)) {
            writeln!(out, "updating python {}", current)?;
            match self.update_one(current).await {
                Ok(Some(updated)) => writeln!(out, "updated python {} -> {}", current, updated)?,
                Ok(None) => writeln!(out, "python {} is already the latest version", current)?,
                Err(e) => {
                    warn!("Update of {} failed: {}", current, e);
                    writeln!(
                        out,
                        "an error occurred while updating python {}: {}",
                        current, e
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Resolves and installs the update for one line; `None` when already latest
    async fn update_one(&mut self, current: &Version) -> Result<Option<Version>, CommandError> {
        let resolution = ResolutionEngine::new(&mut self.service, self.downloader.as_ref())
            .resolve_update(current)
            .await?;

        match resolution {
            UpdateResolution::AlreadyLatest => Ok(None),
            UpdateResolution::Updated(resolved) => {
                self.run_installer(&resolved.artifact, &[]).await?;
                info!("Updated Python {} to {}", current, resolved.version);
                Ok(Some(resolved.version))
            }
        }
    }
}
