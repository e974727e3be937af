use std::io::Write;

use tracing::info;

use crate::commands::{CommandError, Session};
use crate::install::error::InstallError;
use crate::version::identifier::ReleaseLine;

impl Session {
    /// `uninstall MAJOR.MINOR`
    ///
    /// The installer that removes a version is the one that installed it, so
    /// the exact installed version is downloaded (or reused from the cache).
    pub async fn uninstall(&mut self, line: &str, out: &mut impl Write) -> Result<(), CommandError> {
        let line: ReleaseLine = line
            .parse()
            .map_err(|_| CommandError::ReleaseLineRequired(line.to_string()))?;

        let installed = self.installed.list_installed().await;
        let current = installed
            .get(line.minor)
            .filter(|v| v.major == line.major)
            .ok_or(InstallError::NotInstalled(line))?;

        if !self
            .prompt
            .confirm(&format!("uninstall python {}? [Y/n]: ", current))
        {
            writeln!(out, "canceled.")?;
            return Ok(());
        }

        writeln!(out, "uninstalling python {}", current)?;
        let artifact = self.downloader.fetch(current).await?;
        self.run_installer(&artifact, &["/uninstall"]).await?;

        info!("Uninstalled Python {}", current);
        Ok(())
    }
}
