use std::io::Write;

use tracing::info;

use crate::commands::{CommandError, Session, yes_or_no};
use crate::version::identifier::Version;
use crate::version::resolution::ResolutionEngine;

impl Session {
    /// `install VERSION [--latest]`
    pub async fn install(
        &mut self,
        version: &str,
        latest: bool,
        out: &mut impl Write,
    ) -> Result<(), CommandError> {
        let requested: Version = version.parse()?;

        let version_info = if latest {
            format!("{}.{}.x (detect latest)", requested.major, requested.minor)
        } else {
            requested.to_string()
        };

        writeln!(out, "install options")?;
        writeln!(out, "  version: {}", version_info)?;
        writeln!(out, "  for all user: {}", yes_or_no(self.config.for_all_user))?;
        match &self.config.target_directory {
            Some(dir) => writeln!(out, "  install path: {}", dir.display())?,
            None if self.config.for_all_user => writeln!(out, "  install path: default(all user)")?,
            None => writeln!(out, "  install path: default(only you)")?,
        }

        if !self.prompt.confirm("continue? [Y/n]: ") {
            writeln!(out, "canceled.")?;
            return Ok(());
        }

        writeln!(out, "installing...")?;
        let resolved = ResolutionEngine::new(&mut self.service, self.downloader.as_ref())
            .resolve_install(&requested, latest)
            .await?;

        self.run_installer(&resolved.artifact, &[]).await?;
        info!("Installed Python {}", resolved.version);
        writeln!(out, "installed python {}", resolved.version)?;
        Ok(())
    }
}
