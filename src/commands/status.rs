use std::io::Write;

use crate::commands::{CommandError, Session};
use crate::version::update::detect_updatable;

impl Session {
    /// `status`: installed versions with their pending updates
    pub async fn status(&mut self, out: &mut impl Write) -> Result<(), CommandError> {
        self.service.ensure().await?;
        let installed = self.installed.list_installed().await;
        let updatable = detect_updatable(&installed, &self.service);

        writeln!(out, "Installed Python versions:")?;
        for version in installed.iter() {
            match updatable.get(&version.minor) {
                Some(target) => writeln!(out, "{} (updatable: {})", version, target)?,
                None => writeln!(out, "{}", version)?,
            }
        }
        Ok(())
    }
}
