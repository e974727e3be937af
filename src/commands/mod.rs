//! User-facing commands
//!
//! Every command runs against a [`Session`], which bundles the collaborators
//! a single invocation needs. Commands write their report to the `out`
//! writer they are given and leave diagnostics to `tracing`.

mod install;
mod prompt;
mod status;
mod uninstall;
mod update;

use std::path::Path;

use thiserror::Error;

use crate::config::Config;
use crate::install::error::InstallError;
use crate::install::installer::{InstallerRunner, installer_arguments};
use crate::version::cache::clear_cache_dir;
use crate::version::downloader::InstallerDownloader;
use crate::version::error::{CacheError, DownloadError, FeedError, ParseVersionError, ResolveError};
use crate::version::installed::InstalledVersionProvider;
use crate::version::service::CatalogService;

pub use prompt::{AutoConfirm, Prompt, StdinPrompt, confirm_with};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    InvalidVersion(#[from] ParseVersionError),

    #[error("Version must be only 'MAJOR.MINOR': {0:?}")]
    ReleaseLineRequired(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Failed to fetch release catalog: {0}")]
    Feed(#[from] FeedError),

    #[error("Failed to download installer: {0}")]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error("Failed to clear cache: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Collaborators for one invocation
pub struct Session {
    config: Config,
    service: CatalogService,
    downloader: Box<dyn InstallerDownloader>,
    installer: Box<dyn InstallerRunner>,
    installed: Box<dyn InstalledVersionProvider>,
    prompt: Box<dyn Prompt>,
}

impl Session {
    pub fn new(
        config: Config,
        service: CatalogService,
        downloader: Box<dyn InstallerDownloader>,
        installer: Box<dyn InstallerRunner>,
        installed: Box<dyn InstalledVersionProvider>,
        prompt: Box<dyn Prompt>,
    ) -> Self {
        Self {
            config,
            service,
            downloader,
            installer,
            installed,
            prompt,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &CatalogService {
        &self.service
    }

    async fn run_installer(&self, artifact: &Path, extra: &[&str]) -> Result<(), InstallError> {
        let args = installer_arguments(&self.config, extra);
        self.installer.run(artifact, &args).await
    }
}

/// Deletes the cache directory. Needs no session since nothing is fetched.
pub fn clean_cache(cache_dir: &Path, out: &mut impl std::io::Write) -> Result<(), CommandError> {
    clear_cache_dir(cache_dir)?;
    writeln!(out, "Cache cleared: {}", cache_dir.display())?;
    Ok(())
}

fn yes_or_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn clean_cache_removes_directory_and_reports_it() {
        let temp_dir = TempDir::new().unwrap();
        let cache_dir = temp_dir.path().join("pim");
        std::fs::create_dir_all(cache_dir.join("installer")).unwrap();
        std::fs::write(cache_dir.join("catalog.db"), "").unwrap();
        let mut out = Vec::new();

        clean_cache(&cache_dir, &mut out).unwrap();

        assert!(!cache_dir.exists());
        assert!(String::from_utf8(out).unwrap().starts_with("Cache cleared: "));
    }

    #[test]
    fn clean_cache_succeeds_when_directory_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        assert!(clean_cache(&temp_dir.path().join("absent"), &mut out).is_ok());
    }
}
