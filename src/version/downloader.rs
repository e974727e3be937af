//! Trait for obtaining installer artifacts

use std::path::PathBuf;

use crate::version::error::DownloadError;
use crate::version::identifier::Version;

/// Fetches the installer for a version
#[async_trait::async_trait]
pub trait InstallerDownloader: Send + Sync {
    /// Returns a local path to the installer.
    ///
    /// `DownloadError::NotFound` means no installer is published for this
    /// version; every other error aborts resolution.
    async fn fetch(&self, version: &Version) -> Result<PathBuf, DownloadError>;
}
