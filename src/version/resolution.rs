//! Turns install/update requests into one downloadable version

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::PYTHON_MAJOR;
use crate::version::downloader::InstallerDownloader;
use crate::version::error::{DownloadError, ResolveError};
use crate::version::identifier::Version;
use crate::version::service::CatalogService;

/// A version whose installer has been obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub version: Version,
    pub artifact: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResolution {
    Updated(Resolved),
    /// Nothing eligible above the installed version
    AlreadyLatest,
}

/// Walks a line's eligible versions from the top, falling back past
/// versions whose installer is missing and recording each miss in the
/// failure ledger before trying the next one down.
pub struct ResolutionEngine<'a> {
    service: &'a mut CatalogService,
    downloader: &'a dyn InstallerDownloader,
}

impl<'a> ResolutionEngine<'a> {
    pub fn new(service: &'a mut CatalogService, downloader: &'a dyn InstallerDownloader) -> Self {
        Self {
            service,
            downloader,
        }
    }

    /// Resolves `requested` exactly, or the newest installable version of its
    /// line when `latest_of_line` is set.
    pub async fn resolve_install(
        &mut self,
        requested: &Version,
        latest_of_line: bool,
    ) -> Result<Resolved, ResolveError> {
        self.service.ensure().await?;

        if latest_of_line {
            if requested.major != PYTHON_MAJOR {
                return Err(ResolveError::VersionNotFound(requested.clone()));
            }
            let candidates = self.service.candidates(requested.minor, None);
            return self.walk(requested.minor, candidates).await;
        }

        if !self.service.catalog().contains(requested) {
            return Err(ResolveError::VersionNotFound(requested.clone()));
        }

        match self.downloader.fetch(requested).await {
            Ok(artifact) => Ok(Resolved {
                version: requested.clone(),
                artifact,
            }),
            Err(DownloadError::NotFound(version)) => {
                self.service.record_failure(version.clone());
                Err(DownloadError::NotFound(version).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves the newest installable version strictly above `installed`.
    pub async fn resolve_update(
        &mut self,
        installed: &Version,
    ) -> Result<UpdateResolution, ResolveError> {
        self.service.ensure().await?;

        let candidates = self.service.candidates(installed.minor, Some(installed));
        if candidates.is_empty() {
            debug!("No candidates above {}", installed);
            return Ok(UpdateResolution::AlreadyLatest);
        }

        self.walk(installed.minor, candidates)
            .await
            .map(UpdateResolution::Updated)
    }

    async fn walk(&mut self, minor: u32, candidates: Vec<Version>) -> Result<Resolved, ResolveError> {
        debug!("Candidates for 3.{}: {:?}", minor, candidates);

        for candidate in candidates {
            match self.downloader.fetch(&candidate).await {
                Ok(artifact) => {
                    info!("Resolved Python {}", candidate);
                    return Ok(Resolved {
                        version: candidate,
                        artifact,
                    });
                }
                Err(DownloadError::NotFound(_)) => {
                    warn!("No installer published for {}, trying an older release", candidate);
                    self.service.record_failure(candidate);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ResolveError::NoInstallableVersion { minor })
    }
}
