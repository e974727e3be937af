//! Installer downloads from python.org

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_DOWNLOAD_BASE_URL;
use crate::version::downloader::InstallerDownloader;
use crate::version::error::DownloadError;
use crate::version::identifier::Version;

/// Installer architecture suffix for the running host
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "aarch64" => "arm64",
        _ => "amd64",
    }
}

/// Downloads Windows installers from `{base}/ftp/python/{X.Y.Z}/`.
///
/// Installers are kept in `installer_dir` and reused on later runs, so
/// uninstalling a version does not hit the network if it was installed by
/// this tool.
pub struct PythonOrgDownloader {
    client: reqwest::Client,
    base_url: String,
    installer_dir: PathBuf,
    arch: &'static str,
}

impl PythonOrgDownloader {
    pub fn new(base_url: &str, installer_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("pim/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            installer_dir,
            arch: host_arch(),
        }
    }

    /// Overrides the architecture suffix (`amd64` or `arm64`)
    pub fn with_arch(mut self, arch: &'static str) -> Self {
        self.arch = arch;
        self
    }

    fn file_name(&self, version: &Version) -> String {
        format!("python-{}-{}.exe", version, self.arch)
    }

    /// The directory part never carries the pre-release suffix:
    /// `3.13.0rc1` lives under `/ftp/python/3.13.0/`.
    pub fn installer_url(&self, version: &Version) -> String {
        format!(
            "{}/ftp/python/{}/{}",
            self.base_url,
            version.release(),
            self.file_name(version)
        )
    }

    pub fn installer_path(&self, version: &Version) -> PathBuf {
        self.installer_dir.join(self.file_name(version))
    }

    async fn download_to(&self, url: &str, version: &Version, path: &Path) -> Result<(), DownloadError> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("No installer at {}", url);
            return Err(DownloadError::NotFound(version.clone()));
        }

        if !status.is_success() {
            warn!("python.org returned status {}: {}", status, url);
            return Err(DownloadError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        tokio::fs::create_dir_all(&self.installer_dir).await?;
        let partial = path.with_extension("exe.part");
        let mut file = tokio::fs::File::create(&partial).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&partial, path).await?;
        Ok(())
    }
}

impl Default for PythonOrgDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_BASE_URL, crate::config::installer_dir())
    }
}

#[async_trait::async_trait]
impl InstallerDownloader for PythonOrgDownloader {
    async fn fetch(&self, version: &Version) -> Result<PathBuf, DownloadError> {
        let path = self.installer_path(version);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!("Reusing downloaded installer {:?}", path);
            return Ok(path);
        }

        let url = self.installer_url(version);
        info!("Downloading installer: {}", url);

        if let Err(e) = self.download_to(&url, version, &path).await {
            let _ = tokio::fs::remove_file(path.with_extension("exe.part")).await;
            return Err(e);
        }

        Ok(path)
    }
}
