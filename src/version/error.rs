use thiserror::Error;

use crate::version::identifier::Version;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version string: {0:?}")]
pub struct ParseVersionError(pub String);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    /// No installer is published for this version
    #[error("Installer not found for Python {0}")]
    NotFound(Version),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Python {0} is not a published version")]
    VersionNotFound(Version),

    #[error("No installable version found for Python 3.{minor}")]
    NoInstallableVersion { minor: u32 },

    #[error("Failed to fetch release catalog: {0}")]
    Feed(#[from] FeedError),

    #[error("Failed to download installer: {0}")]
    Download(#[from] DownloadError),
}
