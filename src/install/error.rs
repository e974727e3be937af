use std::path::PathBuf;

use thiserror::Error;

use crate::version::identifier::ReleaseLine;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to launch installer {path:?}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Installer exited with code {code:?}\nstdout: {stdout}\nstderr: {stderr}")]
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Python {0} is not installed")]
    NotInstalled(ReleaseLine),

    #[error("Running the Python installer is only supported on Windows")]
    UnsupportedPlatform,
}
