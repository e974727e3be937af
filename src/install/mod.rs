//! Platform side of installation: fetching installers, running them, and
//! reading what is already installed.
//!
//! # Modules
//!
//! - [`python_org`]: [`InstallerDownloader`](crate::version::downloader::InstallerDownloader)
//!   backed by the python.org FTP tree
//! - [`installer`]: Installer argument building and process execution
//! - [`registry`]: Installed versions read from the Windows registry
//! - [`error`]: Error type for installer runs

pub mod error;
pub mod installer;
pub mod python_org;
pub mod registry;

pub use installer::{InstallerRunner, ProcessInstaller, installer_arguments};
pub use python_org::PythonOrgDownloader;
pub use registry::RegistryInstalledVersions;
