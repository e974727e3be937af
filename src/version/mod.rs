//! Release catalog and version resolution
//!
//! This module knows which CPython versions exist, which of them are worth
//! offering, and how to settle on one whose installer can actually be
//! downloaded.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ RemoteFeed  │────▶│   Fetcher   │────▶│   Service   │
//! │ (tag pages) │     │ (paginate)  │     │ (lifecycle) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                           │       ▲
//!                                           ▼       │
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Downloader  │◀────│ Resolution  │     │    Cache    │
//! │ (installer) │     │  (fallback) │     │  (SQLite)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`identifier`]: `Version` and `ReleaseLine` parsing, ordering and display
//! - [`catalog`]: Known versions grouped by line, with candidate filtering
//! - [`boundary`]: Last binary-installer release of retired lines
//! - [`ledger`]: Lowest version per line known to have no installer
//! - [`feed`]: Remote feed trait; [`feeds`] holds the GitHub implementation
//! - [`fetcher`]: Pagination until every supported line is covered
//! - [`cache`]: SQLite-backed catalog and ledger persistence
//! - [`service`]: Load-or-fetch once per run, ledger updates
//! - [`downloader`]: Installer download trait
//! - [`resolution`]: Install/update resolution with fallback
//! - [`update`]: Update detection for installed lines
//! - [`installed`]: Installed version set and its provider trait
//! - [`error`]: Error types for the layers above

pub mod boundary;
pub mod cache;
pub mod catalog;
pub mod downloader;
pub mod error;
pub mod feed;
pub mod feeds;
pub mod fetcher;
pub mod identifier;
pub mod installed;
pub mod ledger;
pub mod resolution;
pub mod service;
pub mod update;
