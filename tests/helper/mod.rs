//! Test doubles for the seams between the catalog engine and the outside world

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use pim::commands::Prompt;
use pim::config::DEFAULT_REFRESH_INTERVAL_MS;
use pim::install::error::InstallError;
use pim::install::installer::InstallerRunner;
use pim::version::cache::CatalogCache;
use pim::version::catalog::Catalog;
use pim::version::downloader::InstallerDownloader;
use pim::version::error::{DownloadError, FeedError};
use pim::version::feed::RemoteFeed;
use pim::version::fetcher::CatalogFetcher;
use pim::version::identifier::Version;
use pim::version::installed::{InstalledVersionProvider, InstalledVersionSet};
use pim::version::ledger::FailureLedger;
use pim::version::service::CatalogService;

pub fn v(s: &str) -> Version {
    s.parse().unwrap()
}

pub fn versions(list: &[&str]) -> Vec<Version> {
    list.iter().map(|s| v(s)).collect()
}

/// Feed that serves fixed pages and records which pages were requested.
/// Pages past the end are empty.
pub struct ScriptedFeed {
    pages: Vec<Vec<String>>,
    requests: Arc<Mutex<Vec<u32>>>,
}

impl ScriptedFeed {
    pub fn new(pages: &[&[&str]]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|page| page.iter().map(|t| t.to_string()).collect())
                .collect(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<u32>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl RemoteFeed for ScriptedFeed {
    async fn get_page(&self, page: u32) -> Result<Vec<String>, FeedError> {
        self.requests.lock().unwrap().push(page);
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }
}

/// Feed that always fails
pub struct FailingFeed;

#[async_trait]
impl RemoteFeed for FailingFeed {
    async fn get_page(&self, _page: u32) -> Result<Vec<String>, FeedError> {
        Err(FeedError::RateLimited {
            retry_after_secs: Some(60),
        })
    }
}

/// Downloader where a fixed set of versions has no installer
pub struct FakeDownloader {
    missing: HashSet<Version>,
    attempts: Arc<Mutex<Vec<Version>>>,
}

impl FakeDownloader {
    pub fn missing(list: &[&str]) -> Self {
        Self {
            missing: versions(list).into_iter().collect(),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn attempts(&self) -> Arc<Mutex<Vec<Version>>> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait]
impl InstallerDownloader for FakeDownloader {
    async fn fetch(&self, version: &Version) -> Result<PathBuf, DownloadError> {
        self.attempts.lock().unwrap().push(version.clone());
        if self.missing.contains(version) {
            return Err(DownloadError::NotFound(version.clone()));
        }
        Ok(PathBuf::from(format!("python-{}-amd64.exe", version)))
    }
}

pub type InstallerCalls = Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>;

/// Installer that records its invocations; artifacts listed in `failing`
/// exit with an error
pub struct RecordingInstaller {
    calls: InstallerCalls,
    failing: HashSet<PathBuf>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: HashSet::new(),
        }
    }

    pub fn failing_for(mut self, version: &str) -> Self {
        self.failing
            .insert(PathBuf::from(format!("python-{}-amd64.exe", version)));
        self
    }

    pub fn calls(&self) -> InstallerCalls {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl InstallerRunner for RecordingInstaller {
    async fn run(&self, artifact: &Path, args: &[String]) -> Result<(), InstallError> {
        self.calls
            .lock()
            .unwrap()
            .push((artifact.to_path_buf(), args.to_vec()));
        if self.failing.contains(artifact) {
            return Err(InstallError::Failed {
                code: Some(1602),
                stdout: String::new(),
                stderr: "user cancelled".to_string(),
            });
        }
        Ok(())
    }
}

/// Provider returning a fixed installed set
pub struct FixedInstalled(pub InstalledVersionSet);

impl FixedInstalled {
    pub fn of(list: &[&str]) -> Self {
        Self(versions(list).into_iter().collect())
    }
}

#[async_trait]
impl InstalledVersionProvider for FixedInstalled {
    async fn list_installed(&self) -> InstalledVersionSet {
        self.0.clone()
    }
}

/// Prompt that replays answers and records the questions asked.
/// Runs out of answers as "no".
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn asked(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.asked)
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

/// In-memory cache holding a fresh catalog and the given ledger
pub fn fresh_cache(catalog: &[&str], failed: &[&str]) -> CatalogCache {
    let mut cache = CatalogCache::in_memory(DEFAULT_REFRESH_INTERVAL_MS).unwrap();
    let ledger: FailureLedger = versions(failed).into_iter().collect();
    cache
        .save(&Catalog::from_versions(versions(catalog)), &ledger, Utc::now())
        .unwrap();
    cache
}

/// Service over a fresh cache whose feed must never be consulted
pub fn cached_service(catalog: &[&str], failed: &[&str], allow_pre_release: bool) -> CatalogService {
    CatalogService::new(
        CatalogFetcher::new(Box::new(FailingFeed)),
        fresh_cache(catalog, failed),
        allow_pre_release,
    )
}
