//! Catalog lifecycle for one invocation: cache, fetch, ledger

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::version::boundary::final_release_boundary;
use crate::version::cache::CatalogCache;
use crate::version::catalog::{CandidateFilter, Catalog};
use crate::version::error::FeedError;
use crate::version::fetcher::CatalogFetcher;
use crate::version::identifier::Version;
use crate::version::ledger::FailureLedger;

/// Owns the live catalog and failure ledger for a single run.
///
/// [`CatalogService::ensure`] loads or fetches the catalog at most once per
/// instance; callers construct one service per invocation and pass it by
/// reference.
pub struct CatalogService {
    fetcher: CatalogFetcher,
    cache: CatalogCache,
    catalog: Catalog,
    ledger: FailureLedger,
    fetched_at: Option<DateTime<Utc>>,
    allow_pre_release: bool,
    ensured: bool,
}

impl CatalogService {
    pub fn new(fetcher: CatalogFetcher, cache: CatalogCache, allow_pre_release: bool) -> Self {
        Self {
            fetcher,
            cache,
            catalog: Catalog::default(),
            ledger: FailureLedger::default(),
            fetched_at: None,
            allow_pre_release,
            ensured: false,
        }
    }

    /// Makes the catalog ready: adopts a fresh cache, otherwise fetches and
    /// persists. Later calls on the same instance do nothing.
    pub async fn ensure(&mut self) -> Result<(), FeedError> {
        if self.ensured {
            return Ok(());
        }

        let snapshot = self.cache.load();
        self.ledger.merge(snapshot.ledger);

        if snapshot.is_stale {
            info!("Catalog cache is stale or missing, fetching release feed");
            let catalog = self.fetcher.fetch_all().await?;
            self.catalog = catalog;
            self.fetched_at = Some(Utc::now());
            self.persist();
        } else {
            info!("Using cached catalog with {} versions", snapshot.catalog.len());
            self.catalog = snapshot.catalog;
            self.fetched_at = snapshot.fetched_at;
        }

        self.ensured = true;
        Ok(())
    }

    pub fn is_ensured(&self) -> bool {
        self.ensured
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    pub fn allow_pre_release(&self) -> bool {
        self.allow_pre_release
    }

    /// Installable versions of a line above `above`, highest first
    pub fn candidates(&self, minor: u32, above: Option<&Version>) -> Vec<Version> {
        self.catalog.candidates(minor, &self.filter(minor, above))
    }

    /// Highest installable version of a line above `above`
    pub fn latest_eligible(&self, minor: u32, above: Option<&Version>) -> Option<&Version> {
        self.catalog.latest(minor, &self.filter(minor, above))
    }

    fn filter<'a>(&'a self, minor: u32, above: Option<&'a Version>) -> CandidateFilter<'a> {
        CandidateFilter {
            allow_pre_release: self.allow_pre_release,
            boundary: final_release_boundary(minor),
            floor: self.ledger.floor(minor),
            above,
        }
    }

    /// Records a "no installer" result and persists the ledger if the floor
    /// moved. A failed save is logged; the in-memory floor still applies.
    pub fn record_failure(&mut self, version: Version) {
        if self.ledger.record(version) {
            self.persist();
        }
    }

    fn persist(&mut self) {
        let fetched_at = self.fetched_at.unwrap_or_else(Utc::now);
        if let Err(e) = self.cache.save(&self.catalog, &self.ledger, fetched_at) {
            error!("Failed to save catalog cache: {}", e);
        }
    }
}
