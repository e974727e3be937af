//! Locally installed versions, one per release line

use std::collections::BTreeMap;

use tracing::warn;

use crate::version::identifier::Version;

/// Installed versions keyed by minor number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledVersionSet {
    by_minor: BTreeMap<u32, Version>,
}

impl InstalledVersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a version. A second version for the same line replaces the
    /// first; providers are expected not to report one.
    pub fn insert(&mut self, version: Version) {
        if let Some(previous) = self.by_minor.insert(version.minor, version) {
            warn!(
                "Two installs reported for line 3.{}; keeping the later one over {}",
                previous.minor, previous
            );
        }
    }

    pub fn get(&self, minor: u32) -> Option<&Version> {
        self.by_minor.get(&minor)
    }

    /// Adds the versions of `other` whose line is not present yet
    pub fn fill_gaps_from(&mut self, other: InstalledVersionSet) {
        for (minor, version) in other.by_minor {
            self.by_minor.entry(minor).or_insert(version);
        }
    }

    /// Installed versions in ascending line order
    pub fn iter(&self) -> impl Iterator<Item = &Version> {
        self.by_minor.values()
    }

    pub fn len(&self) -> usize {
        self.by_minor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_minor.is_empty()
    }
}

impl FromIterator<Version> for InstalledVersionSet {
    fn from_iter<I: IntoIterator<Item = Version>>(iter: I) -> Self {
        let mut set = Self::new();
        for version in iter {
            set.insert(version);
        }
        set
    }
}

/// Source of the installed version set (the Windows registry in practice)
#[async_trait::async_trait]
pub trait InstalledVersionProvider: Send + Sync {
    async fn list_installed(&self) -> InstalledVersionSet;
}
