//! Failure ledger: lowest known-undownloadable version per release line

use std::collections::BTreeMap;

use tracing::debug;

use crate::version::identifier::Version;

/// Records, per minor line, the lowest version whose installer download
/// returned "not found". Everything at or above the floor is presumed
/// unavailable, so the floor only ever moves down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureLedger {
    floors: BTreeMap<u32, Version>,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn floor(&self, minor: u32) -> Option<&Version> {
        self.floors.get(&minor)
    }

    /// Records a failed download. Returns true if the floor moved.
    pub fn record(&mut self, version: Version) -> bool {
        match self.floors.get(&version.minor) {
            Some(floor) if *floor <= version => {
                debug!("Ledger floor for 3.{} stays at {}", version.minor, floor);
                false
            }
            _ => {
                debug!("Ledger floor for 3.{} lowered to {}", version.minor, version);
                self.floors.insert(version.minor, version);
                true
            }
        }
    }

    /// Whether `version` is at or above its line's floor
    pub fn is_blocked(&self, version: &Version) -> bool {
        self.floor(version.minor)
            .is_some_and(|floor| floor <= version)
    }

    /// Folds another ledger in, keeping the lower floor per line.
    pub fn merge(&mut self, other: FailureLedger) {
        for version in other.floors.into_values() {
            self.record(version);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Version> {
        self.floors.values()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }
}

impl FromIterator<Version> for FailureLedger {
    fn from_iter<I: IntoIterator<Item = Version>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for version in iter {
            ledger.record(version);
        }
        ledger
    }
}
