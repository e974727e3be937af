//! In-memory catalog of published releases, grouped by release line

use std::collections::BTreeMap;

use crate::config::{PYTHON_MAJOR, SUPPORTED_MINIMUM_MINOR};
use crate::version::identifier::Version;

/// Published versions keyed by minor number, each line sorted ascending.
///
/// Built once per fetch (or cache load) and replaced wholesale; lines are
/// never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    lines: BTreeMap<u32, Vec<Version>>,
}

/// Eligibility rules applied when picking a line's installable versions
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateFilter<'a> {
    pub allow_pre_release: bool,
    /// Highest version with a published installer
    pub boundary: Option<&'a Version>,
    /// Lowest version known to have no installer
    pub floor: Option<&'a Version>,
    /// Exclusive lower bound, typically the installed version
    pub above: Option<&'a Version>,
}

impl CandidateFilter<'_> {
    pub fn accepts(&self, version: &Version) -> bool {
        if !self.allow_pre_release && version.is_pre_release() {
            return false;
        }
        if self.boundary.is_some_and(|boundary| version > boundary) {
            return false;
        }
        if self.floor.is_some_and(|floor| version >= floor) {
            return false;
        }
        if self.above.is_some_and(|above| version <= above) {
            return false;
        }
        true
    }
}

impl Catalog {
    /// Builds a catalog from unordered versions. Versions outside the
    /// supported lines are dropped and duplicates collapse.
    pub fn from_versions<I: IntoIterator<Item = Version>>(versions: I) -> Self {
        let mut lines: BTreeMap<u32, Vec<Version>> = BTreeMap::new();
        for version in versions {
            if version.major != PYTHON_MAJOR || version.minor < SUPPORTED_MINIMUM_MINOR {
                continue;
            }
            lines.entry(version.minor).or_default().push(version);
        }
        for line in lines.values_mut() {
            line.sort();
            line.dedup();
        }
        Self { lines }
    }

    /// Ascending versions of one release line
    pub fn line(&self, minor: u32) -> &[Version] {
        self.lines.get(&minor).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.line(version.minor).binary_search(version).is_ok()
    }

    pub fn minors(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.keys().copied()
    }

    /// All versions, ascending
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.lines.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Eligible versions of a line, highest first
    pub fn candidates(&self, minor: u32, filter: &CandidateFilter<'_>) -> Vec<Version> {
        self.line(minor)
            .iter()
            .rev()
            .filter(|version| filter.accepts(version))
            .cloned()
            .collect()
    }

    /// Highest eligible version of a line
    pub fn latest(&self, minor: u32, filter: &CandidateFilter<'_>) -> Option<&Version> {
        self.line(minor)
            .iter()
            .rev()
            .find(|version| filter.accepts(version))
    }
}
