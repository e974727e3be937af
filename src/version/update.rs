//! Detects installed lines that have a newer installable release

use std::collections::BTreeMap;

use tracing::debug;

use crate::version::identifier::Version;
use crate::version::installed::InstalledVersionSet;
use crate::version::service::CatalogService;

/// Maps each installed line to the newest eligible catalog version strictly
/// above the installed one. Lines with no such version are left out.
///
/// Uses the same eligibility rules as the resolver but never downloads, so a
/// proposed target can still turn out to have no installer.
pub fn detect_updatable(
    installed: &InstalledVersionSet,
    service: &CatalogService,
) -> BTreeMap<u32, Version> {
    installed
        .iter()
        .filter_map(|current| {
            let target = service.latest_eligible(current.minor, Some(current))?;
            debug!("{} can update to {}", current, target);
            Some((current.minor, target.clone()))
        })
        .collect()
}
