//! Pages through the release feed until every supported line is covered

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::config::{RELEASE_TAG_PREFIX, SUPPORTED_MINIMUM_MINOR};
use crate::version::catalog::Catalog;
use crate::version::error::FeedError;
use crate::version::feed::RemoteFeed;
use crate::version::identifier::Version;

/// Builds a [`Catalog`] from a [`RemoteFeed`].
///
/// Pages are requested one at a time because the stop condition depends on
/// every page seen so far: fetching ends as soon as each line from
/// [`SUPPORTED_MINIMUM_MINOR`] up to the highest minor observed has at least
/// one entry. This relies on the feed keeping a line's tags close together;
/// a feed that scatters them can end the fetch with a line incomplete.
pub struct CatalogFetcher {
    feed: Box<dyn RemoteFeed>,
}

impl CatalogFetcher {
    pub fn new(feed: Box<dyn RemoteFeed>) -> Self {
        Self { feed }
    }

    pub async fn fetch_all(&self) -> Result<Catalog, FeedError> {
        let mut versions = Vec::new();
        let mut seen_minors = BTreeSet::new();
        let mut page = 1;

        loop {
            let tags = self.feed.get_page(page).await?;
            if tags.is_empty() {
                let missing = missing_lines(&seen_minors);
                if !missing.is_empty() {
                    warn!(
                        "Release feed ended after {} pages without lines {:?}",
                        page - 1,
                        missing
                    );
                }
                break;
            }

            let parsed = release_versions(&tags);
            debug!(
                "Page {}: {} tags, {} release versions",
                page,
                tags.len(),
                parsed.len()
            );
            seen_minors.extend(parsed.iter().map(|v| v.minor));
            versions.extend(parsed);

            if covers_supported_lines(&seen_minors) {
                break;
            }
            page += 1;
        }

        let catalog = Catalog::from_versions(versions);
        info!(
            "Fetched {} release versions across {} lines in {} pages",
            catalog.len(),
            catalog.minors().count(),
            page
        );
        Ok(catalog)
    }
}

/// Keeps release tags that parse; anything else is feed noise.
fn release_versions(tags: &[String]) -> Vec<Version> {
    tags.iter()
        .filter(|tag| tag.starts_with(RELEASE_TAG_PREFIX))
        .filter_map(|tag| tag.parse().ok())
        .collect()
}

fn covers_supported_lines(seen_minors: &BTreeSet<u32>) -> bool {
    match seen_minors.last() {
        Some(&max_minor) if max_minor >= SUPPORTED_MINIMUM_MINOR => {
            (SUPPORTED_MINIMUM_MINOR..=max_minor).all(|minor| seen_minors.contains(&minor))
        }
        _ => false,
    }
}

fn missing_lines(seen_minors: &BTreeSet<u32>) -> Vec<u32> {
    let max_minor = seen_minors.last().copied().unwrap_or(SUPPORTED_MINIMUM_MINOR);
    (SUPPORTED_MINIMUM_MINOR..=max_minor)
        .filter(|minor| !seen_minors.contains(minor))
        .collect()
}
