//! Feed trait for paging through published release tags

#[cfg(test)]
use mockall::automock;

use crate::version::error::FeedError;

/// Trait for reading the remote release feed
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RemoteFeed: Send + Sync {
    /// Fetches one page of raw tag names
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names on that page; empty once the feed is exhausted
    /// * `Err(FeedError)` - If the request fails
    async fn get_page(&self, page: u32) -> Result<Vec<String>, FeedError>;
}
