//! GitHub tags API feed for the CPython repository

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_FEED_BASE_URL, FEED_PAGE_SIZE};
use crate::version::error::FeedError;
use crate::version::feed::RemoteFeed;

const REPOSITORY: &str = "python/cpython";

/// Response item from the GitHub tags API
#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Feed implementation for `GET /repos/python/cpython/tags`
pub struct GitHubTagFeed {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubTagFeed {
    /// Creates a new GitHubTagFeed with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("pim/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Authenticates requests, which raises GitHub's rate limit
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }
}

impl Default for GitHubTagFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_BASE_URL)
    }
}

#[async_trait::async_trait]
impl RemoteFeed for GitHubTagFeed {
    async fn get_page(&self, page: u32) -> Result<Vec<String>, FeedError> {
        let url = format!(
            "{}/repos/{}/tags?per_page={}&page={}",
            self.base_url, REPOSITORY, FEED_PAGE_SIZE, page
        );
        debug!("Fetching tag page: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(FeedError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(FeedError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let tags: Vec<Tag> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub tags response: {}", e);
            FeedError::InvalidResponse(e.to_string())
        })?;

        Ok(tags.into_iter().map(|t| t.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn page_query(page: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), page.into()),
        ])
    }

    #[tokio::test]
    async fn get_page_returns_tag_names_in_feed_order() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/python/cpython/tags")
            .match_query(page_query("2"))
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"name": "v3.9.9", "commit": {"sha": "abc", "url": "https://example.invalid"}},
                    {"name": "v3.9.8", "zipball_url": "https://example.invalid/zip"},
                    {"name": "legacy-trunk"}
                ]"#,
            )
            .create_async()
            .await;

        let feed = GitHubTagFeed::new(&server.url());
        let result = feed.get_page(2).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["v3.9.9", "v3.9.8", "legacy-trunk"]);
    }

    #[tokio::test]
    async fn get_page_sends_bearer_token_when_configured() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/python/cpython/tags")
            .match_query(page_query("1"))
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let feed = GitHubTagFeed::new(&server.url()).with_token(Some("secret-token".into()));
        let result = feed.get_page(1).await.unwrap();

        mock.assert_async().await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn get_page_returns_rate_limited_for_429() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/python/cpython/tags")
            .match_query(page_query("1"))
            .with_status(429)
            .with_header("retry-after", "60")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let feed = GitHubTagFeed::new(&server.url());
        let result = feed.get_page(1).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(FeedError::RateLimited {
                retry_after_secs: Some(60)
            })
        ));
    }

    #[tokio::test]
    async fn get_page_returns_invalid_response_for_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/python/cpython/tags")
            .match_query(page_query("1"))
            .with_status(502)
            .create_async()
            .await;

        let feed = GitHubTagFeed::new(&server.url());
        let result = feed.get_page(1).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FeedError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn get_page_returns_invalid_response_for_unexpected_body() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/repos/python/cpython/tags")
            .match_query(page_query("1"))
            .with_status(200)
            .with_body(r#"{"message": "not a list"}"#)
            .create_async()
            .await;

        let feed = GitHubTagFeed::new(&server.url());

        assert!(matches!(
            feed.get_page(1).await,
            Err(FeedError::InvalidResponse(_))
        ));
    }
}
