//! Remote feed implementations

pub mod github;

pub use github::GitHubTagFeed;
