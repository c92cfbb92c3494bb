//! Data models for repository listings.

use serde::Deserialize;

/// A repository as returned by the GitHub search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub html_url: String,
    pub updated_at: Option<String>,
}
