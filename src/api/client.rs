//! API client for the GitHub REST API.
//!
//! This module provides the `ApiClient` used for token verification
//! (`GET /user`) and repository search. Requests authenticate with a
//! personal access token sent as a bearer credential.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Repository;

use super::error::{ApiError, AuthError};

// ============================================================================
// Constants
// ============================================================================

/// Base URL for all GitHub API endpoints
const API_BASE_URL: &str = "https://api.github.com";

/// HTTP request timeout in seconds.
/// Verification must fail fast so the UI can report an unreachable network.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// GitHub rejects requests without a User-Agent header.
const USER_AGENT: &str = concat!("hubdeck/", env!("CARGO_PKG_VERSION"));

/// Results per search page. 30 fills a screen without paging logic.
const SEARCH_PAGE_SIZE: u32 = 30;

/// Fallback username when the identity payload lacks a `login` field.
const UNKNOWN_USERNAME: &str = "Unknown";

/// Identity payload from `GET /user`. Only `login` matters here.
#[derive(Debug, Deserialize)]
struct UserResponse {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Repository>,
}

/// API client for GitHub.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Verify a token against the identity endpoint.
    ///
    /// One request, no retries: a 2xx response resolves the username from
    /// the payload's `login` field, any other status is `Rejected`, and a
    /// transport failure or timeout is `Unreachable`. The call is
    /// read-only on the GitHub side.
    pub async fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        let url = format!("{}/user", API_BASE_URL);

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Token verification rejected");
            return Err(AuthError::Rejected { status });
        }

        let user: UserResponse = response.json().await?;
        Ok(resolve_username(user.login))
    }

    /// Search public repositories matching `query`.
    ///
    /// Sends the session token as a bearer credential when available,
    /// which raises the rate limit; anonymous search works too.
    pub async fn search_repositories(
        &self,
        query: &str,
        token: Option<&str>,
    ) -> Result<Vec<Repository>, ApiError> {
        let url = format!("{}/search/repositories", API_BASE_URL);
        let per_page = SEARCH_PAGE_SIZE.to_string();

        let mut request = self
            .client
            .get(&url)
            .query(&[("q", query), ("per_page", per_page.as_str())]);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Repository search failed");
            return Err(ApiError::from_status(status, &body));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        debug!(count = search.items.len(), "Repository search complete");
        Ok(search.items)
    }
}

fn resolve_username(login: Option<String>) -> String {
    login
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| UNKNOWN_USERNAME.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_response() {
        let json = r#"{"login": "alice", "id": 1, "type": "User", "site_admin": false}"#;
        let user: UserResponse = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(resolve_username(user.login), "alice");
    }

    #[test]
    fn test_missing_login_resolves_unknown() {
        let json = r#"{"id": 1}"#;
        let user: UserResponse = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(resolve_username(user.login), "Unknown");

        assert_eq!(resolve_username(Some(String::new())), "Unknown");
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"total_count": 1, "incomplete_results": false, "items": [
            {"full_name": "rust-lang/rust", "description": "The Rust language",
             "stargazers_count": 90000, "watchers_count": 90000,
             "html_url": "https://github.com/rust-lang/rust",
             "updated_at": "2024-06-01T12:00:00Z"}
        ]}"#;

        let resp: SearchResponse =
            serde_json::from_str(json).expect("Failed to parse search JSON");
        assert_eq!(resp.items.len(), 1);

        let repo = &resp.items[0];
        assert_eq!(repo.full_name, "rust-lang/rust");
        assert_eq!(repo.stargazers_count, 90000);
        assert_eq!(repo.description.as_deref(), Some("The Rust language"));
    }

    #[test]
    fn test_parse_search_response_empty_items() {
        let json = r#"{"total_count": 0, "incomplete_results": false}"#;
        let resp: SearchResponse =
            serde_json::from_str(json).expect("Failed to parse search JSON");
        assert!(resp.items.is_empty());
    }
}
