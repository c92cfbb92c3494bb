//! REST API client module for GitHub services.
//!
//! This module provides the `ApiClient` for verifying access tokens
//! against the identity endpoint and searching repositories.
//!
//! All requests authenticate with a personal access token sent as a
//! bearer credential; verification uses a fixed 10-second timeout.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, AuthError};
