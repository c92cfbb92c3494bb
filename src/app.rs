//! Application state management for hubdeck.
//!
//! This module contains the core `App` struct that owns the token store,
//! the session coordinator, cached repository listings, and the channel
//! used to hand background task results back to the UI thread.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, AuthError};
use crate::auth::{masked_display, SessionCoordinator, SessionEvent, StoreError, TokenStore};
use crate::config::Config;
use crate::logview::LogBuffer;
use crate::models::Repository;
use crate::repos::LocalRepo;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A handful of in-flight verifications plus a scan fits with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for the token input field.
/// Fine-grained GitHub tokens run ~90 chars; 255 covers future formats.
const MAX_TOKEN_INPUT_LENGTH: usize = 255;

/// Maximum length for the search input field.
const MAX_SEARCH_QUERY_LENGTH: usize = 100;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Repos,
    Tokens,
    Activity,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Repos => "Repos",
            Tab::Tokens => "Tokens",
            Tab::Activity => "Activity",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Home => Tab::Repos,
            Tab::Repos => Tab::Tokens,
            Tab::Tokens => Tab::Activity,
            Tab::Activity => Tab::Home,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Home => Tab::Activity,
            Tab::Repos => Tab::Home,
            Tab::Tokens => Tab::Repos,
            Tab::Activity => Tab::Tokens,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    AddingToken,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Where Home-tab searches are directed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    GitHub,
    Local,
}

impl SearchScope {
    pub fn label(&self) -> &'static str {
        match self {
            SearchScope::GitHub => "GitHub",
            SearchScope::Local => "Local",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            SearchScope::GitHub => SearchScope::Local,
            SearchScope::Local => SearchScope::GitHub,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types delivered from background tasks.
///
/// Each value is constructed off-thread, sent through the MPSC channel,
/// and applied to app state exclusively on the UI thread. Payloads are
/// immutable snapshots; the tasks hold no references into `App`.
enum TaskResult {
    /// Outcome of verifying `token` against the identity endpoint
    Auth {
        token: String,
        outcome: Result<String, AuthError>,
    },
    /// GitHub repository search finished
    Search {
        query: String,
        outcome: Result<Vec<Repository>, ApiError>,
    },
    /// Local repository scan finished
    LocalRepos(Vec<LocalRepo>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub store: TokenStore,
    pub session: SessionCoordinator,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,

    // Tokens tab
    pub token_selection: usize,
    pub token_input: String,

    // Home tab
    pub search_query: String,
    pub search_scope: SearchScope,
    pub search_results: Vec<Repository>,
    pub local_results: Vec<LocalRepo>,
    pub result_selection: usize,
    pub search_in_flight: bool,

    // Repos tab
    pub local_repos: Vec<LocalRepo>,
    pub repo_selection: usize,
    pub scanning: bool,

    // Activity tab
    pub log: LogBuffer,
    pub log_scroll: usize,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let tokens_path = config.tokens_path()?;
        debug!(?tokens_path, "Token store path configured");

        // A corrupt token file degrades to an empty store with a visible
        // warning; it must never prevent startup.
        let (store, store_warning) = match TokenStore::load(tokens_path.clone()) {
            Ok(store) => (store, None),
            Err(e) => {
                warn!(error = %e, "Token file unreadable, starting with empty store");
                (
                    TokenStore::empty(tokens_path),
                    Some(format!("Token file unreadable, starting fresh: {}", e)),
                )
            }
        };

        let mut app = Self::from_parts(config, store)?;
        if let Some(warning) = store_warning {
            app.log.warn(warning.clone());
            app.status_message = Some(warning);
        }
        Ok(app)
    }

    /// Assemble an app from pre-built services. `App::new` wires the real
    /// paths; tests inject a store backed by a temp directory.
    pub fn from_parts(config: Config, store: TokenStore) -> Result<Self> {
        let api = ApiClient::new()?;
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            store,
            session: SessionCoordinator::new(),
            api,

            state: AppState::Normal,
            current_tab: Tab::Home,

            token_selection: 0,
            token_input: String::new(),

            search_query: String::new(),
            search_scope: SearchScope::GitHub,
            search_results: Vec::new(),
            local_results: Vec::new(),
            result_selection: 0,
            search_in_flight: false,

            local_repos: Vec::new(),
            repo_selection: 0,
            scanning: false,

            log: LogBuffer::new(),
            log_scroll: 0,

            task_rx: rx,
            task_tx: tx,

            status_message: None,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Startup auto-login: verify the most recently added token, if any.
    pub fn login_with_last_token(&mut self) {
        match self.store.last() {
            Some(token) => {
                let token = token.to_string();
                info!(token = %masked_display(&token), "Auto-login with last stored token");
                self.token_selection = self.store.len() - 1;
                self.select_and_verify(token);
            }
            None => {
                debug!("No stored tokens, staying logged out");
                self.log.info("No stored tokens; add one on the Tokens tab");
            }
        }
    }

    /// Make a token current and verify it on a background task.
    ///
    /// The session enters `Authenticating` immediately; the outcome comes
    /// back through the task channel and is staleness-checked there.
    pub fn select_and_verify(&mut self, token: String) {
        let attempt = self.session.select_token(&token);

        self.status_message = Some(format!("Verifying token {}...", masked_display(&token)));
        self.log
            .info(format!("Verifying token {}", masked_display(&token)));

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let outcome = api.verify_token(&attempt.token).await;
            if tx
                .send(TaskResult::Auth {
                    token: attempt.token,
                    outcome,
                })
                .await
                .is_err()
            {
                error!("Failed to deliver auth result - channel closed");
            }
        });
    }

    /// Add the token currently in the input field, then verify it.
    pub fn add_token_from_input(&mut self) {
        let token = self.token_input.trim().to_string();
        if token.is_empty() {
            return;
        }

        match self.store.add(&token) {
            Ok(()) => {
                self.token_input.clear();
                self.token_selection = self.store.len() - 1;
                self.state = AppState::Normal;
                self.log.info(format!(
                    "Added token {} ({} total)",
                    masked_display(&token),
                    self.store.len()
                ));
                self.select_and_verify(token);
            }
            Err(e @ StoreError::Write(_)) => {
                // The token is in memory but not on disk; warn loudly and
                // still verify it so the session is usable this run.
                error!(error = %e, "Failed to persist token store");
                self.status_message = Some(format!("Warning: {}", e));
                self.log.error(format!("{}", e));
                self.token_input.clear();
                self.token_selection = self.store.len() - 1;
                self.state = AppState::Normal;
                self.select_and_verify(token);
            }
            Err(e) => {
                warn!(error = %e, "Rejected token input");
                self.status_message = Some(e.to_string());
                self.log.warn(e.to_string());
            }
        }
    }

    /// Verify the token highlighted in the Tokens tab.
    pub fn select_highlighted_token(&mut self) {
        if let Some(token) = self.store.get(self.token_selection) {
            self.select_and_verify(token.to_string());
        }
    }

    /// Remove the token highlighted in the Tokens tab.
    ///
    /// Removal only shrinks the store. The session keeps its current
    /// token and username even when the removed token is the current one;
    /// the user logs out only by selecting a different token.
    pub fn remove_highlighted_token(&mut self) {
        match self.store.remove(self.token_selection) {
            Ok(removed) => {
                self.log.info(format!(
                    "Removed token {} ({} left)",
                    masked_display(&removed),
                    self.store.len()
                ));
                self.status_message = Some("Token removed".to_string());
                if self.token_selection >= self.store.len() {
                    self.token_selection = self.store.len().saturating_sub(1);
                }
            }
            Err(e) => {
                warn!(error = %e, "Token removal failed");
                self.status_message = Some(e.to_string());
            }
        }
    }

    // =========================================================================
    // Search & Scan
    // =========================================================================

    /// Run the Home-tab search for the current query and scope.
    pub fn start_search(&mut self) {
        let query = self.search_query.trim().to_string();
        if query.is_empty() {
            self.search_results.clear();
            self.local_results.clear();
            return;
        }

        self.result_selection = 0;

        match self.search_scope {
            SearchScope::Local => {
                self.local_results = self
                    .local_repos
                    .iter()
                    .filter(|r| r.matches(&query))
                    .cloned()
                    .collect();
                self.log.info(format!(
                    "Local search '{}': {} match(es)",
                    query,
                    self.local_results.len()
                ));
            }
            SearchScope::GitHub => {
                self.search_in_flight = true;
                self.status_message = Some(format!("Searching GitHub for '{}'...", query));

                let api = self.api.clone();
                let tx = self.task_tx.clone();
                let token = self.session.current_token().map(str::to_string);
                tokio::spawn(async move {
                    let outcome = api.search_repositories(&query, token.as_deref()).await;
                    if tx.send(TaskResult::Search { query, outcome }).await.is_err() {
                        error!("Failed to deliver search result - channel closed");
                    }
                });
            }
        }
    }

    /// Rescan the configured root for local repositories.
    ///
    /// The walk is blocking filesystem work, so it runs on the blocking
    /// pool and reports back through the same channel as network tasks.
    pub fn start_local_scan(&mut self) {
        if self.scanning {
            return;
        }
        self.scanning = true;

        let root = self.config.scan_root();
        self.log
            .info(format!("Scanning {} for repositories", root.display()));

        let tx = self.task_tx.clone();
        tokio::task::spawn_blocking(move || {
            let repos = crate::repos::scan(&root);
            if tx.blocking_send(TaskResult::LocalRepos(repos)).is_err() {
                error!("Failed to deliver scan result - channel closed");
            }
        });
    }

    // =========================================================================
    // Background Task Processing
    // =========================================================================

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_task_result(result);
        }
    }

    /// Process a single result from the background channel.
    ///
    /// Runs on the UI thread; this is the only place session state is
    /// updated from asynchronous work.
    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Auth { token, outcome } => {
                let events = match outcome {
                    Ok(username) => {
                        info!(username = %username, "Token verification succeeded");
                        self.session.on_auth_success(&token, username)
                    }
                    Err(e) => {
                        // Rejected vs. unreachable matters for diagnostics,
                        // even though the UI shows one failed state.
                        match &e {
                            AuthError::Rejected { status } => {
                                warn!(%status, "Token rejected")
                            }
                            AuthError::Unreachable(err) => {
                                warn!(error = %err, "Identity endpoint unreachable")
                            }
                        }
                        self.session.on_auth_failure(&token)
                    }
                };

                // Empty event list means the result was stale and dropped
                self.apply_session_events(events);
            }
            TaskResult::Search { query, outcome } => {
                self.search_in_flight = false;
                match outcome {
                    Ok(repos) => {
                        self.log.info(format!(
                            "GitHub search '{}': {} result(s)",
                            query,
                            repos.len()
                        ));
                        self.status_message = None;
                        self.search_results = repos;
                        self.result_selection = 0;
                    }
                    Err(e) => {
                        error!(error = %e, "GitHub search failed");
                        let user_message = match e {
                            ApiError::RateLimited => {
                                "GitHub is rate limiting searches. Wait a moment.".to_string()
                            }
                            ApiError::Unauthorized => {
                                "Search rejected - check the selected token.".to_string()
                            }
                            other => format!("Search failed: {}", other),
                        };
                        self.log.error(user_message.clone());
                        self.status_message = Some(user_message);
                    }
                }
            }
            TaskResult::LocalRepos(repos) => {
                self.scanning = false;
                self.log
                    .info(format!("Found {} local repositories", repos.len()));
                self.local_repos = repos;
                if self.repo_selection >= self.local_repos.len() {
                    self.repo_selection = self.local_repos.len().saturating_sub(1);
                }
            }
        }
    }

    /// Apply coordinator notifications to the UI-facing state.
    fn apply_session_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::TokenChanged(token) => {
                    debug!(token = %masked_display(&token), "Current token changed");
                }
                SessionEvent::LoginStatusChanged { token, success } => {
                    let masked = masked_display(&token);
                    if success {
                        self.status_message = Some(format!("Token {} verified", masked));
                        self.log.info(format!("Token {} verified", masked));
                    } else {
                        self.status_message = Some(format!("Token {} verification failed", masked));
                        self.log.warn(format!("Token {} verification failed", masked));
                    }
                }
                SessionEvent::UsernameChanged(username) => {
                    if username.is_empty() {
                        self.log.info("Logged out");
                    } else {
                        self.log.info(format!("Logged in as {}", username));
                    }
                }
            }
        }
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check whether a character may be appended to the token input field.
pub fn can_add_token_char(current_len: usize, c: char) -> bool {
    current_len < MAX_TOKEN_INPUT_LENGTH && !c.is_control() && !c.is_whitespace()
}

/// Check whether a character may be appended to the search input field.
pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_QUERY_LENGTH && !c.is_control()
}

// ============================================================================
// Tests
// ============================================================================
