//! Session state for token-based GitHub authentication.
//!
//! The coordinator is the single source of truth for "who is logged in".
//! It never performs network I/O itself: selecting a token returns an
//! `AuthAttempt` that the caller runs through the API client on a
//! background task, and the outcome is fed back in through
//! `on_auth_success` / `on_auth_failure` on the UI thread.
//!
//! Several attempts may be in flight when the user switches tokens
//! quickly. There is no cancellation; instead every delivered result is
//! checked against the current token and silently dropped when stale, so
//! the session always reflects the latest selection's outcome.

use tracing::debug;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// No token selected, or the last attempt for the current token failed.
    LoggedOut,
    /// A verification request for the current token is in flight.
    Authenticating,
    /// The last attempt for the current token succeeded.
    LoggedIn,
}

/// A verification the caller must run for `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthAttempt {
    pub token: String,
}

/// Point-in-time notifications for the UI shell.
///
/// These are not queryable state; rendering code snapshots the
/// coordinator's accessors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TokenChanged(String),
    LoginStatusChanged { token: String, success: bool },
    UsernameChanged(String),
}

pub struct SessionCoordinator {
    phase: AuthPhase,
    current_token: Option<String>,
    current_username: Option<String>,
}

impl SessionCoordinator {
    pub fn new() -> Self {
        Self {
            phase: AuthPhase::LoggedOut,
            current_token: None,
            current_username: None,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn current_token(&self) -> Option<&str> {
        self.current_token.as_deref()
    }

    pub fn current_username(&self) -> Option<&str> {
        self.current_username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::LoggedIn
    }

    /// Make `token` current and begin authenticating it.
    ///
    /// Allowed from any phase; a previous in-flight attempt keeps running
    /// but its result will fail the staleness check on delivery.
    pub fn select_token(&mut self, token: &str) -> AuthAttempt {
        debug!(token = %crate::auth::store::masked_display(token), "Token selected");
        self.current_token = Some(token.to_string());
        self.phase = AuthPhase::Authenticating;
        AuthAttempt {
            token: token.to_string(),
        }
    }

    /// Deliver a successful verification for `token`.
    ///
    /// Stale results (token no longer current) are discarded without
    /// touching state or emitting events.
    pub fn on_auth_success(&mut self, token: &str, username: String) -> Vec<SessionEvent> {
        if !self.is_current(token) {
            debug!(
                token = %crate::auth::store::masked_display(token),
                "Discarding stale auth success"
            );
            return Vec::new();
        }

        self.phase = AuthPhase::LoggedIn;
        self.current_username = Some(username.clone());

        vec![
            SessionEvent::LoginStatusChanged {
                token: token.to_string(),
                success: true,
            },
            SessionEvent::UsernameChanged(username),
            SessionEvent::TokenChanged(token.to_string()),
        ]
    }

    /// Deliver a failed verification for `token`. Stale results discarded.
    pub fn on_auth_failure(&mut self, token: &str) -> Vec<SessionEvent> {
        if !self.is_current(token) {
            debug!(
                token = %crate::auth::store::masked_display(token),
                "Discarding stale auth failure"
            );
            return Vec::new();
        }

        self.phase = AuthPhase::LoggedOut;
        self.current_username = None;

        vec![
            SessionEvent::LoginStatusChanged {
                token: token.to_string(),
                success: false,
            },
            SessionEvent::UsernameChanged(String::new()),
        ]
    }

    fn is_current(&self, token: &str) -> bool {
        self.current_token.as_deref() == Some(token)
    }
}

impl Default for SessionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let session = SessionCoordinator::new();
        assert_eq!(session.phase(), AuthPhase::LoggedOut);
        assert_eq!(session.current_token(), None);
        assert_eq!(session.current_username(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_select_token_starts_authenticating() {
        let mut session = SessionCoordinator::new();
        let attempt = session.select_token("tok_new_5678");
        assert_eq!(attempt.token, "tok_new_5678");
        assert_eq!(session.phase(), AuthPhase::Authenticating);
        assert_eq!(session.current_token(), Some("tok_new_5678"));
        // Username only appears after a successful result
        assert_eq!(session.current_username(), None);
    }

    #[test]
    fn test_success_logs_in_and_emits() {
        let mut session = SessionCoordinator::new();
        session.select_token("tok_new_5678");

        let events = session.on_auth_success("tok_new_5678", "alice".to_string());
        assert_eq!(session.phase(), AuthPhase::LoggedIn);
        assert_eq!(session.current_username(), Some("alice"));
        assert_eq!(
            events,
            vec![
                SessionEvent::LoginStatusChanged {
                    token: "tok_new_5678".to_string(),
                    success: true,
                },
                SessionEvent::UsernameChanged("alice".to_string()),
                SessionEvent::TokenChanged("tok_new_5678".to_string()),
            ]
        );
    }

    #[test]
    fn test_failure_logs_out_and_clears_username() {
        let mut session = SessionCoordinator::new();
        session.select_token("tok_new_5678");
        session.on_auth_success("tok_new_5678", "alice".to_string());

        // Re-verify the same token, this time rejected
        session.select_token("tok_new_5678");
        let events = session.on_auth_failure("tok_new_5678");

        assert_eq!(session.phase(), AuthPhase::LoggedOut);
        assert_eq!(session.current_username(), None);
        assert_eq!(
            events,
            vec![
                SessionEvent::LoginStatusChanged {
                    token: "tok_new_5678".to_string(),
                    success: false,
                },
                SessionEvent::UsernameChanged(String::new()),
            ]
        );
    }

    #[test]
    fn test_stale_success_discarded() {
        let mut session = SessionCoordinator::new();
        session.select_token("token_aaaa");
        session.select_token("token_bbbb");

        // A's result arrives after B was selected
        let events = session.on_auth_success("token_aaaa", "old_user".to_string());
        assert!(events.is_empty());
        assert_eq!(session.phase(), AuthPhase::Authenticating);
        assert_eq!(session.current_username(), None);

        // B's result still lands normally
        let events = session.on_auth_success("token_bbbb", "bob".to_string());
        assert!(!events.is_empty());
        assert_eq!(session.current_username(), Some("bob"));
        assert_eq!(session.current_token(), Some("token_bbbb"));
    }

    #[test]
    fn test_stale_failure_discarded() {
        let mut session = SessionCoordinator::new();
        session.select_token("token_aaaa");
        session.select_token("token_bbbb");
        session.on_auth_success("token_bbbb", "bob".to_string());

        // A late failure for A must not log out B's session
        let events = session.on_auth_failure("token_aaaa");
        assert!(events.is_empty());
        assert_eq!(session.phase(), AuthPhase::LoggedIn);
        assert_eq!(session.current_username(), Some("bob"));
    }

    #[test]
    fn test_rapid_reselection_latest_wins() {
        let mut session = SessionCoordinator::new();
        session.select_token("token_aaaa");
        session.select_token("token_bbbb");

        // Results arrive out of order: B first, then stale A
        session.on_auth_failure("token_bbbb");
        let events = session.on_auth_success("token_aaaa", "old_user".to_string());

        assert!(events.is_empty());
        assert_eq!(session.phase(), AuthPhase::LoggedOut);
        assert_eq!(session.current_username(), None);
    }

    #[test]
    fn test_reauth_after_login_allowed() {
        let mut session = SessionCoordinator::new();
        session.select_token("tok_old_1234");
        session.on_auth_success("tok_old_1234", "alice".to_string());

        // Selecting another token from LoggedIn re-enters Authenticating
        session.select_token("tok_new_5678");
        assert_eq!(session.phase(), AuthPhase::Authenticating);

        // Previous username remains until the new result lands
        session.on_auth_failure("tok_new_5678");
        assert_eq!(session.current_username(), None);
    }
}
