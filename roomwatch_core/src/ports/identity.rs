//! Identity provider port
//!
//! Sign-in and account creation are delegated to an external provider.
//! The dashboard only needs to know whether a session exists and to hear
//! about it going away.

use crate::error::AuthResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Minimum password length accepted by the hosted provider
pub const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: &str, email: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            signed_in_at: Utc::now(),
        }
    }
}

/// Port for the external identity provider
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password
    fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Create an account; the new account is signed in
    fn create_account(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// End the current session, if any
    fn sign_out(&self) -> AuthResult<()>;

    /// Session as of now
    fn current_session(&self) -> Option<Session>;

    /// Receiver that observes every session change
    fn session_changes(&self) -> watch::Receiver<Option<Session>>;
}

/// Minimal shape check matching the hosted provider's "badly formatted" rule
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
