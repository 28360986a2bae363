//! Credential Validator
//!
//! Matches an (email, password) pair against the user directory. Unknown
//! email, wrong password and empty input fail with the same
//! [`PortalError::InvalidCredentials`], so callers cannot probe which
//! accounts exist.
//!
//! Passwords are compared in plain text and there is no lockout or rate
//! limiting; a production deployment must replace this lookup.

use std::sync::Arc;
use std::time::Duration;

use super::outcome::LoginOutcome;
use crate::directory::{RedactedUser, UserDirectory};
use crate::errors::{PortalError, Result};
use crate::session::SessionStore;

/// Validates credentials and opens sessions
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    directory: Arc<UserDirectory>,
    latency: Duration,
}

impl CredentialValidator {
    /// Validator over `directory` with no simulated latency
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        CredentialValidator {
            directory,
            latency: Duration::ZERO,
        }
    }

    /// Simulated network round trip applied before each authentication
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    /// Look up the record matching both email and password
    ///
    /// No side effects.
    pub fn verify(&self, email: &str, password: &str) -> Result<RedactedUser> {
        if email.is_empty() || password.is_empty() {
            return Err(PortalError::InvalidCredentials);
        }

        self.directory
            .find_by_email(email)
            .filter(|record| record.password_matches(password))
            .map(|record| record.redact())
            .ok_or(PortalError::InvalidCredentials)
    }

    /// Authenticate and, on success, store the user as the current session
    pub async fn authenticate(
        &self,
        session: &mut SessionStore,
        email: &str,
        password: &str,
    ) -> Result<RedactedUser> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.verify(email, password) {
            Ok(user) => {
                session.set_current_user(user.clone())?;
                tracing::info!(email, role = %user.role(), "login succeeded");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(email, "login rejected");
                Err(e)
            }
        }
    }

    /// [`authenticate`](Self::authenticate) mapped onto the login outcome contract
    pub async fn login(
        &self,
        session: &mut SessionStore,
        email: &str,
        password: &str,
    ) -> LoginOutcome {
        self.authenticate(session, email, password).await.into()
    }
}
