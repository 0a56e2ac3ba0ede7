//! Driving port for sign-up and sign-in use-cases.
//!
//! Inbound adapters call it without knowing the backing infrastructure, so
//! handler tests substitute a mock instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{AccessToken, LoginCredentials, Outcome, SignUpCandidate, User};

/// Domain use-case port for the user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a user. Duplicate username or email yields a 409 outcome.
    async fn sign_up(&self, candidate: SignUpCandidate) -> Outcome<User>;

    /// Check credentials and issue a bearer token.
    async fn sign_in(&self, credentials: LoginCredentials) -> Outcome<AccessToken>;
}
