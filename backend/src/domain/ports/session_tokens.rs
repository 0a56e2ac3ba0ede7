//! Port for issuing and verifying signed session tokens.
//!
//! Verification is pure: it checks signature and expiry against the
//! configured key and clock and never consults the user store.

use crate::domain::{SessionClaims, User};

use super::define_port_error;

define_port_error! {
    /// Failures raised while issuing or verifying session tokens.
    pub enum TokenError {
        /// No bearer credential accompanied the request.
        Missing as Unauthorized => "Not authenticated",
        /// The token's expiry has passed.
        Expired as Unauthorized => "Token expired",
        /// Signature, algorithm or structure checks failed.
        Invalid as Unauthorized => "Could not validate credentials",
        /// The claims carry no subject.
        SubjectMissing as Unauthorized => "Token subject missing",
        /// Encoding a new token failed.
        Signing { message: String } as InternalError => "token signing failed: {message}",
    }
}

/// Issues and verifies signed bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Issue a token embedding the user's email, username and pseudonym.
    fn issue(&self, user: &User) -> Result<String, TokenError>;

    /// Verify a token and recover its claims.
    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError>;
}
