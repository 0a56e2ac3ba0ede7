//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BookCatalog, SessionTokens, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Sign-up and sign-in use-cases.
    pub users: Arc<dyn UserDirectory>,
    /// Book catalogue use-cases.
    pub books: Arc<dyn BookCatalog>,
    /// Token verification for the authorization gate.
    pub tokens: Arc<dyn SessionTokens>,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use bookshelf::domain::ports::{BookCatalog, SessionTokens, UserDirectory};
    /// use bookshelf::inbound::http::state::HttpState;
    ///
    /// fn wire(
    ///     users: Arc<dyn UserDirectory>,
    ///     books: Arc<dyn BookCatalog>,
    ///     tokens: Arc<dyn SessionTokens>,
    /// ) -> HttpState {
    ///     HttpState::new(users, books, tokens)
    /// }
    /// ```
    pub fn new(
        users: Arc<dyn UserDirectory>,
        books: Arc<dyn BookCatalog>,
        tokens: Arc<dyn SessionTokens>,
    ) -> Self {
        Self {
            users,
            books,
            tokens,
        }
    }
}
