//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{MockBookCatalog, MockSessionTokens, MockUserDirectory};

use super::api_scope;
use super::state::HttpState;

fn state(
    users: MockUserDirectory,
    books: MockBookCatalog,
    tokens: MockSessionTokens,
) -> HttpState {
    HttpState::new(Arc::new(users), Arc::new(books), Arc::new(tokens))
}

/// State whose user directory is `users`; other ports expect no calls.
pub fn state_with_users(users: MockUserDirectory) -> HttpState {
    state(users, MockBookCatalog::new(), MockSessionTokens::new())
}

/// State whose catalogue and token verifier are the given mocks.
pub fn state_with_books(books: MockBookCatalog, tokens: MockSessionTokens) -> HttpState {
    state(MockUserDirectory::new(), books, tokens)
}

/// State whose token verifier is `tokens`; other ports expect no calls.
pub fn state_with_tokens(tokens: MockSessionTokens) -> HttpState {
    state(MockUserDirectory::new(), MockBookCatalog::new(), tokens)
}

/// App exposing the `/api` scope over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(api_scope())
}
