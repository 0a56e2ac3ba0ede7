//! Builders wiring Diesel, cover storage and credential adapters into the
//! HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use bookshelf::domain::{BookCatalogService, UserDirectoryService};
use bookshelf::inbound::http::state::HttpState;
use bookshelf::outbound::persistence::{DieselBookRepository, DieselUserRepository};
use bookshelf::outbound::security::{BcryptPasswordHasher, JwtSessionTokens};
use bookshelf::outbound::storage::CapStdCoverImageStore;

use super::ServerConfig;

/// Build the shared HTTP state from the server configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when the covers directory cannot be created or
/// opened.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let covers = CapStdCoverImageStore::open(&config.covers_dir)?;
    info!(covers_dir = %config.covers_dir.display(), "cover storage ready");

    let tokens = Arc::new(JwtSessionTokens::new(
        &config.token_settings,
        Arc::new(mockable::DefaultClock),
    ));
    let users = UserDirectoryService::new(
        Arc::new(DieselUserRepository::new(config.db_pool.clone())),
        Arc::new(BcryptPasswordHasher::new(config.password_hash_cost)),
        Arc::clone(&tokens),
    );
    let books = BookCatalogService::new(
        Arc::new(DieselBookRepository::new(config.db_pool.clone())),
        Arc::new(covers),
        config.forbidden_publishers.iter().cloned(),
    );

    Ok(web::Data::new(HttpState::new(
        Arc::new(users),
        Arc::new(books),
        tokens,
    )))
}
