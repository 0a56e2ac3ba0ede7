//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use bookshelf::outbound::persistence::DbPool;
use bookshelf::outbound::security::TokenSettings;

/// Everything the server needs to wire adapters and bind its listener.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) covers_dir: PathBuf,
    pub(crate) forbidden_publishers: Vec<String>,
    pub(crate) password_hash_cost: u32,
    pub(crate) token_settings: TokenSettings,
}

impl ServerConfig {
    /// Construct a configuration with default cover and publishing rules.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, token_settings: TokenSettings) -> Self {
        Self {
            bind_addr,
            db_pool,
            covers_dir: PathBuf::from("static"),
            forbidden_publishers: Vec::new(),
            password_hash_cost: bcrypt::DEFAULT_COST,
            token_settings,
        }
    }

    /// Directory where uploaded covers are written.
    #[must_use]
    pub fn with_covers_dir(mut self, covers_dir: PathBuf) -> Self {
        self.covers_dir = covers_dir;
        self
    }

    /// Pseudonyms refused by the catalogue.
    #[must_use]
    pub fn with_forbidden_publishers(mut self, names: Vec<String>) -> Self {
        self.forbidden_publishers = names;
        self
    }

    /// Bcrypt work factor for new password hashes.
    #[must_use]
    pub fn with_password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = cost;
        self
    }
}
