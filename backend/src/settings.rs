//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BOOKSHELF_*` environment variables and an
//! optional configuration file. Only the database URL is mandatory.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_COVERS_DIR: &str = "static";
const DEFAULT_FORBIDDEN_PUBLISHERS: &str = "Darth Vader";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised when settings are present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `BOOKSHELF_DATABASE_URL` was not provided.
    #[error("database_url is required")]
    MissingDatabaseUrl,
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind_addr '{value}'")]
    InvalidBindAddr { value: String },
}

/// Runtime configuration for the bookshelf server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKSHELF")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Listen address.
    pub bind_addr: Option<String>,
    /// Directory holding uploaded covers.
    pub covers_dir: Option<PathBuf>,
    /// Comma separated pseudonyms that may not publish.
    pub forbidden_publishers: Option<String>,
    /// Bcrypt work factor.
    pub password_hash_cost: Option<u32>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl AppSettings {
    /// Configured database URL.
    ///
    /// # Errors
    /// [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Listen address, defaulting to `0.0.0.0:8000`.
    ///
    /// # Errors
    /// [`SettingsError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Directory holding uploaded covers.
    pub fn covers_dir(&self) -> PathBuf {
        self.covers_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COVERS_DIR))
    }

    /// Trimmed, non-empty pseudonyms from the comma separated list.
    pub fn forbidden_publishers(&self) -> Vec<String> {
        self.forbidden_publishers
            .as_deref()
            .unwrap_or(DEFAULT_FORBIDDEN_PUBLISHERS)
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Bcrypt work factor, defaulting to [`bcrypt::DEFAULT_COST`].
    pub fn password_hash_cost(&self) -> u32 {
        self.password_hash_cost.unwrap_or(bcrypt::DEFAULT_COST)
    }

    /// Pool size, defaulting to 10.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}
