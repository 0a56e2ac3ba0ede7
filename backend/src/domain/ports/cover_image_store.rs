//! Port for the cover image store.
//!
//! Covers are opaque byte blobs addressed by their generated filename.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by cover storage adapters.
    pub enum CoverStoreError {
        /// The backing storage rejected a read or write.
        Io { message: String } as InternalError => "cover storage failed: {message}",
        /// The filename would escape the storage root.
        InvalidName { name: String } as InvalidRequest => "invalid cover file name: {name}",
    }
}

/// Storage for uploaded cover images, keyed by generated filename.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoverImageStore: Send + Sync {
    /// Whether a cover with this exact filename has been stored.
    async fn exists(&self, filename: &str) -> Result<bool, CoverStoreError>;

    /// Write `bytes` under `filename`, replacing any previous content.
    async fn save(&self, filename: &str, bytes: Vec<u8>) -> Result<(), CoverStoreError>;
}
