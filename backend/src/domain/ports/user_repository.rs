//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } as ServiceUnavailable
            => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } as InternalError => "user repository query failed: {message}",
        /// A unique constraint rejected the write; `field` names the column.
        UniqueViolation { field: String } as Conflict => "{field} already exists",
    }
}

/// Driven port for user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user and its password hash by login name.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Insert a new user, returning the stored record.
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError>;
}
