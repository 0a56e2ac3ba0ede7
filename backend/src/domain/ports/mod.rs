//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod book_catalog;
mod book_repository;
mod cover_image_store;
mod password_hasher;
mod session_tokens;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use book_catalog::MockBookCatalog;
pub use book_catalog::BookCatalog;
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError};
#[cfg(test)]
pub use cover_image_store::MockCoverImageStore;
pub use cover_image_store::{CoverImageStore, CoverStoreError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::{SessionTokens, TokenError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
