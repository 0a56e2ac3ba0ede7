//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities and the use-case services that
//! operate on them, independent of HTTP and persistence. Every use-case
//! returns an [`Outcome`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure description.
//! - Outcome: uniform success/failure envelope.
//! - User, Book and their validated inputs.
//! - UserDirectoryService / BookCatalogService: driving port implementations.

pub mod auth;
pub mod book;
pub mod book_catalog_service;
pub mod cover;
pub mod error;
pub mod outcome;
pub mod ports;
pub mod user;
pub mod user_directory_service;

pub use self::auth::{AccessToken, LoginCredentials, LoginValidationError, SessionClaims};
pub use self::book::{
    Book, BookDraft, BookPatch, BookValidationError, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
    PageLimitError, PageRequest, SearchCriteria, SearchField,
};
pub use self::book_catalog_service::BookCatalogService;
pub use self::cover::{COVER_PREFIX_LEN, CoverNameError, cover_filename};
pub use self::error::{Error, ErrorCode};
pub use self::outcome::Outcome;
pub use self::user::{
    NewUser, SignUpCandidate, SignUpParts, User, UserRecord, UserValidationError,
};
pub use self::user_directory_service::UserDirectoryService;
