//! Port abstraction for book persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Book, BookDraft, BookPatch, PageRequest, SearchField};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } as ServiceUnavailable
            => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } as InternalError => "book repository query failed: {message}",
        /// The author pseudonym does not belong to any user.
        UnknownAuthor { author: String } as NotFound => "Author not found: {author}",
    }
}

/// Driven port for book persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Fetch a book by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, BookRepositoryError>;

    /// Fetch a page of books ordered by identifier.
    async fn list(&self, page: PageRequest) -> Result<Vec<Book>, BookRepositoryError>;

    /// Substring match on one column, capped at `limit` rows.
    async fn search(
        &self,
        field: SearchField,
        term: &str,
        limit: u32,
    ) -> Result<Vec<Book>, BookRepositoryError>;

    /// Insert a new book, returning the stored record.
    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError>;

    /// Overwrite the mutable fields of a book. Returns `None` when absent.
    async fn update(
        &self,
        id: i32,
        patch: &BookPatch,
    ) -> Result<Option<Book>, BookRepositoryError>;

    /// Remove a book. Returns `false` when nothing was deleted.
    async fn delete(&self, id: i32) -> Result<bool, BookRepositoryError>;
}
