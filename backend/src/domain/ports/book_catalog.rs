//! Driving port for book catalogue use-cases.

use async_trait::async_trait;

use crate::domain::{
    Book, BookDraft, BookPatch, Outcome, PageRequest, SearchCriteria, SessionClaims,
};

/// Domain use-case port for the book catalogue.
///
/// Mutations take the verified caller claims; ownership is decided by
/// comparing the claims' pseudonym with the book's author.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Publish a book under the caller's pseudonym.
    async fn create(&self, draft: BookDraft, caller: &SessionClaims) -> Outcome<Book>;

    /// Fetch one book.
    async fn get_by_id(&self, id: i32) -> Outcome<Book>;

    /// Fetch a page of books.
    async fn list(&self, page: PageRequest) -> Outcome<Vec<Book>>;

    /// Union of per-criterion substring matches, deduplicated by id.
    async fn list_by_search(&self, criteria: SearchCriteria, limit: u32) -> Outcome<Vec<Book>>;

    /// Replace the mutable fields of a book the caller owns.
    async fn update(&self, id: i32, patch: BookPatch, caller: &SessionClaims)
    -> Outcome<BookPatch>;

    /// Remove a book the caller owns, returning the removed record.
    async fn delete(&self, id: i32, caller: &SessionClaims) -> Outcome<Book>;

    /// Store an uploaded cover, returning the generated filename.
    async fn upload_cover_image(&self, bytes: Vec<u8>, original_name: &str) -> Outcome<String>;
}
