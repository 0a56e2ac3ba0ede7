//! Book catalogue domain service.
//!
//! Implements the [`BookCatalog`] driving port. Ownership is decided by the
//! verified caller pseudonym; publication eligibility by the injected set of
//! forbidden publishers.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{BookCatalog, BookRepository, CoverImageStore};
use crate::domain::{
    Book, BookDraft, BookPatch, Error, Outcome, PageRequest, SearchCriteria, SessionClaims,
    cover_filename,
};

const AUTHOR_MISMATCH: &str = "Author name mismatched";
const FORBIDDEN_PUBLISHER: &str = "Forbidden access: Not allowed to publish books";
const COVER_MISSING: &str = "Cover image doesn't exist, please upload first";
const BOOK_MISSING: &str = "Book not exists";
const NOT_OWNER: &str = "Unauthorized operation";
const BOOKS_FETCHED: &str = "Books Fetched";

/// Book catalogue service implementing the [`BookCatalog`] port.
#[derive(Clone)]
pub struct BookCatalogService<B, C> {
    books: Arc<B>,
    covers: Arc<C>,
    forbidden_publishers: Arc<HashSet<String>>,
}

impl<B, C> BookCatalogService<B, C> {
    /// Create a new service.
    ///
    /// `forbidden_publishers` lists pseudonyms that may never publish.
    pub fn new(
        books: Arc<B>,
        covers: Arc<C>,
        forbidden_publishers: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            books,
            covers,
            forbidden_publishers: Arc::new(forbidden_publishers.into_iter().collect()),
        }
    }
}

impl<B, C> BookCatalogService<B, C>
where
    B: BookRepository,
    C: CoverImageStore,
{
    async fn require_cover(&self, cover_image: &str) -> Result<(), Error> {
        if self.covers.exists(cover_image).await? {
            Ok(())
        } else {
            debug!(cover_image, "cover image not uploaded");
            Err(Error::not_found(COVER_MISSING))
        }
    }

    async fn require_owned(&self, id: i32, caller: &SessionClaims) -> Result<Book, Error> {
        let book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(BOOK_MISSING))?;
        if !caller.owns(&book.author) {
            debug!(book_id = id, caller = %caller.username, "caller does not own book");
            return Err(Error::unauthorized(NOT_OWNER));
        }
        Ok(book)
    }

    async fn publish(&self, draft: BookDraft, caller: &SessionClaims) -> Result<Book, Error> {
        if !caller.owns(&draft.author) {
            debug!(caller = %caller.username, "author does not match caller pseudonym");
            return Err(Error::unauthorized(AUTHOR_MISMATCH));
        }
        if self.forbidden_publishers.contains(&draft.author) {
            debug!(author = %draft.author, "forbidden publisher");
            return Err(Error::forbidden(FORBIDDEN_PUBLISHER));
        }
        self.require_cover(&draft.fields.cover_image).await?;

        let book = self.books.insert(&draft).await?;
        info!(book_id = book.id, author = %book.author, "book added");
        Ok(book)
    }

    async fn search(&self, criteria: &SearchCriteria, limit: u32) -> Result<Vec<Book>, Error> {
        let mut seen = HashSet::new();
        let mut books = Vec::new();
        for (field, term) in criteria.terms() {
            for book in self.books.search(field, term, limit).await? {
                if seen.insert(book.id) {
                    books.push(book);
                }
            }
        }
        Ok(books)
    }

    async fn revise(
        &self,
        id: i32,
        patch: BookPatch,
        caller: &SessionClaims,
    ) -> Result<BookPatch, Error> {
        self.require_owned(id, caller).await?;
        self.require_cover(&patch.cover_image).await?;

        self.books
            .update(id, &patch)
            .await?
            .ok_or_else(|| Error::not_found(BOOK_MISSING))?;
        info!(book_id = id, "book updated");
        Ok(patch)
    }

    async fn remove(&self, id: i32, caller: &SessionClaims) -> Result<Book, Error> {
        let book = self.require_owned(id, caller).await?;
        if !self.books.delete(id).await? {
            return Err(Error::not_found(BOOK_MISSING));
        }
        info!(book_id = id, "book deleted");
        Ok(book)
    }

    async fn store_cover(&self, bytes: Vec<u8>, original_name: &str) -> Result<String, Error> {
        let filename = cover_filename(original_name, &mut rand::thread_rng())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.covers.save(&filename, bytes).await?;
        info!(filename = %filename, "cover image saved");
        Ok(filename)
    }
}

#[async_trait]
impl<B, C> BookCatalog for BookCatalogService<B, C>
where
    B: BookRepository,
    C: CoverImageStore,
{
    async fn create(&self, draft: BookDraft, caller: &SessionClaims) -> Outcome<Book> {
        Outcome::from_result("Book Added", self.publish(draft, caller).await)
    }

    async fn get_by_id(&self, id: i32) -> Outcome<Book> {
        let found = match self.books.find_by_id(id).await {
            Ok(Some(book)) => Ok(book),
            Ok(None) => Err(Error::not_found(BOOK_MISSING)),
            Err(err) => Err(err.into()),
        };
        Outcome::from_result("Book found", found)
    }

    async fn list(&self, page: PageRequest) -> Outcome<Vec<Book>> {
        let books = self.books.list(page).await.map_err(Error::from);
        Outcome::from_result(BOOKS_FETCHED, books)
    }

    async fn list_by_search(&self, criteria: SearchCriteria, limit: u32) -> Outcome<Vec<Book>> {
        if criteria.is_empty() {
            let page = PageRequest::try_new(Some(limit), None).unwrap_or_default();
            return self.list(page).await;
        }
        Outcome::from_result(BOOKS_FETCHED, self.search(&criteria, limit).await)
    }

    async fn update(
        &self,
        id: i32,
        patch: BookPatch,
        caller: &SessionClaims,
    ) -> Outcome<BookPatch> {
        Outcome::from_result("Book details updated", self.revise(id, patch, caller).await)
    }

    async fn delete(&self, id: i32, caller: &SessionClaims) -> Outcome<Book> {
        Outcome::from_result("Book Deleted", self.remove(id, caller).await)
    }

    async fn upload_cover_image(&self, bytes: Vec<u8>, original_name: &str) -> Outcome<String> {
        Outcome::from_result("File Saved", self.store_cover(bytes, original_name).await)
    }
}

#[cfg(test)]
#[path = "book_catalog_service_tests.rs"]
mod tests;
