//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.
//!
//! Listings are ordered by id. Substring search is a case-sensitive `LIKE`
//! on a single column with wildcards in the term escaped.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{Book, BookDraft, BookPatch, PageRequest, SearchField};

use super::diesel_error_mapping::{
    StoreFailure, classify_diesel_error, like_pattern, pool_error_message,
};
use super::models::{BookChangeset, BookRow, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel-backed implementation of the `BookRepository` port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookRepositoryError {
    BookRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> BookRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => BookRepositoryError::connection(message),
        StoreFailure::UniqueViolation { .. } => BookRepositoryError::query("duplicate book"),
        StoreFailure::ForeignKeyViolation { .. } => {
            BookRepositoryError::query("foreign key violation")
        }
        StoreFailure::Query(message) => BookRepositoryError::query(message),
    }
}

/// The only foreign key on `books` is the author pseudonym.
fn map_insert_error(error: diesel::result::Error, author: &str) -> BookRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::ForeignKeyViolation { .. } => BookRepositoryError::unknown_author(author),
        StoreFailure::Connection(message) => BookRepositoryError::connection(message),
        StoreFailure::UniqueViolation { .. } => BookRepositoryError::query("duplicate book"),
        StoreFailure::Query(message) => BookRepositoryError::query(message),
    }
}

fn to_books(rows: Vec<BookRow>) -> Vec<Book> {
    rows.into_iter().map(Book::from).collect()
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = books::table
            .find(id)
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Book::from))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = books::table
            .order(books::id.asc())
            .offset(i64::from(page.skip()))
            .limit(i64::from(page.limit()))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_books(rows))
    }

    async fn search(
        &self,
        field: SearchField,
        term: &str,
        limit: u32,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let pattern = like_pattern(term);
        let query = books::table.into_boxed();
        let query = match field {
            SearchField::Title => query.filter(books::title.like(pattern)),
            SearchField::Description => query.filter(books::description.like(pattern)),
            SearchField::Author => query.filter(books::author.like(pattern)),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = query
            .order(books::id.asc())
            .limit(i64::from(limit))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_books(rows))
    }

    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(books::table)
            .values(NewBookRow::from(draft))
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, &draft.author))?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: i32,
        patch: &BookPatch,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(books::table.find(id))
            .set(BookChangeset::from(patch))
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Book::from))
    }

    async fn delete(&self, id: i32) -> Result<bool, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(books::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping; queries are covered against a live database.
    use super::*;
    use crate::domain::{Error, ErrorCode};
    use rstest::rstest;

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(err, BookRepositoryError::query("record not found"));
    }

    #[rstest]
    fn unknown_author_surfaces_as_not_found() {
        let err: Error = BookRepositoryError::unknown_author("Frank").into();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Author not found: Frank");
    }
}
