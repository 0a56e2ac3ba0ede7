//! Test utilities for the bookshelf crate.
//!
//! In-memory port doubles shared by unit tests (in `src/`) and integration
//! tests (in `tests/`). Compiled for tests and behind the `test-support`
//! feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use jsonwebtoken::Algorithm;
use mockable::Clock;

use crate::domain::ports::{
    BookRepository, BookRepositoryError, CoverImageStore, CoverStoreError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Book, BookCatalogService, BookDraft, BookPatch, NewUser, PageRequest, SearchField, User,
    UserDirectoryService, UserRecord,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::security::{BcryptPasswordHasher, JwtSessionTokens, TokenSettings};

/// Secret shared by every token service built through this module.
pub const TEST_SECRET: &str = "bookshelf-test-secret";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Token service signing with [`TEST_SECRET`] against `clock`.
pub fn jwt_tokens(clock: Arc<dyn Clock>) -> JwtSessionTokens {
    let settings = TokenSettings::new(TEST_SECRET, Algorithm::HS256, Duration::minutes(30));
    JwtSessionTokens::new(&settings, clock)
}

/// User store enforcing the same unique columns as the SQL schema.
#[derive(Default)]
pub struct InMemoryUserRepository {
    records: Mutex<Vec<UserRecord>>,
}

impl InMemoryUserRepository {
    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        lock(&self.records).len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        Ok(lock(&self.records)
            .iter()
            .find(|record| record.user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(lock(&self.records)
            .iter()
            .find(|record| record.user.email == email)
            .map(|record| record.user.clone()))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut records = lock(&self.records);
        for record in records.iter() {
            let existing = &record.user;
            if existing.username == user.username {
                return Err(UserRepositoryError::unique_violation("username"));
            }
            if existing.email == user.email {
                return Err(UserRepositoryError::unique_violation("email"));
            }
            if user.pseudonym.is_some() && existing.pseudonym == user.pseudonym {
                return Err(UserRepositoryError::unique_violation("author_pseudonym"));
            }
        }
        let stored = User {
            id: i32::try_from(records.len() + 1).unwrap_or(i32::MAX),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            pseudonym: user.pseudonym.clone(),
            is_active: true,
        };
        records.push(UserRecord {
            user: stored.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(stored)
    }
}

/// Book store ordered by id with case-sensitive substring search.
#[derive(Default)]
pub struct InMemoryBookRepository {
    state: Mutex<BookTable>,
}

#[derive(Default)]
struct BookTable {
    next_id: i32,
    rows: Vec<Book>,
}

impl InMemoryBookRepository {
    /// Number of stored books.
    pub fn book_count(&self) -> usize {
        lock(&self.state).rows.len()
    }
}

fn column(book: &Book, field: SearchField) -> &str {
    match field {
        SearchField::Title => &book.title,
        SearchField::Description => &book.description,
        SearchField::Author => &book.author,
    }
}

fn take(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, BookRepositoryError> {
        Ok(lock(&self.state).rows.iter().find(|b| b.id == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(lock(&self.state)
            .rows
            .iter()
            .skip(take(page.skip()))
            .take(take(page.limit()))
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        field: SearchField,
        term: &str,
        limit: u32,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(lock(&self.state)
            .rows
            .iter()
            .filter(|book| column(book, field).contains(term))
            .take(take(limit))
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        let mut state = lock(&self.state);
        state.next_id += 1;
        let book = Book {
            id: state.next_id,
            title: draft.fields.title.clone(),
            description: draft.fields.description.clone(),
            cover_image: draft.fields.cover_image.clone(),
            price: draft.fields.price,
            author: draft.author.clone(),
        };
        state.rows.push(book.clone());
        Ok(book)
    }

    async fn update(
        &self,
        id: i32,
        patch: &BookPatch,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut state = lock(&self.state);
        let Some(book) = state.rows.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        book.title.clone_from(&patch.title);
        book.description.clone_from(&patch.description);
        book.cover_image.clone_from(&patch.cover_image);
        book.price = patch.price;
        Ok(Some(book.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, BookRepositoryError> {
        let mut state = lock(&self.state);
        let before = state.rows.len();
        state.rows.retain(|b| b.id != id);
        Ok(state.rows.len() < before)
    }
}

/// Cover store keeping bytes in a map.
#[derive(Default)]
pub struct InMemoryCoverStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryCoverStore {
    /// Bytes stored under `filename`, if any.
    pub fn contents(&self, filename: &str) -> Option<Vec<u8>> {
        lock(&self.files).get(filename).cloned()
    }
}

#[async_trait]
impl CoverImageStore for InMemoryCoverStore {
    async fn exists(&self, filename: &str) -> Result<bool, CoverStoreError> {
        Ok(lock(&self.files).contains_key(filename))
    }

    async fn save(&self, filename: &str, bytes: Vec<u8>) -> Result<(), CoverStoreError> {
        lock(&self.files).insert(filename.to_owned(), bytes);
        Ok(())
    }
}

/// Fully wired services over in-memory stores.
///
/// Passwords are hashed with real bcrypt at the minimum cost; tokens are real
/// JWTs signed with [`TEST_SECRET`].
pub struct InMemoryShelf {
    /// Registered users.
    pub users: Arc<InMemoryUserRepository>,
    /// Stored books.
    pub books: Arc<InMemoryBookRepository>,
    /// Uploaded covers.
    pub covers: Arc<InMemoryCoverStore>,
    /// Clock shared by token issue and verification.
    pub clock: Arc<dyn Clock>,
}

impl InMemoryShelf {
    /// Empty stores with tokens checked against `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::default(),
            books: Arc::default(),
            covers: Arc::default(),
            clock,
        }
    }

    /// Empty stores with tokens checked against the wall clock.
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(mockable::DefaultClock))
    }

    /// HTTP state whose catalogue refuses the given pseudonyms.
    pub fn http_state(&self, forbidden_publishers: &[&str]) -> HttpState {
        let tokens = Arc::new(jwt_tokens(Arc::clone(&self.clock)));
        let directory = UserDirectoryService::new(
            Arc::clone(&self.users),
            Arc::new(BcryptPasswordHasher::new(4)),
            Arc::clone(&tokens),
        );
        let catalog = BookCatalogService::new(
            Arc::clone(&self.books),
            Arc::clone(&self.covers),
            forbidden_publishers.iter().map(|name| (*name).to_owned()),
        );
        HttpState::new(Arc::new(directory), Arc::new(catalog), tokens)
    }
}

#[cfg(test)]
mod tests {
    //! Sanity checks for the in-memory doubles.
    use super::*;
    use rstest::rstest;

    fn new_user(username: &str, email: &str, pseudonym: Option<&str>) -> NewUser {
        NewUser {
            first_name: "Ursula".to_owned(),
            last_name: "Le Guin".to_owned(),
            email: email.to_owned(),
            username: username.to_owned(),
            pseudonym: pseudonym.map(str::to_owned),
            password_hash: "hash".to_owned(),
        }
    }

    #[rstest]
    #[case(new_user("ursula", "other@example.com", None), "username")]
    #[case(new_user("other", "ursula@example.com", None), "email")]
    #[case(new_user("other", "other@example.com", Some("ULG")), "author_pseudonym")]
    #[tokio::test]
    async fn users_enforce_unique_columns(#[case] duplicate: NewUser, #[case] field: &str) {
        let repo = InMemoryUserRepository::default();
        repo.insert(&new_user("ursula", "ursula@example.com", Some("ULG")))
            .await
            .expect("first insert");
        let err = repo.insert(&duplicate).await.expect_err("duplicate");
        assert_eq!(err, UserRepositoryError::unique_violation(field));
    }

    #[rstest]
    #[tokio::test]
    async fn book_search_is_case_sensitive() {
        let repo = InMemoryBookRepository::default();
        let fields = BookPatch::try_new("Earthsea", "", "c.png", 5).expect("patch");
        repo.insert(&BookDraft::try_new(fields, "ULG").expect("draft"))
            .await
            .expect("insert");

        let hits = repo.search(SearchField::Title, "sea", 10).await.expect("search");
        assert_eq!(hits.len(), 1);
        let misses = repo.search(SearchField::Title, "SEA", 10).await.expect("search");
        assert!(misses.is_empty());
    }
}
