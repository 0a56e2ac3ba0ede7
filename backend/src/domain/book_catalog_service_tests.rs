//! Tests for the book catalogue service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    BookRepositoryError, CoverStoreError, MockBookRepository, MockCoverImageStore,
};
use crate::domain::{ErrorCode, SearchField};
use chrono::Utc;
use rstest::rstest;

type Service = BookCatalogService<MockBookRepository, MockCoverImageStore>;

fn make_service(books: MockBookRepository, covers: MockCoverImageStore) -> Service {
    BookCatalogService::new(
        Arc::new(books),
        Arc::new(covers),
        ["Darth Vader".to_owned()],
    )
}

fn claims(pseudonym: Option<&str>) -> SessionClaims {
    SessionClaims {
        subject: "caller".to_owned(),
        email: "caller@example.com".to_owned(),
        username: "caller".to_owned(),
        pseudonym: pseudonym.map(str::to_owned),
        expires_at: Utc::now(),
    }
}

fn book(id: i32, title: &str, author: &str) -> Book {
    Book {
        id,
        title: title.to_owned(),
        description: format!("{title} description"),
        cover_image: "ABC123_cover.png".to_owned(),
        price: 20,
        author: author.to_owned(),
    }
}

fn patch(cover: &str) -> BookPatch {
    BookPatch::try_new("The Hobbit", "There and back again", cover, 15).expect("valid patch")
}

fn draft(author: &str) -> BookDraft {
    BookDraft::try_new(patch("ABC123_cover.png"), author).expect("valid draft")
}

fn covers_with(exists: bool) -> MockCoverImageStore {
    let mut covers = MockCoverImageStore::new();
    covers.expect_exists().returning(move |_| Ok(exists));
    covers
}

#[tokio::test]
async fn create_persists_book_for_matching_author() {
    let mut books = MockBookRepository::new();
    books
        .expect_insert()
        .withf(|draft| draft.author == "Tolkien")
        .return_once(|draft| Ok(book(7, &draft.fields.title, &draft.author)));

    let service = make_service(books, covers_with(true));
    let outcome = service
        .create(draft("Tolkien"), &claims(Some("Tolkien")))
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.message(), "Book Added");
    assert_eq!(outcome.data().map(|b| b.id), Some(7));
}

#[rstest]
#[case(Some("Saruman"), "Tolkien")]
#[case(None, "Tolkien")]
#[tokio::test]
async fn create_rejects_author_mismatch(
    #[case] pseudonym: Option<&'static str>,
    #[case] author: &'static str,
) {
    let mut books = MockBookRepository::new();
    books.expect_insert().times(0);
    let mut covers = MockCoverImageStore::new();
    covers.expect_exists().times(0);

    let service = make_service(books, covers);
    let outcome = service.create(draft(author), &claims(pseudonym)).await;

    assert_eq!(outcome.status_code(), 401);
    assert_eq!(outcome.message(), "Author name mismatched");
}

#[tokio::test]
async fn create_rejects_forbidden_publisher_even_with_valid_cover() {
    let mut books = MockBookRepository::new();
    books.expect_insert().times(0);

    let service = make_service(books, covers_with(true));
    let outcome = service
        .create(draft("Darth Vader"), &claims(Some("Darth Vader")))
        .await;

    assert_eq!(outcome.status_code(), 403);
    assert_eq!(
        outcome.message(),
        "Forbidden access: Not allowed to publish books"
    );
}

#[tokio::test]
async fn create_requires_uploaded_cover() {
    let mut books = MockBookRepository::new();
    books.expect_insert().times(0);

    let service = make_service(books, covers_with(false));
    let outcome = service
        .create(draft("Tolkien"), &claims(Some("Tolkien")))
        .await;

    assert_eq!(outcome.status_code(), 404);
    assert_eq!(
        outcome.message(),
        "Cover image doesn't exist, please upload first"
    );
}

#[tokio::test]
async fn create_surfaces_unknown_author_as_not_found() {
    let mut books = MockBookRepository::new();
    books
        .expect_insert()
        .return_once(|draft| Err(BookRepositoryError::unknown_author(draft.author.clone())));

    let service = make_service(books, covers_with(true));
    let outcome = service
        .create(draft("Tolkien"), &claims(Some("Tolkien")))
        .await;

    assert!(outcome.has_code(ErrorCode::NotFound));
}

#[tokio::test]
async fn get_by_id_is_stable_without_mutation() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .times(2)
        .returning(|id| Ok(Some(book(id, "Dune", "Herbert"))));

    let service = make_service(books, MockCoverImageStore::new());
    let first = service.get_by_id(3).await;
    let second = service.get_by_id(3).await;

    assert_eq!(first.message(), "Book found");
    assert_eq!(first.data(), second.data());
}

#[tokio::test]
async fn get_by_id_reports_missing_book() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().return_once(|_| Ok(None));

    let outcome = make_service(books, MockCoverImageStore::new())
        .get_by_id(99)
        .await;

    assert_eq!(outcome.status_code(), 404);
    assert_eq!(outcome.message(), "Book not exists");
}

#[tokio::test]
async fn list_returns_empty_page_as_success() {
    let mut books = MockBookRepository::new();
    books
        .expect_list()
        .withf(|page| page.limit() == 10 && page.skip() == 0)
        .return_once(|_| Ok(Vec::new()));

    let outcome = make_service(books, MockCoverImageStore::new())
        .list(PageRequest::default())
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.message(), "Books Fetched");
    assert_eq!(outcome.data().map(Vec::len), Some(0));
}

#[tokio::test]
async fn list_maps_connection_failure_to_unavailable() {
    let mut books = MockBookRepository::new();
    books
        .expect_list()
        .return_once(|_| Err(BookRepositoryError::connection("refused")));

    let outcome = make_service(books, MockCoverImageStore::new())
        .list(PageRequest::default())
        .await;

    assert_eq!(outcome.status_code(), 503);
}

#[tokio::test]
async fn search_unions_criteria_without_duplicates() {
    let mut books = MockBookRepository::new();
    books
        .expect_search()
        .withf(|field, term, limit| *field == SearchField::Title && term == "Ring" && *limit == 5)
        .return_once(|_, _, _| {
            Ok(vec![
                book(1, "The Fellowship of the Ring", "Tolkien"),
                book(2, "Ring World", "Niven"),
            ])
        });
    books
        .expect_search()
        .withf(|field, term, _| *field == SearchField::Author && term == "Tolkien")
        .return_once(|_, _, _| {
            Ok(vec![
                book(1, "The Fellowship of the Ring", "Tolkien"),
                book(3, "The Hobbit", "Tolkien"),
            ])
        });

    let criteria = SearchCriteria {
        title: Some("Ring".to_owned()),
        description: None,
        author: Some("Tolkien".to_owned()),
    };
    let outcome = make_service(books, MockCoverImageStore::new())
        .list_by_search(criteria, 5)
        .await;

    let mut ids: Vec<i32> = outcome
        .data()
        .expect("search results")
        .iter()
        .map(|b| b.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn search_without_criteria_falls_back_to_listing() {
    let mut books = MockBookRepository::new();
    books.expect_search().times(0);
    books
        .expect_list()
        .withf(|page| page.limit() == 4)
        .return_once(|_| Ok(vec![book(1, "Dune", "Herbert")]));

    let outcome = make_service(books, MockCoverImageStore::new())
        .list_by_search(SearchCriteria::default(), 4)
        .await;

    assert_eq!(outcome.data().map(Vec::len), Some(1));
}

#[tokio::test]
async fn update_returns_applied_patch() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .return_once(|id| Ok(Some(book(id, "Old", "Tolkien"))));
    books
        .expect_update()
        .withf(|id, patch| *id == 4 && patch.title == "The Hobbit")
        .return_once(|id, patch| {
            Ok(Some(Book {
                id,
                title: patch.title.clone(),
                description: patch.description.clone(),
                cover_image: patch.cover_image.clone(),
                price: patch.price,
                author: "Tolkien".to_owned(),
            }))
        });

    let outcome = make_service(books, covers_with(true))
        .update(4, patch("ABC123_cover.png"), &claims(Some("Tolkien")))
        .await;

    assert_eq!(outcome.message(), "Book details updated");
    assert_eq!(outcome.data(), Some(&patch("ABC123_cover.png")));
}

#[tokio::test]
async fn update_requires_existing_book() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().return_once(|_| Ok(None));
    books.expect_update().times(0);

    let outcome = make_service(books, MockCoverImageStore::new())
        .update(4, patch("ABC123_cover.png"), &claims(Some("Tolkien")))
        .await;

    assert_eq!(outcome.status_code(), 404);
    assert_eq!(outcome.message(), "Book not exists");
}

#[tokio::test]
async fn update_rejects_non_owner() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .return_once(|id| Ok(Some(book(id, "Old", "Tolkien"))));
    books.expect_update().times(0);

    let outcome = make_service(books, MockCoverImageStore::new())
        .update(4, patch("ABC123_cover.png"), &claims(Some("Saruman")))
        .await;

    assert_eq!(outcome.status_code(), 401);
    assert_eq!(outcome.message(), "Unauthorized operation");
}

#[tokio::test]
async fn update_rejects_unknown_cover() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .return_once(|id| Ok(Some(book(id, "Old", "Tolkien"))));
    books.expect_update().times(0);

    let outcome = make_service(books, covers_with(false))
        .update(4, patch("missing.png"), &claims(Some("Tolkien")))
        .await;

    assert_eq!(outcome.status_code(), 404);
    assert_eq!(
        outcome.message(),
        "Cover image doesn't exist, please upload first"
    );
}

#[tokio::test]
async fn delete_returns_removed_book() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .return_once(|id| Ok(Some(book(id, "Dune", "Herbert"))));
    books.expect_delete().return_once(|_| Ok(true));

    let outcome = make_service(books, MockCoverImageStore::new())
        .delete(2, &claims(Some("Herbert")))
        .await;

    assert_eq!(outcome.status_code(), 200);
    assert_eq!(outcome.message(), "Book Deleted");
    assert_eq!(outcome.data().map(|b| b.title.as_str()), Some("Dune"));
}

#[rstest]
#[case(None, Some("Herbert"), 404, "Book not exists")]
#[case(Some("Herbert"), Some("Atreides"), 401, "Unauthorized operation")]
#[tokio::test]
async fn delete_reports_failures_with_their_status(
    #[case] stored_author: Option<&'static str>,
    #[case] pseudonym: Option<&'static str>,
    #[case] status: u16,
    #[case] message: &str,
) {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .return_once(move |id| Ok(stored_author.map(|author| book(id, "Dune", author))));
    books.expect_delete().times(0);

    let outcome = make_service(books, MockCoverImageStore::new())
        .delete(2, &claims(pseudonym))
        .await;

    assert_eq!(outcome.status_code(), status);
    assert_eq!(outcome.message(), message);
}

#[tokio::test]
async fn upload_saves_prefixed_filename() {
    let mut covers = MockCoverImageStore::new();
    covers
        .expect_save()
        .withf(|name, bytes| name.ends_with("_cover.png") && bytes == b"png-bytes")
        .return_once(|_, _| Ok(()));

    let outcome = make_service(MockBookRepository::new(), covers)
        .upload_cover_image(b"png-bytes".to_vec(), "cover.png")
        .await;

    assert_eq!(outcome.message(), "File Saved");
    let filename = outcome.data().expect("filename");
    assert_eq!(filename.len(), "ABCDEF_cover.png".len());
}

#[tokio::test]
async fn upload_rejects_empty_filename() {
    let mut covers = MockCoverImageStore::new();
    covers.expect_save().times(0);

    let outcome = make_service(MockBookRepository::new(), covers)
        .upload_cover_image(Vec::new(), "  ")
        .await;

    assert_eq!(outcome.status_code(), 422);
}

#[tokio::test]
async fn upload_surfaces_storage_failure() {
    let mut covers = MockCoverImageStore::new();
    covers
        .expect_save()
        .return_once(|_, _| Err(CoverStoreError::io("disk full")));

    let outcome = make_service(MockBookRepository::new(), covers)
        .upload_cover_image(b"x".to_vec(), "cover.png")
        .await;

    assert_eq!(outcome.status_code(), 500);
}
