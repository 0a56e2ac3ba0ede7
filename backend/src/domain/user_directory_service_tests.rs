//! Tests for the user directory service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockPasswordHasher, MockSessionTokens, MockUserRepository, PasswordHashError,
};
use crate::domain::{ErrorCode, SignUpParts, UserRecord};
use rstest::rstest;

type Service = UserDirectoryService<MockUserRepository, MockPasswordHasher, MockSessionTokens>;

fn make_service(
    repo: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockSessionTokens,
) -> Service {
    UserDirectoryService::new(Arc::new(repo), Arc::new(hasher), Arc::new(tokens))
}

fn tolkien() -> User {
    User {
        id: 1,
        first_name: "John".to_owned(),
        last_name: "Tolkien".to_owned(),
        email: "jrr@example.com".to_owned(),
        username: "tolkien".to_owned(),
        pseudonym: Some("J.R.R. Tolkien".to_owned()),
        is_active: true,
    }
}

fn candidate() -> SignUpCandidate {
    SignUpCandidate::try_from_parts(SignUpParts {
        first_name: "John",
        last_name: "Tolkien",
        email: "jrr@example.com",
        username: "tolkien",
        password: "mellon",
        pseudonym: Some("J.R.R. Tolkien"),
    })
    .expect("valid candidate")
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("tolkien", password).expect("valid credentials")
}

#[tokio::test]
async fn sign_up_rejects_duplicate_username_before_checking_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().times(1).return_once(|_| {
        Ok(Some(UserRecord {
            user: tolkien(),
            password_hash: "hash".to_owned(),
        }))
    });
    repo.expect_find_by_email().times(0);
    repo.expect_insert().times(0);

    let service = make_service(repo, MockPasswordHasher::new(), MockSessionTokens::new());
    let outcome = service.sign_up(candidate()).await;

    assert_eq!(outcome.status_code(), 409);
    assert_eq!(outcome.message(), "Username already exists");
    assert!(outcome.data().is_none());
}

#[tokio::test]
async fn sign_up_rejects_duplicate_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    repo.expect_find_by_email()
        .withf(|email| email == "jrr@example.com")
        .return_once(|_| Ok(Some(tolkien())));
    repo.expect_insert().times(0);

    let service = make_service(repo, MockPasswordHasher::new(), MockSessionTokens::new());
    let outcome = service.sign_up(candidate()).await;

    assert!(outcome.has_code(ErrorCode::Conflict));
    assert_eq!(outcome.message(), "Email already exists");
}

#[tokio::test]
async fn sign_up_hashes_password_and_returns_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    repo.expect_find_by_email().return_once(|_| Ok(None));
    repo.expect_insert()
        .withf(|new_user| new_user.password_hash == "hashed:mellon")
        .return_once(|_| Ok(tolkien()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|password| Ok(format!("hashed:{password}")));

    let service = make_service(repo, hasher, MockSessionTokens::new());
    let outcome = service.sign_up(candidate()).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.message(), "User Signed up");
    assert_eq!(outcome.data(), Some(&tolkien()));
}

#[rstest]
#[case("username", "Username already exists")]
#[case("email", "Email already exists")]
#[case("author_pseudonym", "Author pseudonym already exists")]
#[tokio::test]
async fn sign_up_maps_store_unique_violations_to_conflict(
    #[case] field: &'static str,
    #[case] message: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    repo.expect_find_by_email().return_once(|_| Ok(None));
    repo.expect_insert()
        .return_once(move |_| Err(UserRepositoryError::unique_violation(field)));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().return_once(|_| Ok("hash".to_owned()));

    let service = make_service(repo, hasher, MockSessionTokens::new());
    let outcome = service.sign_up(candidate()).await;

    assert_eq!(outcome.status_code(), 409);
    assert_eq!(outcome.message(), message);
}

#[tokio::test]
async fn sign_up_reports_unavailable_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .return_once(|_| Err(UserRepositoryError::connection("refused")));

    let service = make_service(repo, MockPasswordHasher::new(), MockSessionTokens::new());
    let outcome = service.sign_up(candidate()).await;

    assert_eq!(outcome.status_code(), 503);
}

#[tokio::test]
async fn sign_in_issues_bearer_token() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().return_once(|_| {
        Ok(Some(UserRecord {
            user: tolkien(),
            password_hash: "stored".to_owned(),
        }))
    });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, hash| password == "mellon" && hash == "stored")
        .return_once(|_, _| Ok(true));
    let mut tokens = MockSessionTokens::new();
    tokens
        .expect_issue()
        .withf(|user| user.username == "tolkien")
        .return_once(|_| Ok("signed.jwt.token".to_owned()));

    let service = make_service(repo, hasher, tokens);
    let outcome = service.sign_in(credentials("mellon")).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.message(), "User signed in");
    let token = outcome.data().expect("token payload");
    assert_eq!(token.access_token, "signed.jwt.token");
    assert_eq!(token.token_type, "bearer");
}

#[tokio::test]
async fn sign_in_failures_are_indistinguishable() {
    let mut unknown_repo = MockUserRepository::new();
    unknown_repo
        .expect_find_by_username()
        .return_once(|_| Ok(None));
    let unknown = make_service(
        unknown_repo,
        MockPasswordHasher::new(),
        MockSessionTokens::new(),
    )
    .sign_in(credentials("mellon"))
    .await;

    let mut known_repo = MockUserRepository::new();
    known_repo.expect_find_by_username().return_once(|_| {
        Ok(Some(UserRecord {
            user: tolkien(),
            password_hash: "stored".to_owned(),
        }))
    });
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(false));
    let mut tokens = MockSessionTokens::new();
    tokens.expect_issue().times(0);
    let mismatch = make_service(known_repo, hasher, tokens)
        .sign_in(credentials("wrong"))
        .await;

    for outcome in [&unknown, &mismatch] {
        assert_eq!(outcome.status_code(), 401);
        assert_eq!(outcome.message(), "Username or password is wrong");
    }
    assert_eq!(unknown, mismatch);
}

#[tokio::test]
async fn sign_in_surfaces_hasher_failure_as_internal() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().return_once(|_| {
        Ok(Some(UserRecord {
            user: tolkien(),
            password_hash: "stored".to_owned(),
        }))
    });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .return_once(|_, _| Err(PasswordHashError::hashing("worker gone")));

    let service = make_service(repo, hasher, MockSessionTokens::new());
    let outcome = service.sign_in(credentials("mellon")).await;

    assert_eq!(outcome.status_code(), 500);
}
