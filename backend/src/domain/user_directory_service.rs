//! User directory domain service.
//!
//! Implements the [`UserDirectory`] driving port: sign-up uniqueness checks
//! and sign-in credential matching. Store unique constraints remain the final
//! guard; a violation that slips past the pre-checks still yields a 409.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    PasswordHasher, SessionTokens, UserDirectory, UserRepository, UserRepositoryError,
};
use crate::domain::{AccessToken, Error, LoginCredentials, Outcome, SignUpCandidate, User};

const USERNAME_TAKEN: &str = "Username already exists";
const EMAIL_TAKEN: &str = "Email already exists";
const BAD_CREDENTIALS: &str = "Username or password is wrong";

/// User directory service implementing the [`UserDirectory`] port.
#[derive(Clone)]
pub struct UserDirectoryService<R, H, T> {
    users: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<R, H, T> UserDirectoryService<R, H, T> {
    /// Create a new service from its collaborators.
    pub fn new(users: Arc<R>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<R, H, T> UserDirectoryService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: SessionTokens,
{
    fn map_insert_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::UniqueViolation { field } => {
                let message = match field.as_str() {
                    "username" => USERNAME_TAKEN.to_owned(),
                    "email" => EMAIL_TAKEN.to_owned(),
                    "author_pseudonym" => "Author pseudonym already exists".to_owned(),
                    other => format!("{other} already exists"),
                };
                Error::conflict(message)
            }
            other => other.into(),
        }
    }

    async fn register(&self, candidate: SignUpCandidate) -> Result<User, Error> {
        if self
            .users
            .find_by_username(candidate.username())
            .await?
            .is_some()
        {
            debug!("sign-up rejected: username taken");
            return Err(Error::conflict(USERNAME_TAKEN));
        }

        if self.users.find_by_email(candidate.email()).await?.is_some() {
            debug!("sign-up rejected: email taken");
            return Err(Error::conflict(EMAIL_TAKEN));
        }

        let password_hash = self.hasher.hash(candidate.password()).await?;
        let user = self
            .users
            .insert(&candidate.into_new_user(password_hash))
            .await
            .map_err(Self::map_insert_error)?;
        info!(user_id = user.id, "user signed up");
        Ok(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Some(record) = self.users.find_by_username(credentials.username()).await? else {
            debug!("sign-in rejected: unknown username");
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &record.password_hash)
            .await?;
        if !matches {
            debug!(user_id = record.user.id, "sign-in rejected: password mismatch");
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }

        let token = self.tokens.issue(&record.user)?;
        info!(user_id = record.user.id, "user signed in");
        Ok(AccessToken::bearer(token))
    }
}

#[async_trait]
impl<R, H, T> UserDirectory for UserDirectoryService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: SessionTokens,
{
    async fn sign_up(&self, candidate: SignUpCandidate) -> Outcome<User> {
        Outcome::from_result("User Signed up", self.register(candidate).await)
    }

    async fn sign_in(&self, credentials: LoginCredentials) -> Outcome<AccessToken> {
        Outcome::from_result("User signed in", self.authenticate(&credentials).await)
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
