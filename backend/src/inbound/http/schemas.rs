//! Request and response schemas for the HTTP adapter.
//!
//! Domain types stay free of serde and OpenAPI concerns; each entity crosses
//! the boundary through an explicit payload struct defined here. Responses
//! use camelCase field names. Requests accept camelCase and the snake_case
//! spelling of every field.
//!
//! XML and form bodies deliver every leaf as text, so integer fields accept
//! either a JSON number or a numeric string.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Book, BookDraft, BookPatch, BookValidationError, LoginCredentials, LoginValidationError,
    SearchCriteria, SignUpParts, User,
};

use super::body::RootElement;

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Text(String),
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match IntOrText::deserialize(deserializer)? {
        IntOrText::Int(value) => i32::try_from(value).map_err(de::Error::custom),
        IntOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid integer `{text}`"))),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sign-up request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Given name.
    #[serde(alias = "first_name")]
    #[schema(example = "Ursula")]
    pub first_name: String,
    /// Family name.
    #[serde(alias = "last_name")]
    #[schema(example = "Le Guin")]
    pub last_name: String,
    /// Contact email; must be unique.
    #[schema(example = "ursula@example.com")]
    pub email: String,
    /// Login name; must be unique.
    #[schema(example = "leguin")]
    pub username: String,
    /// Plain-text password, hashed before storage.
    #[schema(example = "earthsea")]
    pub password: String,
    /// Name books are published under; unique when set.
    #[serde(default, alias = "author_pseudonym")]
    #[schema(example = "Ursula K.")]
    pub author_pseudonym: Option<String>,
}

impl SignUpRequest {
    /// Borrow the raw fields for domain validation.
    #[must_use]
    pub fn parts(&self) -> SignUpParts<'_> {
        SignUpParts {
            first_name: &self.first_name,
            last_name: &self.last_name,
            email: &self.email,
            username: &self.username,
            password: &self.password,
            pseudonym: self.author_pseudonym.as_deref(),
        }
    }
}

impl RootElement for SignUpRequest {
    const ROOT: &'static str = "user";
}

/// Sign-in request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignInRequest {
    /// Login name.
    #[schema(example = "leguin")]
    pub username: String,
    /// Plain-text password.
    #[schema(example = "earthsea")]
    pub password: String,
}

impl RootElement for SignInRequest {
    const ROOT: &'static str = "user";
}

impl TryFrom<SignInRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: SignInRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Create-book request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCreateRequest {
    /// Book title.
    #[schema(example = "The Dispossessed")]
    pub title: String,
    /// Free-text description; `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schema(example = "An ambiguous utopia")]
    pub description: String,
    /// Filename returned by the upload endpoint.
    #[serde(alias = "cover_image")]
    #[schema(example = "Q7ZK2M_dispossessed.png")]
    pub cover_image: String,
    /// Price in whole units.
    #[serde(deserialize_with = "lenient_i32")]
    #[schema(example = 12)]
    pub price: i32,
    /// Must equal the caller's pseudonym.
    #[schema(example = "Ursula K.")]
    pub author: String,
}

impl RootElement for BookCreateRequest {
    const ROOT: &'static str = "book";
}

impl TryFrom<BookCreateRequest> for BookDraft {
    type Error = BookValidationError;

    fn try_from(value: BookCreateRequest) -> Result<Self, Self::Error> {
        let fields =
            BookPatch::try_new(&value.title, &value.description, &value.cover_image, value.price)?;
        Self::try_new(fields, &value.author)
    }
}

/// Update-book request body. The author cannot be changed.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdateRequest {
    /// New title.
    #[schema(example = "The Dispossessed")]
    pub title: String,
    /// New description; `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Filename returned by the upload endpoint.
    #[serde(alias = "cover_image")]
    #[schema(example = "Q7ZK2M_dispossessed.png")]
    pub cover_image: String,
    /// New price in whole units.
    #[serde(deserialize_with = "lenient_i32")]
    #[schema(example = 14)]
    pub price: i32,
}

impl RootElement for BookUpdateRequest {
    const ROOT: &'static str = "book";
}

impl TryFrom<BookUpdateRequest> for BookPatch {
    type Error = BookValidationError;

    fn try_from(value: BookUpdateRequest) -> Result<Self, Self::Error> {
        Self::try_new(&value.title, &value.description, &value.cover_image, value.price)
    }
}

/// Query string accepted by `GET /api/books`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BooksQuery {
    /// Maximum records to return, 1 to 100.
    pub limit: Option<u32>,
    /// Records to skip when listing without criteria.
    pub skip: Option<u32>,
    /// Substring to match in titles.
    pub title: Option<String>,
    /// Substring to match in descriptions.
    pub description: Option<String>,
    /// Substring to match in author pseudonyms.
    pub author: Option<String>,
}

impl BooksQuery {
    /// Search criteria carried by the query.
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            title: self.title.clone(),
            description: self.description.clone(),
            author: self.author.clone(),
        }
    }
}

/// Registered user as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    /// Database identifier.
    #[schema(example = 1)]
    pub id: i32,
    /// Given name.
    #[schema(example = "Ursula")]
    pub first_name: String,
    /// Family name.
    #[schema(example = "Le Guin")]
    pub last_name: String,
    /// Contact email.
    #[schema(example = "ursula@example.com")]
    pub email: String,
    /// Login name.
    #[schema(example = "leguin")]
    pub username: String,
    /// Publishing pseudonym, if any.
    #[schema(example = "Ursula K.")]
    pub author_pseudonym: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
}

impl From<User> for UserPayload {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            username: user.username,
            author_pseudonym: user.pseudonym,
            is_active: user.is_active,
        }
    }
}

/// Stored book as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Database identifier.
    #[schema(example = 7)]
    pub id: i32,
    /// Book title.
    #[schema(example = "The Dispossessed")]
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Stored cover filename.
    #[schema(example = "Q7ZK2M_dispossessed.png")]
    pub cover_image: String,
    /// Price in whole units.
    #[schema(example = 12)]
    pub price: i32,
    /// Author's pseudonym.
    #[schema(example = "Ursula K.")]
    pub author: String,
}

impl From<Book> for BookPayload {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            description: book.description,
            cover_image: book.cover_image,
            price: book.price,
            author: book.author,
        }
    }
}

/// Applied update as echoed back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPatchPayload {
    /// Applied title.
    pub title: String,
    /// Applied description.
    pub description: String,
    /// Applied cover filename.
    pub cover_image: String,
    /// Applied price.
    pub price: i32,
}

impl From<BookPatch> for BookPatchPayload {
    fn from(patch: BookPatch) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            cover_image: patch.cover_image,
            price: patch.price,
        }
    }
}

/// Multipart form accepted by the cover upload endpoint.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CoverUploadForm {
    /// Image bytes with their original filename.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}
