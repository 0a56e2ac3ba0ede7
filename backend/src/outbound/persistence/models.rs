//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;

use crate::domain::{Book, BookDraft, BookPatch, NewUser, User, UserRecord};

use super::schema::{books, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub author_pseudonym: Option<String>,
    pub is_active: bool,
}

impl UserRow {
    pub(crate) fn into_record(self) -> UserRecord {
        let password_hash = self.password_hash.clone();
        UserRecord {
            user: self.into(),
            password_hash,
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            username: row.username,
            pseudonym: row.author_pseudonym,
            is_active: row.is_active,
        }
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub author_pseudonym: Option<&'a str>,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
            username: &user.username,
            password_hash: &user.password_hash,
            author_pseudonym: user.pseudonym.as_deref(),
        }
    }
}

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub price: i32,
    pub author: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            cover_image: row.cover_image,
            price: row.price,
            author: row.author,
        }
    }
}

/// Insertable struct for creating new book records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub cover_image: &'a str,
    pub price: i32,
    pub author: &'a str,
}

impl<'a> From<&'a BookDraft> for NewBookRow<'a> {
    fn from(draft: &'a BookDraft) -> Self {
        Self {
            title: &draft.fields.title,
            description: &draft.fields.description,
            cover_image: &draft.fields.cover_image,
            price: draft.fields.price,
            author: &draft.author,
        }
    }
}

/// Changeset for the mutable book columns. The author is never updated.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct BookChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub cover_image: &'a str,
    pub price: i32,
}

impl<'a> From<&'a BookPatch> for BookChangeset<'a> {
    fn from(patch: &'a BookPatch) -> Self {
        Self {
            title: &patch.title,
            description: &patch.description,
            cover_image: &patch.cover_image,
            price: patch.price,
        }
    }
}
