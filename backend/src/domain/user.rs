//! User data model and sign-up validation.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

/// Validation errors returned by [`SignUpCandidate::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// First name is blank.
    EmptyFirstName,
    /// Last name is blank.
    EmptyLastName,
    /// Email is not of the form `local@domain.tld`.
    InvalidEmail,
    /// Username is blank.
    EmptyUsername,
    /// Password is empty.
    EmptyPassword,
}

impl UserValidationError {
    /// Name of the offending payload field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyFirstName => "first_name",
            Self::EmptyLastName => "last_name",
            Self::InvalidEmail => "email",
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Registered user as exposed outside the directory.
///
/// Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: i32,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique email address.
    pub email: String,
    /// Unique login name.
    pub username: String,
    /// Unique publishing pseudonym, if any.
    pub pseudonym: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
}

/// A user together with the stored password hash, used only for sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Public user data.
    pub user: User,
    /// Password hash as produced by the hasher port.
    pub password_hash: String,
}

/// Insert payload handed to the user repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique email address.
    pub email: String,
    /// Unique login name.
    pub username: String,
    /// Unique publishing pseudonym, if any.
    pub pseudonym: Option<String>,
    /// Hashed password.
    pub password_hash: String,
}

/// Raw sign-up inputs prior to validation.
#[derive(Debug, Clone, Copy)]
pub struct SignUpParts<'a> {
    /// Given name.
    pub first_name: &'a str,
    /// Family name.
    pub last_name: &'a str,
    /// Email address.
    pub email: &'a str,
    /// Login name.
    pub username: &'a str,
    /// Plain-text password.
    pub password: &'a str,
    /// Optional pseudonym; blank counts as absent.
    pub pseudonym: Option<&'a str>,
}

/// Validated sign-up request.
///
/// ## Invariants
/// - names and username are trimmed and non-empty.
/// - `email` has an address shape.
/// - a blank pseudonym is stored as `None`.
///
/// # Examples
/// ```
/// use bookshelf::domain::{SignUpCandidate, SignUpParts};
///
/// let candidate = SignUpCandidate::try_from_parts(SignUpParts {
///     first_name: "Ursula",
///     last_name: "Le Guin",
///     email: "ursula@example.com",
///     username: "leguin",
///     password: "earthsea",
///     pseudonym: Some("  "),
/// })
/// .unwrap();
/// assert_eq!(candidate.pseudonym(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpCandidate {
    first_name: String,
    last_name: String,
    email: String,
    username: String,
    password: Zeroizing<String>,
    pseudonym: Option<String>,
}

fn required(value: &str, error: UserValidationError) -> Result<String, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

impl SignUpCandidate {
    /// Validate raw sign-up inputs.
    pub fn try_from_parts(parts: SignUpParts<'_>) -> Result<Self, UserValidationError> {
        let first_name = required(parts.first_name, UserValidationError::EmptyFirstName)?;
        let last_name = required(parts.last_name, UserValidationError::EmptyLastName)?;
        let email = parts.email.trim();
        if !email_regex().is_match(email) {
            return Err(UserValidationError::InvalidEmail);
        }
        let username = required(parts.username, UserValidationError::EmptyUsername)?;
        if parts.password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        let pseudonym = parts
            .pseudonym
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        Ok(Self {
            first_name,
            last_name,
            email: email.to_owned(),
            username,
            password: Zeroizing::new(parts.password.to_owned()),
            pseudonym,
        })
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Plain-text password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Publishing pseudonym.
    #[must_use]
    pub fn pseudonym(&self) -> Option<&str> {
        self.pseudonym.as_deref()
    }

    /// Build the repository insert payload from a computed hash.
    #[must_use]
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            username: self.username,
            pseudonym: self.pseudonym,
            password_hash,
        }
    }
}
