//! Uniform result envelope returned by every use-case.
//!
//! An [`Outcome`] is built once per operation and serialised at the
//! boundary. Handled business failures travel inside the envelope with their
//! specific status; they are never raised.

use serde::Serialize;
use utoipa::ToSchema;

use super::error::{Error, ErrorCode};

const OK_STATUS: u16 = 200;

/// Success or failure envelope carrying a status, message and payload.
///
/// ## Invariants
/// - `success == false` implies `data` is `None`.
/// - `error` is empty on success and holds the [`ErrorCode`] name on failure.
///
/// # Examples
/// ```
/// use bookshelf::domain::{Error, Outcome};
///
/// let found = Outcome::ok("Book found", 7_i32);
/// assert!(found.is_success());
/// assert_eq!(found.status_code(), 200);
///
/// let missing: Outcome<i32> = Outcome::failure(Error::not_found("Book not exists"));
/// assert_eq!(missing.status_code(), 404);
/// assert_eq!(missing.data(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    success: bool,
    #[schema(example = 200)]
    status_code: u16,
    #[schema(example = "Book found")]
    message: String,
    #[schema(example = "")]
    error: String,
    data: Option<T>,
}

impl<T> Outcome<T> {
    /// Successful outcome with a 200 status.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: OK_STATUS,
            message: message.into(),
            error: String::new(),
            data: Some(data),
        }
    }

    /// Failed outcome whose status follows the error code.
    pub fn failure(error: Error) -> Self {
        let code = error.code();
        Self {
            success: false,
            status_code: code.status_code(),
            message: error.message().to_owned(),
            error: code.as_str().to_owned(),
            data: None,
        }
    }

    /// Wrap a use-case result, using `message` for the success branch.
    pub fn from_result(message: impl Into<String>, result: Result<T, Error>) -> Self {
        match result {
            Ok(data) => Self::ok(message, data),
            Err(error) => Self::failure(error),
        }
    }

    /// Whether the operation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Numeric status to copy onto the transport.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Failure code name, empty on success.
    #[must_use]
    pub fn error(&self) -> &str {
        self.error.as_str()
    }

    /// Payload, present only on success.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consume the outcome, returning its payload.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Transform the payload while keeping the envelope.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            success: self.success,
            status_code: self.status_code,
            message: self.message,
            error: self.error,
            data: self.data.map(f),
        }
    }

    /// Whether this failure carries the given code.
    #[must_use]
    pub fn has_code(&self, code: ErrorCode) -> bool {
        !self.success && self.error == code.as_str()
    }
}

impl<T> From<Error> for Outcome<T> {
    fn from(error: Error) -> Self {
        Self::failure(error)
    }
}
