//! HTTP boundary faults.
//!
//! Purpose: business failures travel inside an [`Outcome`] and are rendered
//! with their own status. Faults raised before a use-case runs (malformed
//! bodies, bad path or query values, token failures) are rendered here as a
//! `{detail: ...}` document in the negotiated wire format. XML faults are
//! written without a root wrapper.
//!
//! [`Outcome`]: crate::domain::Outcome

use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, WWW_AUTHENTICATE};
use actix_web::{HttpResponse, ResponseError};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::domain::ports::TokenError;

use super::codec::{CodecError, XmlOptions, encode_json, encode_xml};
use super::negotiation::WireFormat;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiFault>;

const INTERNAL_DETAIL: &str = "Internal server error";

/// Fault raised at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{status}: {detail}")]
pub struct ApiFault {
    format: WireFormat,
    status: StatusCode,
    detail: Value,
    bearer_challenge: bool,
}

impl ApiFault {
    /// Schema validation failure located at `loc`.
    ///
    /// # Examples
    /// ```
    /// use actix_web::http::StatusCode;
    /// use bookshelf::inbound::http::error::ApiFault;
    /// use bookshelf::inbound::http::negotiation::WireFormat;
    ///
    /// let fault = ApiFault::validation(WireFormat::Json, &["body", "title"], "field required");
    /// assert_eq!(fault.status(), StatusCode::UNPROCESSABLE_ENTITY);
    /// ```
    pub fn validation(format: WireFormat, loc: &[&str], msg: impl Into<String>) -> Self {
        let msg = msg.into();
        debug!(?loc, %msg, "request validation failed");
        Self {
            format,
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: json!([{ "loc": loc, "msg": msg, "type": "value_error" }]),
            bearer_challenge: false,
        }
    }

    /// Body that could not be decoded.
    pub fn body(format: WireFormat, err: &CodecError) -> Self {
        Self::validation(format, &["body"], err.to_string())
    }

    /// Authorization gate rejection.
    pub fn token(format: WireFormat, err: &TokenError) -> Self {
        if matches!(err, TokenError::Signing { .. }) {
            error!(error = %err, "token failure promoted to internal error");
            return Self::internal(format);
        }
        debug!(error = %err, "bearer token rejected");
        Self {
            format,
            status: StatusCode::UNAUTHORIZED,
            detail: Value::String(err.to_string()),
            bearer_challenge: true,
        }
    }

    /// Unexpected failure; the detail never leaks the cause.
    pub fn internal(format: WireFormat) -> Self {
        Self {
            format,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Value::String(INTERNAL_DETAIL.to_owned()),
            bearer_challenge: false,
        }
    }

    /// Transport status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Detail payload as rendered.
    #[must_use]
    pub fn detail(&self) -> &Value {
        &self.detail
    }

    /// Format the fault renders in.
    #[must_use]
    pub fn format(&self) -> WireFormat {
        self.format
    }

    fn render_body(&self) -> Result<Vec<u8>, CodecError> {
        let document = json!({ "detail": self.detail });
        match self.format {
            WireFormat::Json => encode_json(&document),
            WireFormat::Xml => encode_xml(&document, &XmlOptions::unwrapped()),
        }
    }
}

impl ResponseError for ApiFault {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        if self.bearer_challenge {
            builder.insert_header((WWW_AUTHENTICATE, "Bearer"));
        }
        match self.render_body() {
            Ok(body) => builder
                .insert_header((CONTENT_TYPE, self.format.content_type()))
                .body(body),
            Err(err) => {
                error!(error = %err, "failed to render fault body");
                builder.finish()
            }
        }
    }
}
