//! Outcome rendering.
//!
//! The transport status is copied verbatim from the outcome's `statusCode`.
//! XML documents are wrapped in a `root` element.

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::domain::Outcome;

use super::codec::{XmlOptions, encode_json, encode_xml};
use super::error::ApiFault;
use super::negotiation::WireFormat;

/// Render an outcome in the negotiated wire format.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use bookshelf::domain::{Error, Outcome};
/// use bookshelf::inbound::http::negotiation::WireFormat;
/// use bookshelf::inbound::http::response::respond;
///
/// let outcome: Outcome<()> = Outcome::failure(Error::forbidden("no"));
/// let response = respond(WireFormat::Json, &outcome);
/// assert_eq!(response.status(), StatusCode::FORBIDDEN);
/// ```
pub fn respond<T: Serialize>(format: WireFormat, outcome: &Outcome<T>) -> HttpResponse {
    let status = StatusCode::from_u16(outcome.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match format {
        WireFormat::Json => encode_json(outcome),
        WireFormat::Xml => encode_xml(outcome, &XmlOptions::default()),
    };
    match body {
        Ok(body) => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, format.content_type()))
            .body(body),
        Err(err) => {
            error!(error = %err, "failed to encode outcome");
            ApiFault::internal(format).error_response()
        }
    }
}
