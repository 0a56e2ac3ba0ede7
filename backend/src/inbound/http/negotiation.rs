//! Wire format negotiation.
//!
//! The request `Content-Type` decides both how a body is decoded and how the
//! response is rendered. Without a `Content-Type`, the first `Accept` entry
//! decides the response format. Anything that is not XML falls back to JSON.

use std::convert::Infallible;

use actix_web::dev::Payload;
use actix_web::http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName};
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

const FORM_MIME: &str = "application/x-www-form-urlencoded";

/// Response rendering format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireFormat {
    /// `application/json`.
    #[default]
    Json,
    /// `application/xml`.
    Xml,
}

/// Request body decoding format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormat {
    /// JSON object body.
    #[default]
    Json,
    /// XML document with a declared root element.
    Xml,
    /// `application/x-www-form-urlencoded` fields.
    Form,
}

fn essence(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    let raw = headers.get(name)?.to_str().ok()?;
    let first = raw.split(',').next()?;
    let essence = first.split(';').next()?.trim().to_ascii_lowercase();
    (!essence.is_empty()).then_some(essence)
}

fn is_xml(essence: &str) -> bool {
    matches!(essence, "application/xml" | "text/xml") || essence.ends_with("+xml")
}

impl WireFormat {
    /// Pick the response format for a request.
    ///
    /// # Examples
    /// ```
    /// use actix_web::test::TestRequest;
    /// use bookshelf::inbound::http::negotiation::WireFormat;
    ///
    /// let req = TestRequest::default()
    ///     .insert_header(("Content-Type", "application/xml; charset=utf-8"))
    ///     .to_http_request();
    /// assert_eq!(WireFormat::from_request(&req), WireFormat::Xml);
    /// ```
    #[must_use]
    pub fn from_request(req: &HttpRequest) -> Self {
        Self::from_headers(req.headers())
    }

    /// Pick the response format from raw headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let chosen = essence(headers, CONTENT_TYPE).or_else(|| essence(headers, ACCEPT));
        match chosen {
            Some(value) if is_xml(&value) => Self::Xml,
            _ => Self::Json,
        }
    }

    /// Media type written on responses.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

impl BodyFormat {
    /// Pick the body decoder from the request `Content-Type`.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match essence(headers, CONTENT_TYPE).as_deref() {
            Some(value) if is_xml(value) => Self::Xml,
            Some(FORM_MIME) => Self::Form,
            _ => Self::Json,
        }
    }
}

impl FromRequest for WireFormat {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_request(req)))
    }
}
