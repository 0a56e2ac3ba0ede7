//! Format-aware request body extractor.
//!
//! The body is read to completion, decoded according to the request
//! `Content-Type` and then deserialised into the target schema. Any failure
//! becomes a 422 [`ApiFault`] in the negotiated wire format.

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::codec::decode;
use super::error::ApiFault;
use super::negotiation::{BodyFormat, WireFormat};

/// Schema that names the XML root element its documents are wrapped in.
pub trait RootElement {
    /// Root element name, for example `book`.
    const ROOT: &'static str;
}

/// Decoded and schema-validated request body.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBody<T>(pub T);

impl<T> DecodedBody<T> {
    /// Unwrap the decoded schema.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for DecodedBody<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Decode raw bytes into `T` using the given formats.
pub fn decode_body<T>(body_format: BodyFormat, wire: WireFormat, bytes: &[u8]) -> Result<T, ApiFault>
where
    T: DeserializeOwned + RootElement,
{
    let fields = decode(body_format, bytes, T::ROOT).map_err(|err| ApiFault::body(wire, &err))?;
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| ApiFault::validation(wire, &["body"], err.to_string()))
}

impl<T> FromRequest for DecodedBody<T>
where
    T: DeserializeOwned + RootElement + 'static,
{
    type Error = ApiFault;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let wire = WireFormat::from_request(req);
        let body_format = BodyFormat::from_headers(req.headers());
        let bytes = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let bytes = bytes
                .await
                .map_err(|err| ApiFault::validation(wire, &["body"], err.to_string()))?;
            decode_body(body_format, wire, &bytes).map(DecodedBody)
        })
    }
}
