//! Authorization gate for protected endpoints.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! bearer credential parsing and token verification here. Verification is
//! pure; it never consults the user store.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::error;

use crate::domain::SessionClaims;
use crate::domain::ports::{SessionTokens, TokenError};

use super::error::ApiFault;
use super::negotiation::WireFormat;
use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Extract the bearer credential from request headers.
///
/// # Examples
/// ```
/// use actix_web::test::TestRequest;
/// use bookshelf::inbound::http::auth::bearer_token;
///
/// let req = TestRequest::default()
///     .insert_header(("Authorization", "Bearer abc.def.ghi"))
///     .to_http_request();
/// assert_eq!(bearer_token(req.headers()).unwrap(), "abc.def.ghi");
/// ```
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let raw = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(TokenError::Missing)?;
    let (scheme, token) = raw.trim().split_once(' ').ok_or(TokenError::Missing)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(TokenError::Missing);
    }
    Ok(token)
}

/// Verify the request's bearer token and return its claims.
pub fn authorize(tokens: &dyn SessionTokens, headers: &HeaderMap) -> Result<SessionClaims, TokenError> {
    tokens.verify(bearer_token(headers)?)
}

/// Verified caller identity.
///
/// Extracting this type rejects the request with 401 before the handler
/// runs when the token is missing, malformed or expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(pub SessionClaims);

impl Authenticated {
    /// Claims of the verified caller.
    #[must_use]
    pub fn claims(&self) -> &SessionClaims {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = ApiFault;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let format = WireFormat::from_request(req);
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            error!("http state missing from app data");
            return ready(Err(ApiFault::internal(format)));
        };
        let result = authorize(state.tokens.as_ref(), req.headers())
            .map(Authenticated)
            .map_err(|err| ApiFault::token(format, &err));
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockSessionTokens;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn claims() -> SessionClaims {
        SessionClaims {
            subject: "leguin".to_owned(),
            email: "ursula@example.com".to_owned(),
            username: "leguin".to_owned(),
            pseudonym: Some("Ursula K.".to_owned()),
            expires_at: Utc::now(),
        }
    }

    fn headers(authorization: Option<&'static str>) -> HeaderMap {
        let mut req = TestRequest::default();
        if let Some(value) = authorization {
            req = req.insert_header(("Authorization", value));
        }
        req.to_http_request().headers().clone()
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer    "))]
    fn absent_or_foreign_credentials_are_missing(#[case] authorization: Option<&'static str>) {
        let err = bearer_token(&headers(authorization)).expect_err("no bearer credential");
        assert_eq!(err, TokenError::Missing);
    }

    #[rstest]
    #[case("Bearer tkn", "tkn")]
    #[case("bearer tkn", "tkn")]
    #[case("BEARER   tkn ", "tkn")]
    fn bearer_scheme_is_case_insensitive(#[case] authorization: &'static str, #[case] token: &str) {
        let map = headers(Some(authorization));
        assert_eq!(bearer_token(&map).expect("bearer credential"), token);
    }

    #[rstest]
    fn verified_claims_are_returned(claims: SessionClaims) {
        let mut tokens = MockSessionTokens::new();
        let expected = claims.clone();
        tokens
            .expect_verify()
            .withf(|token| token == "good")
            .times(1)
            .return_once(move |_| Ok(claims));

        let recovered = authorize(&tokens, &headers(Some("Bearer good"))).expect("verified");
        assert_eq!(recovered, expected);
    }

    #[rstest]
    fn missing_header_skips_verification() {
        let mut tokens = MockSessionTokens::new();
        tokens.expect_verify().times(0);

        let err = authorize(&tokens, &headers(None)).expect_err("missing");
        assert_eq!(err, TokenError::Missing);
    }

    #[rstest]
    #[actix_web::test]
    async fn extractor_rejects_expired_tokens() {
        let mut tokens = MockSessionTokens::new();
        tokens
            .expect_verify()
            .return_once(|_| Err(TokenError::Expired));
        let state = crate::inbound::http::test_utils::state_with_tokens(tokens);

        let (req, mut payload) = TestRequest::default()
            .app_data(web::Data::new(state))
            .insert_header(("Authorization", "Bearer stale"))
            .to_http_parts();
        let fault = Authenticated::from_request(&req, &mut payload)
            .await
            .expect_err("expired");
        assert_eq!(fault.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(fault.detail(), &serde_json::json!("Token expired"));
    }
}
