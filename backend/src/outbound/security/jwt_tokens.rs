//! HMAC-signed JWT implementation of the `SessionTokens` port.
//!
//! Expiry is checked against the injected clock with zero leeway; the
//! library's own wall-clock check is disabled. `exp` must be present.

use std::sync::Arc;

use chrono::DateTime;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{SessionTokens, TokenError};
use crate::domain::{SessionClaims, User};

use super::token_config::TokenSettings;

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    email: String,
    username: String,
    #[serde(default)]
    author_pseudonym: Option<String>,
    exp: i64,
}

/// JWT issuer and verifier bound to one secret and algorithm.
pub struct JwtSessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
    lifetime: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl JwtSessionTokens {
    /// Build signing and verification keys from `settings`; `clock` decides
    /// issue time and expiry.
    pub fn new(settings: &TokenSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(settings.algorithm());
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(settings.secret()),
            decoding: DecodingKey::from_secret(settings.secret()),
            header: Header::new(settings.algorithm()),
            validation,
            lifetime: settings.lifetime(),
            clock,
        }
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue(&self, user: &User) -> Result<String, TokenError> {
        let expires_at = self.clock.utc() + self.lifetime;
        let claims = WireClaims {
            sub: Some(user.username.clone()),
            email: user.email.clone(),
            username: user.username.clone(),
            author_pseudonym: user.pseudonym.clone(),
            exp: expires_at.timestamp(),
        };
        encode(&self.header, &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = decode::<WireClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "token rejected");
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        let claims = data.claims;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::Expired);
        }
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?;
        let subject = claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(TokenError::SubjectMissing)?;

        Ok(SessionClaims {
            subject,
            email: claims.email,
            username: claims.username,
            pseudonym: claims.author_pseudonym,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Issue and verify against a fixed clock.
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use jsonwebtoken::Algorithm;
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    const SECRET: &str = "test-secret";

    fn clock_at(seconds: i64) -> Arc<dyn Clock> {
        let now = Utc.timestamp_opt(seconds, 0).single().expect("valid instant");
        let mut clock = MockClock::new();
        clock.expect_utc().returning(move || now);
        Arc::new(clock)
    }

    fn tokens_at(seconds: i64, algorithm: Algorithm) -> JwtSessionTokens {
        let settings = TokenSettings::new(SECRET, algorithm, Duration::minutes(10));
        JwtSessionTokens::new(&settings, clock_at(seconds))
    }

    #[fixture]
    fn frank() -> User {
        User {
            id: 7,
            first_name: "Frank".to_owned(),
            last_name: "Herbert".to_owned(),
            email: "frank@example.com".to_owned(),
            username: "herbert".to_owned(),
            pseudonym: Some("Frank".to_owned()),
            is_active: true,
        }
    }

    const START: i64 = 1_700_000_000;

    #[rstest]
    #[case(Algorithm::HS256)]
    #[case(Algorithm::HS384)]
    #[case(Algorithm::HS512)]
    fn issued_tokens_verify_within_lifetime(frank: User, #[case] algorithm: Algorithm) {
        let token = tokens_at(START, algorithm).issue(&frank).expect("issue");
        let claims = tokens_at(START + 60, algorithm)
            .verify(&token)
            .expect("verify");

        assert_eq!(claims.subject, "herbert");
        assert_eq!(claims.email, "frank@example.com");
        assert_eq!(claims.pseudonym.as_deref(), Some("Frank"));
        assert_eq!(claims.expires_at.timestamp(), START + 600);
    }

    #[rstest]
    fn tokens_expire_after_lifetime(frank: User) {
        let token = tokens_at(START, Algorithm::HS256).issue(&frank).expect("issue");
        let err = tokens_at(START + 601, Algorithm::HS256)
            .verify(&token)
            .expect_err("expired");
        assert_eq!(err, TokenError::Expired);
    }

    #[rstest]
    fn wrong_secret_is_invalid(frank: User) {
        let token = tokens_at(START, Algorithm::HS256).issue(&frank).expect("issue");
        let other = TokenSettings::new("other", Algorithm::HS256, Duration::minutes(10));
        let err = JwtSessionTokens::new(&other, clock_at(START))
            .verify(&token)
            .expect_err("bad signature");
        assert_eq!(err, TokenError::Invalid);
    }

    #[rstest]
    fn algorithm_mismatch_is_invalid(frank: User) {
        let token = tokens_at(START, Algorithm::HS512).issue(&frank).expect("issue");
        let err = tokens_at(START, Algorithm::HS256)
            .verify(&token)
            .expect_err("wrong algorithm");
        assert_eq!(err, TokenError::Invalid);
    }

    #[rstest]
    fn garbage_is_invalid() {
        let err = tokens_at(START, Algorithm::HS256)
            .verify("not.a.token")
            .expect_err("garbage");
        assert_eq!(err, TokenError::Invalid);
    }

    fn signed(claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode")
    }

    #[rstest]
    fn missing_subject_is_reported() {
        let token = signed(&serde_json::json!({
            "email": "frank@example.com",
            "username": "herbert",
            "exp": START + 600,
        }));
        let err = tokens_at(START, Algorithm::HS256)
            .verify(&token)
            .expect_err("no subject");
        assert_eq!(err, TokenError::SubjectMissing);
    }

    #[rstest]
    fn missing_expiry_is_invalid() {
        let token = signed(&serde_json::json!({
            "sub": "herbert",
            "email": "frank@example.com",
            "username": "herbert",
        }));
        let err = tokens_at(START, Algorithm::HS256)
            .verify(&token)
            .expect_err("no exp");
        assert_eq!(err, TokenError::Invalid);
    }
}
