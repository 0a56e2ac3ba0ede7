//! Token signing settings read from the environment.
//!
//! - `AUTH_SECRET_KEY`: HMAC secret. Required in release builds.
//! - `AUTH_ALGORITHM`: `HS256`, `HS384` or `HS512` (default `HS256`).
//! - `AUTH_ACCESS_TOKEN_EXPIRE_MINUTES`: token lifetime (default 14400).

use chrono::Duration;
use jsonwebtoken::Algorithm;
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

const SECRET_ENV: &str = "AUTH_SECRET_KEY";
const ALGORITHM_ENV: &str = "AUTH_ALGORITHM";
const EXPIRY_ENV: &str = "AUTH_ACCESS_TOKEN_EXPIRE_MINUTES";
const ALGORITHM_EXPECTED: &str = "HS256|HS384|HS512";
const DEFAULT_EXPIRY_MINUTES: i64 = 14_400;
const DEVELOPMENT_SECRET: &str = "bookshelf-development-secret";

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a development secret.
    Debug,
    /// Release builds require an explicit secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TokenConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Validated token signing settings.
pub struct TokenSettings {
    secret: Zeroizing<String>,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl TokenSettings {
    /// Assemble settings directly, e.g. for tests.
    pub fn new(secret: impl Into<String>, algorithm: Algorithm, lifetime: Duration) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            algorithm,
            lifetime,
        }
    }

    /// Signing secret.
    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    /// HMAC signing algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Token lifetime from issue to expiry.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

/// Read token settings from `env`.
///
/// # Examples
///
/// ```rust
/// use bookshelf::outbound::security::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "AUTH_SECRET_KEY" => Some("s3cret".to_owned()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release).unwrap();
/// assert_eq!(settings.lifetime().num_minutes(), 14_400);
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let secret = secret_from_env(env, mode)?;
    let algorithm = algorithm_from_env(env)?;
    let lifetime = lifetime_from_env(env)?;
    Ok(TokenSettings {
        secret,
        algorithm,
        lifetime,
    })
}

fn secret_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Zeroizing<String>, TokenConfigError> {
    match env.string(SECRET_ENV).filter(|value| !value.is_empty()) {
        Some(secret) => Ok(Zeroizing::new(secret)),
        None if mode == BuildMode::Debug => {
            warn!("AUTH_SECRET_KEY not set; using development secret");
            Ok(Zeroizing::new(DEVELOPMENT_SECRET.to_owned()))
        }
        None => Err(TokenConfigError::MissingEnv { name: SECRET_ENV }),
    }
}

fn algorithm_from_env<E: Env>(env: &E) -> Result<Algorithm, TokenConfigError> {
    let Some(value) = env.string(ALGORITHM_ENV) else {
        return Ok(Algorithm::HS256);
    };
    match value.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(TokenConfigError::InvalidEnv {
            name: ALGORITHM_ENV,
            value,
            expected: ALGORITHM_EXPECTED,
        }),
    }
}

fn lifetime_from_env<E: Env>(env: &E) -> Result<Duration, TokenConfigError> {
    let Some(value) = env.string(EXPIRY_ENV) else {
        return Ok(Duration::minutes(DEFAULT_EXPIRY_MINUTES));
    };
    match value.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => Ok(Duration::minutes(minutes)),
        _ => Err(TokenConfigError::InvalidEnv {
            name: EXPIRY_ENV,
            value,
            expected: "a positive number of minutes",
        }),
    }
}

#[cfg(test)]
mod tests {
    //! Environment parsing for token settings.
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;

    fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    #[rstest]
    fn release_requires_secret() {
        let env = mock_env(&[]);
        let err = token_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("missing secret rejected");
        assert_eq!(err, TokenConfigError::MissingEnv { name: SECRET_ENV });
    }

    #[rstest]
    fn debug_falls_back_to_development_secret() {
        let env = mock_env(&[]);
        let settings = token_settings_from_env(&env, BuildMode::Debug).expect("settings");
        assert_eq!(settings.secret(), DEVELOPMENT_SECRET.as_bytes());
        assert_eq!(settings.algorithm(), Algorithm::HS256);
        assert_eq!(settings.lifetime(), Duration::minutes(DEFAULT_EXPIRY_MINUTES));
    }

    #[rstest]
    #[case("hs384", Algorithm::HS384)]
    #[case("HS512", Algorithm::HS512)]
    fn algorithm_is_configurable(#[case] raw: &str, #[case] expected: Algorithm) {
        let env = mock_env(&[(SECRET_ENV, "k"), (ALGORITHM_ENV, raw)]);
        let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings");
        assert_eq!(settings.algorithm(), expected);
    }

    #[rstest]
    #[case(ALGORITHM_ENV, "RS256")]
    #[case(EXPIRY_ENV, "0")]
    #[case(EXPIRY_ENV, "soon")]
    fn invalid_values_are_rejected(#[case] name: &'static str, #[case] value: &str) {
        let env = mock_env(&[(SECRET_ENV, "k"), (name, value)]);
        let err = token_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("invalid value rejected");
        assert!(matches!(err, TokenConfigError::InvalidEnv { name: n, .. } if n == name));
    }

    #[rstest]
    fn expiry_is_read_in_minutes() {
        let env = mock_env(&[(SECRET_ENV, "k"), (EXPIRY_ENV, "30")]);
        let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings");
        assert_eq!(settings.lifetime(), Duration::minutes(30));
    }
}
