//! Credential adapters: bcrypt password hashing and JWT session tokens.

mod bcrypt_hasher;
mod jwt_tokens;
mod token_config;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use jwt_tokens::JwtSessionTokens;
pub use token_config::{BuildMode, TokenConfigError, TokenSettings, token_settings_from_env};
