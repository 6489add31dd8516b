//! IdentityProvider の実装

pub mod jwt;

pub use jwt::{DEFAULT_TOKEN_TTL_SECS, JwtIdentityProvider};
