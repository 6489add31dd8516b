//! JWT を使った IdentityProvider 実装
//!
//! トークンは HS256 署名の JWT で、`sub` クレームにユーザー ID を持ちます。
//! 署名・有効期限を検証した後、ユーザーディレクトリで実在するユーザーか確認します。

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{IdentityError, IdentityProvider, UserId, UserIdentity, UserRepository};

/// Default lifetime of issued tokens
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id as a decimal string
    sub: String,
    iat: u64,
    exp: u64,
}

pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    users: Arc<dyn UserRepository>,
    token_ttl_secs: u64,
}

impl JwtIdentityProvider {
    pub fn new(secret: &[u8], users: Arc<dyn UserRepository>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            users,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn with_token_ttl(mut self, token_ttl_secs: u64) -> Self {
        self.token_ttl_secs = token_ttl_secs;
        self
    }

    /// Issue a signed token for a user.
    ///
    /// Does not check that the user exists; verification does.
    pub fn issue_token(&self, user_id: UserId) -> Result<String, IdentityError> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::Signing(e.to_string()))
    }

    fn decode_user_id(&self, token: &str) -> Result<UserId, IdentityError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        let raw: i64 = data
            .claims
            .sub
            .parse()
            .map_err(|_| IdentityError::InvalidToken(format!("bad subject '{}'", data.claims.sub)))?;
        UserId::new(raw).map_err(|e| IdentityError::InvalidToken(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<UserIdentity, IdentityError> {
        if token.trim().is_empty() {
            return Err(IdentityError::MissingToken);
        }
        let user_id = self.decode_user_id(token)?;
        self.users
            .find_user(user_id)
            .await
            .map_err(|e| IdentityError::Directory(e.to_string()))?
            .ok_or(IdentityError::UnknownUser(user_id.value()))
    }
}
