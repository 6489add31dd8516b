//! Identity service interface.

use async_trait::async_trait;

use super::{IdentityError, UserIdentity};

/// Verifies credential tokens and resolves them to user identities.
///
/// Trusted as a black box by the session store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<UserIdentity, IdentityError>;
}
