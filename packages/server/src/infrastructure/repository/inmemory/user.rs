//! InMemory User Repository 実装（読み取り専用のユーザーディレクトリ）

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{PersistenceError, UserId, UserIdentity, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<UserId, UserIdentity>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user (seeding / tests; registration lives outside the real-time core)
    pub fn insert_user(&self, user: UserIdentity) {
        self.users.insert(user.id, user);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserIdentity>, PersistenceError> {
        Ok(self.users.get(&user_id).map(|u| u.value().clone()))
    }
}
