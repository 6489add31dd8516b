//! Seed data for the in-memory user directory and room catalog.
//!
//! Users and rooms are managed outside the real-time core. For a standalone
//! server they are loaded from a JSON file, or from built-in demo data:
//!
//! ```json
//! {
//!   "users": [{ "id": 1, "username": "alice", "display_name": "Alice" }],
//!   "rooms": [{ "id": 7, "name": "general", "created_by": 1 }]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    domain::{Room, RoomId, Timestamp, UserId, UserIdentity, ValueObjectError},
    infrastructure::repository::{InMemoryMessageRepository, InMemoryUserRepository},
};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixtures: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse fixtures: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid fixture entry: {0}")]
    Invalid(#[from] ValueObjectError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserFixture {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomFixture {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub users: Vec<UserFixture>,
    #[serde(default)]
    pub rooms: Vec<RoomFixture>,
}

impl Fixtures {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Two users and a handful of public rooms
    pub fn demo() -> Self {
        let user = |id: i64, username: &str, display_name: &str| UserFixture {
            id,
            username: username.to_string(),
            display_name: Some(display_name.to_string()),
        };
        let room = |id: i64, name: &str, description: &str| RoomFixture {
            id,
            name: name.to_string(),
            description: description.to_string(),
            is_private: false,
            created_by: 1,
        };
        Self {
            users: vec![
                user(1, "alice", "Alice"),
                user(2, "bob", "Bob"),
                user(3, "carol", "Carol"),
            ],
            rooms: vec![
                room(1, "general", "General discussion"),
                room(2, "random", "Off-topic chat"),
                room(7, "lounge", "Hang out"),
            ],
        }
    }

    /// Seed the user directory and room catalog.
    ///
    /// A missing display name falls back to the username.
    pub fn seed(
        &self,
        users: &InMemoryUserRepository,
        messages: &InMemoryMessageRepository,
        created_at: Timestamp,
    ) -> Result<(), FixtureError> {
        for fixture in &self.users {
            let display_name = fixture
                .display_name
                .clone()
                .unwrap_or_else(|| fixture.username.clone());
            users.insert_user(UserIdentity::new(
                UserId::new(fixture.id)?,
                fixture.username.clone(),
                display_name,
            ));
        }
        for fixture in &self.rooms {
            messages.insert_room(Room {
                id: RoomId::new(fixture.id)?,
                name: fixture.name.clone(),
                description: fixture.description.clone(),
                is_private: fixture.is_private,
                created_by: UserId::new(fixture.created_by)?,
                created_at,
            });
        }
        tracing::info!(
            "Seeded {} user(s) and {} room(s)",
            self.users.len(),
            self.rooms.len()
        );
        Ok(())
    }
}
