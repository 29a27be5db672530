//! In-memory credential store for local runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::seed::SEED_USERS;
use super::CredentialStore;
use crate::error::Result;
use crate::models::User;
use crate::security::password;

pub struct InMemoryCredentialStore {
    users: HashMap<String, User>,
}

impl InMemoryCredentialStore {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|u| (u.username.clone(), u))
                .collect(),
        }
    }

    /// Store pre-loaded with the demo user set, hashed at the given cost.
    pub fn seeded(cost: u32) -> Result<Self> {
        let mut users = Vec::with_capacity(SEED_USERS.len());
        for &(username, plaintext, can_view) in SEED_USERS {
            users.push(User {
                id: Uuid::new_v4(),
                username: username.to_owned(),
                password_hash: password::hash_password(plaintext, cost)?,
                can_view_pokemon: can_view,
            });
        }

        Ok(Self::new(users))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn seeded_store_resolves_known_users() {
        let store = InMemoryCredentialStore::seeded(TEST_COST).unwrap();

        let ash = store.find_by_username("ash").await.unwrap().unwrap();
        assert!(ash.can_view_pokemon);
        assert!(password::verify_password("pikachu123", &ash.password_hash));

        let gary = store.find_by_username("gary").await.unwrap().unwrap();
        assert!(!gary.can_view_pokemon);
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = InMemoryCredentialStore::seeded(TEST_COST).unwrap();

        assert!(store.find_by_username("Ash").await.unwrap().is_none());
        assert!(store.find_by_username("ASH").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let store = InMemoryCredentialStore::seeded(TEST_COST).unwrap();
        assert!(store.find_by_username("oak").await.unwrap().is_none());
    }
}
