//! In-memory account store.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Public view of a [`User`], without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    Username,
    Email,
}

#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `user` unless its username or email (compared case
    /// insensitively) is already taken.
    pub async fn insert(&self, user: User) -> Result<(), Conflict> {
        let mut users = self.users.write().await;
        for existing in users.values() {
            if existing.username.eq_ignore_ascii_case(&user.username) {
                return Err(Conflict::Username);
            }
            if existing.email.eq_ignore_ascii_case(&user.email) {
                return Err(Conflict::Email);
            }
        }
        users.insert(user.id, user);
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned()
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id)?;
        user.last_login_at = Some(Utc::now());
        Some(user.clone())
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn test_rejects_case_insensitive_duplicates() {
        let store = UserStore::new();
        store.insert(user("Ada", "ada@example.com")).await.unwrap();
        assert_eq!(
            store.insert(user("ada", "other@example.com")).await,
            Err(Conflict::Username)
        );
        assert_eq!(
            store.insert(user("grace", "ADA@example.com")).await,
            Err(Conflict::Email)
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_and_touch() {
        let store = UserStore::new();
        let ada = user("ada", "ada@example.com");
        let id = ada.id;
        store.insert(ada).await.unwrap();

        assert_eq!(store.find_by_username("ADA").await.unwrap().id, id);
        assert!(store.find_by_id(id).await.unwrap().last_login_at.is_none());

        let touched = store.touch_last_login(id).await.unwrap();
        assert!(touched.last_login_at.is_some());
        assert!(store.touch_last_login(Uuid::new_v4()).await.is_none());
    }
}
