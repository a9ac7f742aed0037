use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{NewUser, UserRecord, UserStore, UserUpdate};
use crate::error::Result;

/// In-memory user store keyed by Clerk id (for development/testing)
///
/// In production, implement [`UserStore`] against your database instead.
/// `create_user` is not idempotent: a duplicate `user.created` delivery
/// overwrites the existing record under the same Clerk id.
#[derive(Clone)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Look up a record by Clerk id
    pub async fn get(&self, clerk_id: &str) -> Option<UserRecord> {
        let users = self.users.read().await;
        users.get(clerk_id).cloned()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        let users = self.users.read().await;
        users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: NewUser) -> Result<Option<UserRecord>> {
        let record = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            clerk_id: user.clerk_id.clone(),
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            photo: user.photo,
        };

        let mut users = self.users.write().await;
        users.insert(user.clerk_id, record.clone());
        Ok(Some(record))
    }

    async fn update_user(&self, clerk_id: &str, update: UserUpdate) -> Result<Option<UserRecord>> {
        let mut users = self.users.write().await;
        let Some(record) = users.get_mut(clerk_id) else {
            return Ok(None);
        };

        record.first_name = update.first_name;
        record.last_name = update.last_name;
        record.username = update.username;
        record.photo = update.photo;
        Ok(Some(record.clone()))
    }

    async fn delete_user(&self, clerk_id: &str) -> Result<Option<UserRecord>> {
        let mut users = self.users.write().await;
        Ok(users.remove(clerk_id))
    }
}
