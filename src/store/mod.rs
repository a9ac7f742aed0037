//! User persistence seam.
//!
//! The webhook handler talks to a [`UserStore`] trait object, so the backing
//! database is an application choice. [`MemoryUserStore`] ships for
//! development and testing.

pub mod memory;

pub use memory::MemoryUserStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Record handed to the store for a `user.created` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub clerk_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: String,
}

/// Partial record for a `user.updated` event; no id or email, the target is
/// keyed by the event's Clerk id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub photo: String,
}

/// A stored user record. `id` is the local identifier that gets mirrored
/// back into Clerk public metadata after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub clerk_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: String,
}

/// Persistence operations for synchronized user records.
///
/// Implementations return `Ok(None)` when the operation had no record to act
/// on (e.g. an update for an unknown user); the handler still answers 200 in
/// that case, mirroring the provider's at-least-once delivery model. Whether
/// `create_user` is idempotent under duplicate delivery is the
/// implementation's concern.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a local record for a new provider account
    async fn create_user(&self, user: NewUser) -> Result<Option<UserRecord>>;

    /// Apply a partial update to the record with the given Clerk id
    async fn update_user(&self, clerk_id: &str, update: UserUpdate) -> Result<Option<UserRecord>>;

    /// Remove the record with the given Clerk id, returning it if present
    async fn delete_user(&self, clerk_id: &str) -> Result<Option<UserRecord>>;
}
