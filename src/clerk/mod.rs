//! Outbound Clerk Backend API access.
//!
//! After a local record is created, its id is mirrored back onto the Clerk
//! account as public metadata. The handler depends on the [`IdentityProvider`]
//! trait; [`ClerkClient`] is the real HTTP implementation and
//! [`NullIdentityProvider`] is the explicit no-op used when no API key is
//! configured.

pub mod client;

pub use client::ClerkClient;

use async_trait::async_trait;

use crate::error::Result;

/// Provider-side operations the sync handler needs
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Attach the local record id to the provider account as public metadata
    async fn update_user_metadata(&self, clerk_id: &str, user_id: &str) -> Result<()>;
}

/// No-op provider for deployments without Clerk API credentials
///
/// Logs a warning per skipped call so disabled metadata sync is visible in
/// production logs rather than silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIdentityProvider;

#[async_trait]
impl IdentityProvider for NullIdentityProvider {
    async fn update_user_metadata(&self, clerk_id: &str, user_id: &str) -> Result<()> {
        tracing::warn!(
            clerk_id = clerk_id,
            user_id = user_id,
            "no Clerk API key configured; skipping metadata update"
        );
        Ok(())
    }
}
