//! Inbound webhook handling.
//!
//! Provides Svix signature verification, typed user lifecycle events, and the
//! axum handler that applies each event to the user store.

pub mod event;
pub mod handler;
pub mod verify;

pub use event::{UserCreatedData, UserDeletedData, UserEvent, UserUpdatedData};
pub use handler::{webhook_routes, WEBHOOK_PATH};
pub use verify::{SvixHeaders, SvixVerifier, DEFAULT_TIMESTAMP_TOLERANCE};
