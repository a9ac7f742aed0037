//! clerk-sync - Clerk webhook endpoint that keeps a local user store in sync
//!
//! Built on Axum and Tokio. The service terminates Clerk's `user.created`,
//! `user.updated`, and `user.deleted` webhook deliveries: each request is
//! authenticated against the Svix signing scheme, decoded into a typed event,
//! and applied to a pluggable user store. After a successful creation the
//! local record id is written back to the Clerk account as public metadata.
//!
//! # Features
//!
//! - **Verification**: native Svix HMAC-SHA256 verification with replay
//!   protection, no provider SDK required
//! - **Typed events**: a closed event enum instead of string matching
//! - **Pluggable persistence**: implement [`UserStore`] for your database;
//!   an in-memory store ships for development
//! - **Testing**: Alba-style HTTP testing utilities
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use clerk_sync::{App, ConfigBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ConfigBuilder::new().from_env().build().unwrap();
//!     clerk_sync::init_tracing_with_config(&config);
//!
//!     let app = App::from_config(config).unwrap();
//!     app.serve().await.unwrap();
//! }
//! ```

mod app;
pub mod clerk;
mod config;
mod core;
mod error;
pub mod health;
pub mod store;
pub mod testing;
pub mod utils;
pub mod webhook;

// Re-exports for public API
pub use app::{AppContext, AppContextBuilder};
pub use clerk::{ClerkClient, IdentityProvider, NullIdentityProvider};
pub use config::{ClerkConfig, Config, ConfigBuilder, LoggingConfig, ServerConfig, WebhookConfig};
pub use core::App;
pub use error::{Result, SyncError};
pub use health::{HealthResponse, HealthStatus};
pub use store::{MemoryUserStore, NewUser, UserRecord, UserStore, UserUpdate};
pub use webhook::{SvixHeaders, SvixVerifier, UserEvent, WEBHOOK_PATH};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults
///
/// Call early in `main()`, before creating the App.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "clerk_sync=debug")
/// - `CLERK_SYNC_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("CLERK_SYNC_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing from the logging section of a configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
