use std::sync::Arc;

use crate::clerk::{IdentityProvider, NullIdentityProvider};
use crate::store::{MemoryUserStore, UserStore};
use crate::webhook::SvixVerifier;

/// Application context for dependency injection and shared state
///
/// Holds the signature verifier, the user store, and the identity-provider
/// client behind trait objects, so tests can swap any of them out. Cloning is
/// cheap; everything inside is an `Arc`.
#[derive(Clone)]
pub struct AppContext {
    pub verifier: Arc<SvixVerifier>,
    pub store: Arc<dyn UserStore>,
    pub provider: Arc<dyn IdentityProvider>,
}

impl AppContext {
    /// Builder pattern for constructing AppContext
    ///
    /// The verifier is required up front; store and provider default to
    /// [`MemoryUserStore`] and [`NullIdentityProvider`].
    pub fn builder(verifier: Arc<SvixVerifier>) -> AppContextBuilder {
        AppContextBuilder::new(verifier)
    }
}

/// Builder for AppContext with fluent API
#[must_use = "builder does nothing until you call build()"]
pub struct AppContextBuilder {
    verifier: Arc<SvixVerifier>,
    store: Option<Arc<dyn UserStore>>,
    provider: Option<Arc<dyn IdentityProvider>>,
}

impl AppContextBuilder {
    pub fn new(verifier: Arc<SvixVerifier>) -> Self {
        Self {
            verifier,
            store: None,
            provider: None,
        }
    }

    /// Set the user store
    pub fn with_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the identity-provider client
    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn build(self) -> AppContext {
        AppContext {
            verifier: self.verifier,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryUserStore::new())),
            provider: self.provider.unwrap_or_else(|| Arc::new(NullIdentityProvider)),
        }
    }
}
