use crate::{
    app::AppContext,
    clerk::{ClerkClient, IdentityProvider, NullIdentityProvider},
    config::Config,
    health,
    webhook::{webhook_routes, SvixVerifier},
};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Request-id generator for the middleware stack
#[derive(Clone, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let request_id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(request_id))
    }
}

/// Main application structure for the sync service
pub struct App {
    router: Router<AppContext>,
    config: Config,
    context: AppContext,
}

impl App {
    /// Creates an App from a configuration and an injected context
    pub fn new(config: Config, context: AppContext) -> Self {
        let router = Router::new()
            .merge(webhook_routes())
            .route("/health", get(health::health_handler));

        Self {
            router,
            config,
            context,
        }
    }

    /// Creates an App with default wiring derived from the configuration:
    /// a verifier from `webhook.secret`, the in-memory store, and the Clerk
    /// client when `clerk.secret_key` is set (the no-op provider otherwise).
    pub fn from_config(config: Config) -> crate::error::Result<Self> {
        let verifier = Arc::new(
            SvixVerifier::new(&config.webhook.secret)?
                .with_tolerance(Duration::from_secs(config.webhook.tolerance_seconds)),
        );

        let provider: Arc<dyn IdentityProvider> = match &config.clerk.secret_key {
            Some(key) => Arc::new(ClerkClient::new(key.clone(), config.clerk.api_url.clone())),
            None => Arc::new(NullIdentityProvider),
        };

        let context = AppContext::builder(verifier).with_provider(provider).build();
        Ok(Self::new(config, context))
    }

    /// Get the router for testing purposes
    ///
    /// Returns the router with context state applied, ready for
    /// `tower::ServiceExt::oneshot` or the helpers in [`crate::testing`].
    pub fn into_test_router(self) -> Router {
        self.router.with_state(self.context)
    }

    /// Apply the middleware stack
    fn with_middleware(mut self) -> Self {
        let mut router = self.router;

        // Body size limit first: webhook payloads are small, reject oversized
        // bodies before reading them.
        router = router.layer(DefaultBodyLimit::max(self.config.server.max_body_size));

        // Request IDs, then HTTP tracing (innermost)
        router = router
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http());

        self.router = router;
        self
    }

    /// Start the application server
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let addr = self
            .config
            .server
            .addr()
            .expect("Invalid server address in config");

        let app = self.with_middleware();

        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("server starting on http://{}", addr);
        tracing::info!(
            "webhook endpoint at http://{}{}",
            addr,
            crate::webhook::handler::WEBHOOK_PATH
        );

        let router = app.router.with_state(app.context);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("received terminate signal, starting graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn test_from_config_requires_decodable_secret() {
        let config = ConfigBuilder::new()
            .with_webhook_secret("whsec_!!!not-base64!!!")
            .build()
            .unwrap();
        assert!(App::from_config(config).is_err());
    }

    #[test]
    fn test_from_config_with_valid_secret() {
        let config = ConfigBuilder::new()
            .with_webhook_secret("whsec_dGVzdC1zZWNyZXQ=")
            .build()
            .unwrap();
        assert!(App::from_config(config).is_ok());
    }
}
