use anyhow::Context;
use clerk_sync::{App, ConfigBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigBuilder::new()
        .from_env()
        .build()
        .context("invalid configuration")?;

    clerk_sync::init_tracing_with_config(&config);

    if config.clerk.secret_key.is_none() {
        tracing::warn!("CLERK_SECRET_KEY not set; public metadata sync is disabled");
    }

    // Default wiring uses the in-memory store; deployments with a real
    // database build an AppContext with their own UserStore instead.
    let app = App::from_config(config).context("failed to build application")?;

    app.serve().await.context("server error")?;
    Ok(())
}
