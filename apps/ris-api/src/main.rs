use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use ris_api::{router, AppState};
use ris_core::config::Config;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ris_api=info".parse()?)
                .add_directive("ris_search=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let settings = Config::load()?.settings()?;
    // Built before the server runtime exists: the Lance backend drives its own runtime.
    let state = Arc::new(AppState::from_settings(&settings)?);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .with_context(|| format!("invalid server address {}:{}", settings.server.host, settings.server.port))?;

    tokio::runtime::Runtime::new()?.block_on(async move {
        info!("Starting search API on http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router(state)).await?;
        Ok(())
    })
}
