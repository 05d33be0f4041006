//! Catalog server: reads settings from the environment (and `.env`), builds the
//! configured store, and serves the product routes until Ctrl-C.
//!
//! Run from repo root: `cargo run -p catalog-server`

use catalog_service::{app, build_store, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("catalog_service=info,catalog_server=info,tower_http=info")
            }),
        )
        .init();

    let settings = Settings::from_env()?;
    let store = build_store(&settings).await?;
    let state = AppState::new(store.clone()).with_legacy_not_found(settings.legacy_not_found);
    let router = app(state, &settings)?;

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("catalog listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("store closed, bye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
