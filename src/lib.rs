//! Catalog service: product CRUD over HTTP, backed by an in-memory list or PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{Settings, StoreBackend};
pub use error::{AppError, ConfigError};
pub use model::{seed_products, Product, ProductUpdate};
pub use routes::{app, common_routes, product_routes};
pub use state::AppState;
pub use store::{MemoryStore, PgStore, ProductStore, StoreSession};

use std::sync::Arc;

/// Build the store selected by `settings`. Postgres is bootstrapped (database,
/// table, seed rows) before this returns.
pub async fn build_store(settings: &Settings) -> Result<Arc<dyn ProductStore>, AppError> {
    let store: Arc<dyn ProductStore> = match &settings.backend {
        StoreBackend::Memory => {
            let products = if settings.seed_products { seed_products() } else { Vec::new() };
            Arc::new(MemoryStore::with_products(products))
        }
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => Arc::new(PgStore::connect(database_url, *max_connections, settings.seed_products).await?),
    };
    tracing::info!(backend = settings.backend.name(), "store ready");
    Ok(store)
}
