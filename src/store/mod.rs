//! Resource Store: owns Product records and answers CRUD by primary key.
//!
//! A [`ProductStore`] is built once at startup and shared by every request. Each
//! request borrows a [`StoreSession`] from it; the session is released when dropped.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{seed_table, PgStore};

use crate::error::AppError;
use crate::model::{Product, ProductUpdate};
use async_trait::async_trait;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Acquire a session scoped to one request.
    async fn session(&self) -> Result<Box<dyn StoreSession>, AppError>;

    /// Check the backend can serve requests.
    async fn ping(&self) -> Result<(), AppError>;

    /// Release backend resources at shutdown.
    async fn close(&self) {}
}

#[async_trait]
pub trait StoreSession: Send {
    async fn list(&mut self) -> Result<Vec<Product>, AppError>;

    /// First product whose id equals `id`.
    async fn get(&mut self, id: i64) -> Result<Option<Product>, AppError>;

    /// Store `product` without checking for an existing id.
    async fn create(&mut self, product: Product) -> Result<Product, AppError>;

    /// Replace the mutable fields of the first match. The stored id is never changed.
    async fn update(&mut self, id: i64, update: ProductUpdate) -> Result<Option<Product>, AppError>;

    /// Remove the first match and return it.
    async fn delete(&mut self, id: i64) -> Result<Option<Product>, AppError>;
}
