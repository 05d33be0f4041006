//! In-memory store: an ordered list that lives as long as the process.

use super::{ProductStore, StoreSession};
use crate::error::AppError;
use crate::model::{Product, ProductUpdate};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// Products kept in insertion order. Duplicate ids may coexist; lookups hit the first.
#[derive(Clone, Default)]
pub struct MemoryStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        MemoryStore {
            products: Arc::new(RwLock::new(products)),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>, AppError> {
        Ok(Box::new(MemorySession {
            products: Arc::clone(&self.products),
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MemorySession {
    products: Arc<RwLock<Vec<Product>>>,
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        tracing::trace!("session released");
    }
}

impl MemorySession {
    fn position(products: &[Product], id: i64) -> Option<usize> {
        products.iter().position(|p| p.id == id)
    }
}

// A poisoned lock only means a writer panicked mid-request; the Vec itself is still valid.
#[async_trait]
impl StoreSession for MemorySession {
    async fn list(&mut self) -> Result<Vec<Product>, AppError> {
        let products = self.products.read().unwrap_or_else(PoisonError::into_inner);
        Ok(products.clone())
    }

    async fn get(&mut self, id: i64) -> Result<Option<Product>, AppError> {
        let products = self.products.read().unwrap_or_else(PoisonError::into_inner);
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&mut self, product: Product) -> Result<Product, AppError> {
        let mut products = self.products.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(id = product.id, "memory create");
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&mut self, id: i64, update: ProductUpdate) -> Result<Option<Product>, AppError> {
        let mut products = self.products.write().unwrap_or_else(PoisonError::into_inner);
        let Some(i) = Self::position(&products, id) else {
            return Ok(None);
        };
        tracing::debug!(id, "memory update");
        products[i].apply(update);
        Ok(Some(products[i].clone()))
    }

    async fn delete(&mut self, id: i64) -> Result<Option<Product>, AppError> {
        let mut products = self.products.write().unwrap_or_else(PoisonError::into_inner);
        let Some(i) = Self::position(&products, id) else {
            return Ok(None);
        };
        tracing::debug!(id, "memory delete");
        Ok(Some(products.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_products;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            name: name.into(),
            description: "d".into(),
            price: 1.5,
            quantity: 3,
        }
    }

    async fn seeded() -> Box<dyn StoreSession> {
        MemoryStore::with_products(seed_products()).session().await.unwrap()
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let mut s = seeded().await;
        s.create(product(10, "Mouse")).await.unwrap();
        let ids: Vec<i64> = s.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 10]);
    }

    #[tokio::test]
    async fn missing_id_is_none_everywhere() {
        let mut s = seeded().await;
        assert_eq!(s.get(999).await.unwrap(), None);
        assert_eq!(s.update(999, product(999, "x").into()).await.unwrap(), None);
        assert_eq!(s.delete(999).await.unwrap(), None);
        assert_eq!(s.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn duplicate_ids_coexist_and_first_wins() {
        let mut s = seeded().await;
        s.create(product(2, "Second phone")).await.unwrap();
        assert_eq!(s.list().await.unwrap().len(), 5);
        assert_eq!(s.get(2).await.unwrap().unwrap().name, "Smartphone");

        s.delete(2).await.unwrap();
        assert_eq!(s.get(2).await.unwrap().unwrap().name, "Second phone");
    }

    #[tokio::test]
    async fn update_never_changes_id() {
        let mut s = seeded().await;
        let updated = s.update(3, product(77, "Webcam2").into()).await.unwrap().unwrap();
        assert_eq!(updated.id, 3);
        assert_eq!(s.get(3).await.unwrap().unwrap().name, "Webcam2");
        assert_eq!(s.get(77).await.unwrap(), None);
    }

    #[tokio::test]
    async fn sessions_share_one_list() {
        let store = MemoryStore::new();
        let mut a = store.session().await.unwrap();
        let mut b = store.session().await.unwrap();
        a.create(product(1, "A")).await.unwrap();
        assert_eq!(b.get(1).await.unwrap().unwrap().name, "A");
        drop(a);
        assert_eq!(b.delete(1).await.unwrap().unwrap().id, 1);
        assert!(store.session().await.unwrap().list().await.unwrap().is_empty());
    }
}
