//! Store contract against a live PostgreSQL. Skipped unless `TEST_DATABASE_URL` is set.

use catalog_service::store::{seed_table, PgStore};
use catalog_service::{AppError, Product, ProductStore, ProductUpdate};

async fn store() -> Option<PgStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let store = PgStore::connect(&url, 2, false).await.unwrap();
    sqlx::query("DELETE FROM products").execute(store.pool()).await.unwrap();
    seed_table(store.pool()).await.unwrap();
    Some(store)
}

fn product(id: i64, name: &str) -> Product {
    Product {
        id,
        name: name.into(),
        description: "desc".into(),
        price: 9.5,
        quantity: 2,
    }
}

#[tokio::test]
async fn postgres_store_contract() {
    let Some(store) = store().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    // Seeding again inserts nothing.
    assert_eq!(seed_table(store.pool()).await.unwrap(), 0);

    let mut s = store.session().await.unwrap();
    let ids: Vec<i64> = s.list().await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(s.get(2).await.unwrap().unwrap().name, "Smartphone");
    assert_eq!(s.get(999).await.unwrap(), None);

    let created = s.create(product(5, "Mouse")).await.unwrap();
    assert_eq!(created, product(5, "Mouse"));
    assert_eq!(s.list().await.unwrap().len(), 5);
    assert!(matches!(s.create(product(5, "Again")).await, Err(AppError::Conflict(_))));

    let update = ProductUpdate {
        id: Some(77),
        name: "Webcam2".into(),
        description: "x".into(),
        price: 99.0,
        quantity: 1,
    };
    let updated = s.update(3, update.clone()).await.unwrap().unwrap();
    assert_eq!(updated.id, 3);
    assert_eq!(updated.name, "Webcam2");
    assert_eq!(s.update(999, update).await.unwrap(), None);

    assert_eq!(s.delete(4).await.unwrap().unwrap().id, 4);
    assert_eq!(s.delete(4).await.unwrap(), None);
    assert_eq!(s.get(4).await.unwrap(), None);
    assert_eq!(s.list().await.unwrap().len(), 4);

    drop(s);
    store.ping().await.unwrap();
    store.close().await;
}
