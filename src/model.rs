//! Product records as they travel over the wire and sit in the store.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    /// Caller supplied; never generated by the store.
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
}

/// Update request body. Carries the same fields as [`Product`]; `id` may be omitted
/// and is ignored when present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductUpdate {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
}

impl Product {
    /// Overwrite the mutable fields. The stored id is kept.
    pub fn apply(&mut self, update: ProductUpdate) {
        self.name = update.name;
        self.description = update.description;
        self.price = update.price;
        self.quantity = update.quantity;
    }
}

impl From<Product> for ProductUpdate {
    fn from(p: Product) -> Self {
        ProductUpdate {
            id: Some(p.id),
            name: p.name,
            description: p.description,
            price: p.price,
            quantity: p.quantity,
        }
    }
}

fn product(id: i64, name: &str, description: &str, price: f64, quantity: i64) -> Product {
    Product {
        id,
        name: name.into(),
        description: description.into(),
        price,
        quantity,
    }
}

/// The four starter records every fresh catalog is seeded with.
pub fn seed_products() -> Vec<Product> {
    vec![
        product(1, "Laptop", "lenovo", 1200.0, 10),
        product(2, "Smartphone", "iphone", 800.0, 20),
        product(3, "Webcam", "birro", 120.0, 4),
        product(4, "Converter", "usb", 80.0, 12),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_field_names() {
        let v = serde_json::to_value(&seed_products()[0]).unwrap();
        assert_eq!(
            v,
            json!({ "id": 1, "name": "Laptop", "description": "lenovo", "price": 1200.0, "quantity": 10 })
        );
    }

    #[test]
    fn product_requires_every_field() {
        let missing = json!({ "id": 9, "name": "x", "description": "y", "price": 1 });
        assert!(serde_json::from_value::<Product>(missing).is_err());
    }

    #[test]
    fn update_id_is_optional_and_ignored() {
        let update: ProductUpdate =
            serde_json::from_value(json!({ "name": "Webcam2", "description": "x", "price": 99, "quantity": 1 }))
                .unwrap();
        assert_eq!(update.id, None);

        let mut p = seed_products().remove(2);
        p.apply(ProductUpdate { id: Some(42), ..update });
        assert_eq!(p.id, 3);
        assert_eq!(p.name, "Webcam2");
        assert_eq!(p.price, 99.0);
        assert_eq!(p.quantity, 1);
    }
}
