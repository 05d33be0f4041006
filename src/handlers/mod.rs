//! HTTP handlers for the product catalog.

pub mod products;
pub use products::*;
