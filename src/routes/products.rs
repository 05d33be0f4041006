//! Product CRUD routes, including the older `/product` and `?id=` forms.

use crate::handlers::products::{
    create, delete as delete_handler, delete_by_query, greet, list, read, update, update_by_query,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(greet))
        .route(
            "/products",
            get(list).post(create).put(update_by_query).delete(delete_by_query),
        )
        .route("/products/:id", get(read).put(update).delete(delete_handler))
        .route("/product", post(create))
        .with_state(state)
}
