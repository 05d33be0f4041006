//! Product CRUD handlers. Each one borrows a store session for the length of the request.

use crate::error::{AppError, ErrorBody};
use crate::extractors::Session;
use crate::model::{Product, ProductUpdate};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

pub const UPDATED_MESSAGE: &str = "product updated";
pub const DELETED_MESSAGE: &str = "product deleted";

/// `?id=` selector used by the older update and delete routes.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[utoipa::path(get, path = "/", responses((status = 200, description = "Greeting", body = String)))]
pub async fn greet() -> Json<&'static str> {
    Json("Hello, World!")
}

#[utoipa::path(get, path = "/products", responses((status = 200, description = "All products", body = Vec<Product>)))]
pub async fn list(mut session: Session) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(session.list().await?))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "No product with this id", body = ErrorBody),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut session: Session,
) -> Result<Json<Product>, AppError> {
    let product = session.get(id).await?.ok_or_else(|| state.not_found())?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = Product,
    responses(
        (status = 200, description = "The stored product", body = Product),
        (status = 409, description = "Id already taken (postgres store)", body = ErrorBody),
    )
)]
pub async fn create(mut session: Session, Json(product): Json<Product>) -> Result<Json<Product>, AppError> {
    Ok(Json(session.create(product).await?))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Updated", body = String),
        (status = 404, description = "No product with this id", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    session: Session,
    Json(body): Json<ProductUpdate>,
) -> Result<Json<&'static str>, AppError> {
    update_product(&state, session, id, body).await
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted", body = String),
        (status = 404, description = "No product with this id", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    session: Session,
) -> Result<Json<&'static str>, AppError> {
    delete_product(&state, session, id).await
}

/// PUT /products?id=N
#[utoipa::path(
    put,
    path = "/products",
    params(("id" = i64, Query, description = "Product id")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Updated", body = String),
        (status = 404, description = "No product with this id", body = ErrorBody),
    )
)]
pub async fn update_by_query(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
    session: Session,
    Json(body): Json<ProductUpdate>,
) -> Result<Json<&'static str>, AppError> {
    update_product(&state, session, q.id, body).await
}

/// DELETE /products?id=N
#[utoipa::path(
    delete,
    path = "/products",
    params(("id" = i64, Query, description = "Product id")),
    responses(
        (status = 200, description = "Deleted", body = String),
        (status = 404, description = "No product with this id", body = ErrorBody),
    )
)]
pub async fn delete_by_query(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
    session: Session,
) -> Result<Json<&'static str>, AppError> {
    delete_product(&state, session, q.id).await
}

async fn update_product(
    state: &AppState,
    mut session: Session,
    id: i64,
    body: ProductUpdate,
) -> Result<Json<&'static str>, AppError> {
    session.update(id, body).await?.ok_or_else(|| state.not_found())?;
    Ok(Json(UPDATED_MESSAGE))
}

async fn delete_product(state: &AppState, mut session: Session, id: i64) -> Result<Json<&'static str>, AppError> {
    session.delete(id).await?.ok_or_else(|| state.not_found())?;
    Ok(Json(DELETED_MESSAGE))
}
