//! OpenAPI document for the product routes, served at `/openapi.json`.

use crate::error::ErrorBody;
use crate::handlers::products;
use crate::model::{Product, ProductUpdate};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "catalog-service", description = "Product catalog CRUD"),
    paths(
        products::greet,
        products::list,
        products::read,
        products::create,
        products::update,
        products::delete,
        products::update_by_query,
        products::delete_by_query,
    ),
    components(schemas(Product, ProductUpdate, ErrorBody))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
