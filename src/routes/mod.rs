pub mod common;
pub mod products;

pub use common::common_routes;
pub use products::product_routes;

use crate::config::Settings;
use crate::error::ConfigError;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application router: product and common routes with tracing, body limit, and
/// optional single-origin CORS.
pub fn app(state: AppState, settings: &Settings) -> Result<Router, ConfigError> {
    let mut router = Router::new()
        .merge(product_routes(state.clone()))
        .merge(common_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes))
                .layer(DefaultBodyLimit::disable()),
        );
    if let Some(origin) = &settings.cors_origin {
        router = router.layer(cors_layer(origin)?);
    }
    Ok(router)
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = origin.parse::<HeaderValue>().map_err(|e| ConfigError::InvalidValue {
        key: "CORS_ORIGIN",
        value: origin.to_string(),
        reason: e.to_string(),
    })?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
