//! Shared application state for all routes.

use crate::error::AppError;
use crate::store::ProductStore;
use axum::http::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    /// Status sent with the not-found body: 404, or 200 for legacy clients.
    pub not_found_status: StatusCode,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        AppState {
            store,
            not_found_status: StatusCode::NOT_FOUND,
        }
    }

    pub fn with_legacy_not_found(mut self, legacy: bool) -> Self {
        self.not_found_status = if legacy { StatusCode::OK } else { StatusCode::NOT_FOUND };
        self
    }

    pub fn not_found(&self) -> AppError {
        AppError::NotFound {
            status: self.not_found_status,
        }
    }
}
