//! Per-request store session.

use crate::error::AppError;
use crate::state::AppState;
use crate::store::StoreSession;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Store session acquired before the handler runs and released when the request's
/// future finishes or is dropped, whatever the outcome.
pub struct Session(pub Box<dyn StoreSession>);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = state.store.session().await?;
        Ok(Session(session))
    }
}

impl std::ops::Deref for Session {
    type Target = dyn StoreSession;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}
