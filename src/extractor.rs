// src/extractor.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::models::SiteMetadata;
use crate::state::AppState;

/// Site metadata loaded for the current request. A missing document renders as
/// empty fields; a store failure rejects the request with a 500.
pub struct SiteContext(pub SiteMetadata);

impl FromRequestParts<AppState> for SiteContext {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let metadata = state.metadata_store.load().await.map_err(|e| {
            tracing::error!("Error fetching site metadata: {}", e);
            e
        })?;

        Ok(SiteContext(metadata.unwrap_or_default()))
    }
}
