// src/middleware.rs

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{errors::AppError, state::AppState};

/// Guard for pages that need a valid access token. Rejects with a redirect to
/// the home page when no token can be obtained.
pub struct RequireHostToken;

impl FromRequestParts<AppState> for RequireHostToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = state.tokens.ensure_valid().await?;
        tracing::debug!(
            "Token from {} checked, proceeding to {}",
            token.fetched_at,
            parts.uri.path()
        );
        Ok(RequireHostToken)
    }
}

/// Same check as [`RequireHostToken`], but the request carries on without a
/// token. Album listings then fall back to `Client-ID` auth.
pub struct TryHostToken;

impl FromRequestParts<AppState> for TryHostToken {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Err(e) = state.tokens.ensure_valid().await {
            tracing::warn!("Rendering {} without access token: {}", parts.uri.path(), e);
        }
        Ok(TryHostToken)
    }
}
