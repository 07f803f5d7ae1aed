// src/token.rs

use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::OAuthCredentials;
use crate::errors::AppError;
use crate::imgur::ImageHost;
use crate::models::AccessToken;

/// Access tokens older than this are refreshed before use.
pub const TOKEN_MAX_AGE_DAYS: i64 = 28;

/// Owns the process-wide access token.
///
/// The lock is held for the whole refresh, so callers arriving mid-refresh wait
/// and reuse the new token instead of issuing their own request.
pub struct TokenManager {
    host: Arc<dyn ImageHost>,
    credentials: OAuthCredentials,
    max_age: Duration,
    current: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    pub fn new(host: Arc<dyn ImageHost>, credentials: OAuthCredentials) -> Self {
        TokenManager {
            host,
            credentials,
            max_age: Duration::days(TOKEN_MAX_AGE_DAYS),
            current: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub fn with_token(self, token: AccessToken) -> Self {
        TokenManager {
            current: Mutex::new(Some(token)),
            ..self
        }
    }

    /// The stored token if it is still fresh. Never contacts the host.
    pub async fn current(&self) -> Option<AccessToken> {
        let current = self.current.lock().await;
        current
            .as_ref()
            .filter(|token| !token.is_stale(Utc::now(), self.max_age))
            .cloned()
    }

    pub async fn ensure_valid(&self) -> Result<AccessToken, AppError> {
        let mut current = self.current.lock().await;

        if let Some(token) = current.as_ref() {
            if !token.is_stale(Utc::now(), self.max_age) {
                return Ok(token.clone());
            }
            tracing::info!("Access token expired, fetching a new one");
        } else {
            tracing::info!("No access token available, fetching a new one");
        }

        match self.host.refresh_access_token(&self.credentials).await {
            Ok(value) => {
                let token = AccessToken::new(value);
                *current = Some(token.clone());
                tracing::info!("Access token fetched successfully");
                Ok(token)
            }
            Err(e) => {
                tracing::error!("Failed to refresh access token: {}", e);
                Err(AppError::TokenUnavailable)
            }
        }
    }
}
