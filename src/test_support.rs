// src/test_support.rs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::cache::CacheStore;
use crate::config::OAuthCredentials;
use crate::errors::AppError;
use crate::imgur::{HostAuth, ImageHost};
use crate::models::ImageRef;

pub fn credentials() -> OAuthCredentials {
    OAuthCredentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        refresh_token: "refresh".to_string(),
    }
}

pub fn image(id: &str) -> ImageRef {
    ImageRef {
        id: id.to_string(),
        link: format!("http://x/{}.jpg", id),
    }
}

pub struct RecordedUpload {
    pub album_hash: String,
    pub filename: String,
    pub mime_type: String,
    pub size: usize,
}

/// In-memory image host that records every call.
#[derive(Default)]
pub struct FakeImageHost {
    albums: Mutex<HashMap<String, Vec<ImageRef>>>,
    pub refresh_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub fail_refresh: AtomicBool,
    pub reject_uploads: AtomicBool,
    pub last_auth: Mutex<Option<HostAuth>>,
    pub uploads: Mutex<Vec<RecordedUpload>>,
}

impl FakeImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_album(&self, hash: &str, images: Vec<ImageRef>) {
        self.albums
            .lock()
            .unwrap()
            .insert(hash.to_string(), images);
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn refresh_access_token(
        &self,
        _credentials: &OAuthCredentials,
    ) -> Result<String, AppError> {
        let attempt = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        // Gives concurrent callers a chance to pile up behind the refresh.
        tokio::time::sleep(Duration::from_millis(10)).await;
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamUnavailable("refresh refused".to_string()));
        }
        Ok(format!("token-{}", attempt))
    }

    async fn list_album_images(
        &self,
        album_hash: &str,
        auth: &HostAuth,
    ) -> Result<Vec<ImageRef>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_auth.lock().unwrap() = Some(auth.clone());
        self.albums
            .lock()
            .unwrap()
            .get(album_hash)
            .cloned()
            .ok_or_else(|| AppError::UpstreamRejected(format!("album {} not found", album_hash)))
    }

    async fn upload_image(
        &self,
        _access_token: &str,
        album_hash: &str,
        image: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<ImageRef, AppError> {
        if self.reject_uploads.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamRejected("upload refused".to_string()));
        }

        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(RecordedUpload {
            album_hash: album_hash.to_string(),
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            size: image.len(),
        });
        let id = format!("uploaded-{}", uploads.len());
        let uploaded = ImageRef {
            link: format!("http://x/{}.png", id),
            id,
        };
        self.albums
            .lock()
            .unwrap()
            .entry(album_hash.to_string())
            .or_default()
            .push(uploaded.clone());
        Ok(uploaded)
    }

    async fn delete_image(&self, _access_token: &str, image_id: &str) -> Result<(), AppError> {
        let mut albums = self.albums.lock().unwrap();
        for images in albums.values_mut() {
            if let Some(position) = images.iter().position(|i| i.id == image_id) {
                images.remove(position);
                return Ok(());
            }
        }
        Err(AppError::UpstreamRejected(format!(
            "image {} not found",
            image_id
        )))
    }
}

/// Cache backend whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Err(AppError::CacheUnavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), AppError> {
        Err(AppError::CacheUnavailable("connection refused".to_string()))
    }

    async fn clear_all(&self) -> Result<(), AppError> {
        Err(AppError::CacheUnavailable("connection refused".to_string()))
    }
}
