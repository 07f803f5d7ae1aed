// src/services.rs

use futures::future::join_all;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::errors::AppError;
use crate::image_processing;
use crate::imgur::{HostAuth, ImageHost, is_host_id};
use crate::models::{AlbumImages, AlbumRef, ImageRef};
use crate::token::TokenManager;

/// How long an album listing stays cached.
pub const ALBUM_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Album reads, uploads and deletes against the image host, with album listings
/// memoized in the cache.
pub struct Gallery {
    host: Arc<dyn ImageHost>,
    cache: Arc<dyn CacheStore>,
    tokens: Arc<TokenManager>,
}

impl Gallery {
    pub fn new(
        host: Arc<dyn ImageHost>,
        cache: Arc<dyn CacheStore>,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Gallery {
            host,
            cache,
            tokens,
        }
    }

    /// Returns the album's images, or `None` when the host could not be reached.
    ///
    /// 1. A cache hit is returned without contacting the host.
    /// 2. On a miss the host is asked with the stored access token, or with
    ///    `Client-ID` auth when none is held. Listing never triggers a refresh.
    /// 3. The fresh listing is cached for an hour.
    pub async fn fetch_album_images(&self, album_hash: &str) -> Option<Vec<ImageRef>> {
        match self.cache.get(album_hash).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<ImageRef>>(&bytes) {
                Ok(images) => {
                    tracing::info!("Cache HIT for album {}", album_hash);
                    return Some(images);
                }
                Err(e) => {
                    tracing::warn!("Discarding unreadable cache entry for {}: {}", album_hash, e)
                }
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache read failed for album {}: {}", album_hash, e),
        }

        tracing::info!("Cache MISS for album {}, fetching from image host", album_hash);
        let auth = match self.tokens.current().await {
            Some(token) => HostAuth::Bearer(token.value),
            None => HostAuth::ClientId,
        };

        let images = match self.host.list_album_images(album_hash, &auth).await {
            Ok(images) => images,
            Err(e) => {
                tracing::error!("Error fetching images for album {}: {}", album_hash, e);
                return None;
            }
        };

        match serde_json::to_vec(&images) {
            Ok(bytes) => {
                if let Err(e) = self.cache.set(album_hash, bytes, ALBUM_CACHE_TTL).await {
                    tracing::warn!("Could not cache album {}: {}", album_hash, e);
                }
            }
            Err(e) => tracing::warn!("Could not serialize album {}: {}", album_hash, e),
        }

        tracing::info!(
            "Images for album {} fetched from image host and cached",
            album_hash
        );
        Some(images)
    }

    /// Loads every album concurrently, keeping the given order.
    pub async fn load_albums(&self, albums: &[AlbumRef]) -> Vec<AlbumImages> {
        let fetches = albums.iter().map(|album| async move {
            AlbumImages {
                name: album.name,
                hash: album.hash,
                images: self.fetch_album_images(album.hash).await,
            }
        });
        join_all(fetches).await
    }

    pub async fn upload_image(
        &self,
        album_hash: &str,
        image: Vec<u8>,
        filename: &str,
    ) -> Result<ImageRef, AppError> {
        if image.is_empty() {
            return Err(AppError::NoFileProvided);
        }
        if !is_host_id(album_hash) {
            return Err(AppError::UnprocessableEntity(format!(
                "Invalid album hash: '{}'",
                album_hash
            )));
        }

        let token = self.tokens.ensure_valid().await?;
        let encoded = image_processing::reencode(image).await?;
        let uploaded = self
            .host
            .upload_image(
                &token.value,
                album_hash,
                encoded.bytes,
                filename,
                encoded.mime_type,
            )
            .await?;

        tracing::info!(
            "Uploaded image {} to album {}: {}",
            uploaded.id,
            album_hash,
            uploaded.link
        );
        self.invalidate_cache().await;
        Ok(uploaded)
    }

    pub async fn delete_image(&self, image_id: &str) -> Result<(), AppError> {
        if !is_host_id(image_id) {
            return Err(AppError::UnprocessableEntity(format!(
                "Invalid image id: '{}'",
                image_id
            )));
        }
        let token = self.tokens.ensure_valid().await?;
        self.host.delete_image(&token.value, image_id).await?;

        tracing::info!("Image {} deleted successfully", image_id);
        self.invalidate_cache().await;
        Ok(())
    }

    /// Best-effort: a failure is logged and never surfaces to the caller.
    pub async fn invalidate_cache(&self) {
        if let Err(e) = self.cache.clear_all().await {
            tracing::error!("Failed to clear the album cache: {}", e);
        }
    }
}

/// Flattens every album into one list of image links in random order.
pub fn shuffled_links(albums: &[AlbumImages]) -> Vec<String> {
    let mut links: Vec<String> = albums
        .iter()
        .flat_map(|album| album.images().iter().map(|image| image.link.clone()))
        .collect();
    links.shuffle(&mut rand::rng());
    links
}
