// src/handlers.rs

use axum::{
    Form, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Redirect,
};
use maud::Markup;
use serde_json::{Value, json};

use crate::albums::{ABOUT_ME_ALBUM, CONTACT_ALBUM, GALLERY_ALBUMS};
use crate::errors::AppError;
use crate::extractor::SiteContext;
use crate::metadata::update_metadata;
use crate::middleware::{RequireHostToken, TryHostToken};
use crate::models::MetadataUpdate;
use crate::services::shuffled_links;
use crate::state::AppState;
use crate::views;

pub async fn home_handler(
    _token: TryHostToken,
    State(app_state): State<AppState>,
    SiteContext(metadata): SiteContext,
) -> Markup {
    let albums = app_state.gallery.load_albums(GALLERY_ALBUMS).await;
    let wall = shuffled_links(&albums);
    tracing::info!(
        "Home page: {} albums, {} images on the wall",
        albums.len(),
        wall.len()
    );
    views::home(&metadata, &albums, &wall)
}

pub async fn gallery_handler(
    _token: RequireHostToken,
    State(app_state): State<AppState>,
    SiteContext(metadata): SiteContext,
) -> Markup {
    let albums = app_state.gallery.load_albums(GALLERY_ALBUMS).await;
    views::gallery(&metadata, &albums)
}

pub async fn contact_handler(
    State(app_state): State<AppState>,
    SiteContext(metadata): SiteContext,
) -> Markup {
    let images = app_state
        .gallery
        .fetch_album_images(CONTACT_ALBUM.hash)
        .await
        .unwrap_or_default();
    views::contact(&metadata, &images)
}

pub async fn about_me_handler(
    State(app_state): State<AppState>,
    SiteContext(metadata): SiteContext,
) -> Markup {
    let images = app_state
        .gallery
        .fetch_album_images(ABOUT_ME_ALBUM.hash)
        .await
        .unwrap_or_default();
    views::about_me(&metadata, &images)
}

pub async fn admin_page_handler(
    State(app_state): State<AppState>,
    SiteContext(metadata): SiteContext,
) -> Markup {
    views::admin(
        &metadata,
        &app_state.config.admin_path,
        &app_state.config.gallery_edit_path(),
    )
}

pub async fn admin_update_handler(
    State(app_state): State<AppState>,
    Form(payload): Form<MetadataUpdate>,
) -> Result<Redirect, AppError> {
    tracing::info!("Admin submitted a site metadata update");
    update_metadata(app_state.metadata_store.as_ref(), &payload)
        .await
        .map_err(|e| {
            tracing::error!("Error updating admin information: {}", e);
            e
        })?;
    Ok(Redirect::to("/"))
}

/// Clears the cache first so the editor always sees the host's current state.
pub async fn gallery_edit_handler(
    _token: RequireHostToken,
    State(app_state): State<AppState>,
    SiteContext(metadata): SiteContext,
) -> Markup {
    app_state.gallery.invalidate_cache().await;
    let albums = app_state.gallery.load_albums(GALLERY_ALBUMS).await;
    let page_albums = app_state
        .gallery
        .load_albums(&[CONTACT_ALBUM, ABOUT_ME_ALBUM])
        .await;
    views::gallery_edit(&metadata, &albums, &page_albums)
}

pub async fn delete_image_handler(
    State(app_state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<StatusCode, AppError> {
    tracing::info!("DELETE /delete-image/{}", image_id);
    app_state.gallery.delete_image(image_id.trim()).await?;
    Ok(StatusCode::OK)
}

pub async fn add_image_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut album_hash: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!("Received a multipart field without a name, skipping");
                continue;
            }
        };

        match field_name.as_str() {
            "image" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload".to_string());
                let bytes = field.bytes().await?;
                tracing::info!("Received image '{}', {} bytes", filename, bytes.len());
                if !bytes.is_empty() {
                    upload = Some((filename, bytes.to_vec()));
                }
            }
            "album" => {
                album_hash = Some(field.text().await?.trim().to_string());
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let (filename, bytes) = upload.ok_or(AppError::NoFileProvided)?;
    let album_hash = album_hash
        .filter(|hash| !hash.is_empty())
        .ok_or_else(|| AppError::UnprocessableEntity("Missing 'album' field".to_string()))?;

    let uploaded = app_state
        .gallery
        .upload_image(&album_hash, bytes, &filename)
        .await?;
    Ok(Json(json!({ "imageUrl": uploaded.link })))
}
