// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(app_state: AppState) -> Router {
    let admin_path = format!("/{}", app_state.config.admin_path);
    let gallery_edit_path = app_state.config.gallery_edit_path();

    Router::new()
        .route("/", get(home_handler))
        .route("/gallery", get(gallery_handler))
        .route(&gallery_edit_path, get(gallery_edit_handler))
        .route("/contact", get(contact_handler))
        .route("/about-me", get(about_me_handler))
        .route(
            &admin_path,
            get(admin_page_handler).post(admin_update_handler),
        )
        .route("/delete-image/{image_id}", delete(delete_image_handler))
        .route("/add-image", post(add_image_handler))
        .nest_service("/static", ServeDir::new(&app_state.config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(app_state)
}
