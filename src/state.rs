// src/state.rs

use std::sync::Arc;

use crate::config::Config;
use crate::metadata::MetadataStore;
use crate::services::Gallery;
use crate::token::TokenManager;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenManager>,
    pub gallery: Arc<Gallery>,
    pub metadata_store: Arc<dyn MetadataStore>,
}
