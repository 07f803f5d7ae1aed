// src/metadata.rs

use async_trait::async_trait;
use mongodb::{
    Client, Collection,
    bson::{Document, doc},
    options::{ClientOptions, ReplaceOptions},
};

use crate::config::MongoConfig;
use crate::errors::AppError;
use crate::models::{MetadataUpdate, SiteMetadata};

/// Collection name used by the existing site documents.
const COLLECTION: &str = "informations";

/// Persistence for the single site metadata document.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn load(&self) -> Result<Option<SiteMetadata>, AppError>;

    async fn save(&self, metadata: &SiteMetadata) -> Result<(), AppError>;
}

/// Applies a partial update and persists the whole document in one write.
pub async fn update_metadata(
    store: &dyn MetadataStore,
    update: &MetadataUpdate,
) -> Result<SiteMetadata, AppError> {
    let mut metadata = match store.load().await? {
        Some(metadata) => metadata,
        None => {
            tracing::warn!("No site metadata document found, a new one will be created");
            SiteMetadata::default()
        }
    };

    update.apply_to(&mut metadata);
    store.save(&metadata).await?;
    tracing::info!("Site metadata updated");
    Ok(metadata)
}

pub struct MongoMetadataStore {
    collection: Collection<SiteMetadata>,
}

impl MongoMetadataStore {
    /// Connects and pings the deployment so an unreachable store fails at startup.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        let client_options = ClientOptions::parse(&config.uri).await?;
        let client = Client::with_options(client_options)?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.db_name));

        db.run_command(doc! { "ping": 1 }, None).await?;
        tracing::info!("MongoDB connected, database '{}'", db.name());

        Ok(MongoMetadataStore {
            collection: db.collection::<SiteMetadata>(COLLECTION),
        })
    }
}

#[async_trait]
impl MetadataStore for MongoMetadataStore {
    async fn load(&self) -> Result<Option<SiteMetadata>, AppError> {
        Ok(self.collection.find_one(None, None).await?)
    }

    async fn save(&self, metadata: &SiteMetadata) -> Result<(), AppError> {
        let filter: Document = match metadata.id {
            Some(id) => doc! { "_id": id },
            None => doc! {},
        };
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(filter, metadata, options)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct InMemoryMetadataStore {
        document: Mutex<Option<SiteMetadata>>,
        pub saves: AtomicUsize,
    }

    impl InMemoryMetadataStore {
        pub fn with(metadata: SiteMetadata) -> Self {
            InMemoryMetadataStore {
                document: Mutex::new(Some(metadata)),
                saves: AtomicUsize::new(0),
            }
        }

        pub fn snapshot(&self) -> Option<SiteMetadata> {
            self.document.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetadataStore for InMemoryMetadataStore {
        async fn load(&self) -> Result<Option<SiteMetadata>, AppError> {
            Ok(self.snapshot())
        }

        async fn save(&self, metadata: &SiteMetadata) -> Result<(), AppError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.document.lock().unwrap() = Some(metadata.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryMetadataStore;
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn update_saves_once_with_all_fields_applied() {
        let store = InMemoryMetadataStore::with(SiteMetadata {
            name: "Studio".to_string(),
            address: "1 Old Road".to_string(),
            email: "old@example.com".to_string(),
            ..SiteMetadata::default()
        });
        let update = MetadataUpdate {
            address: Some("  42 Main St  ".to_string()),
            email: Some(String::new()),
            instagram: Some("https://instagram.com/studio".to_string()),
            ..MetadataUpdate::default()
        };

        let updated = update_metadata(&store, &update).await.unwrap();

        assert_eq!(updated.address, "42 Main St");
        assert_eq!(updated.email, "old@example.com");
        assert_eq!(updated.instagram, "https://instagram.com/studio");
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(store.snapshot(), Some(updated));
    }

    #[tokio::test]
    async fn update_creates_document_when_absent() {
        let store = InMemoryMetadataStore::default();
        let update = MetadataUpdate {
            bio: Some("Portrait photographer".to_string()),
            ..MetadataUpdate::default()
        };

        update_metadata(&store, &update).await.unwrap();

        let saved = store.snapshot().unwrap();
        assert_eq!(saved.bio, "Portrait photographer");
        assert_eq!(saved.address, "");
    }
}
