// src/models.rs
use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Bearer credential for the image host together with the moment it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub value: String,
    pub fetched_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: String) -> Self {
        AccessToken {
            value,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.fetched_at > max_age
    }
}

/// Externally hosted album, identified by its opaque hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumRef {
    pub name: &'static str,
    pub hash: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: String,
    pub link: String,
}

/// Album as shown on a page. `images` is `None` when the album could not be loaded.
#[derive(Debug, Clone)]
pub struct AlbumImages {
    pub name: &'static str,
    pub hash: &'static str,
    pub images: Option<Vec<ImageRef>>,
}

impl AlbumImages {
    pub fn images(&self) -> &[ImageRef] {
        self.images.as_deref().unwrap_or_default()
    }
}

/// Site-wide contact and bio document. Field names match the stored documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub telegram: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(rename = "aboutMeInfo", default)]
    pub about_me_info: String,
    #[serde(default)]
    pub bio: String,
}

/// Admin form submission. Absent and blank fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataUpdate {
    pub address: Option<String>,
    pub number: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub facebook: Option<String>,
    #[serde(rename = "aboutMeInfo")]
    pub about_me_info: Option<String>,
    pub bio: Option<String>,
}

impl MetadataUpdate {
    pub fn apply_to(&self, metadata: &mut SiteMetadata) {
        let fields: [(&str, &Option<String>, &mut String); 9] = [
            ("address", &self.address, &mut metadata.address),
            ("number", &self.number, &mut metadata.number),
            ("email", &self.email, &mut metadata.email),
            ("instagram", &self.instagram, &mut metadata.instagram),
            ("twitter", &self.twitter, &mut metadata.twitter),
            ("telegram", &self.telegram, &mut metadata.telegram),
            ("facebook", &self.facebook, &mut metadata.facebook),
            ("aboutMeInfo", &self.about_me_info, &mut metadata.about_me_info),
            ("bio", &self.bio, &mut metadata.bio),
        ];

        for (field, submitted, stored) in fields {
            match submitted.as_deref().map(str::trim) {
                Some(value) if !value.is_empty() => *stored = value.to_string(),
                _ => tracing::debug!("Field '{}' left blank, keeping stored value", field),
            }
        }
    }
}
