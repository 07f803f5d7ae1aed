// src/imgur.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::{ImageHostConfig, OAuthCredentials};
use crate::errors::AppError;
use crate::models::ImageRef;

/// How a request to the image host is authenticated.
#[derive(Debug, Clone, PartialEq)]
pub enum HostAuth {
    Bearer(String),
    ClientId,
}

/// Operations the site needs from the external image host.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Exchanges the long-lived refresh token for a new access token.
    async fn refresh_access_token(
        &self,
        credentials: &OAuthCredentials,
    ) -> Result<String, AppError>;

    async fn list_album_images(
        &self,
        album_hash: &str,
        auth: &HostAuth,
    ) -> Result<Vec<ImageRef>, AppError>;

    async fn upload_image(
        &self,
        access_token: &str,
        album_hash: &str,
        image: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<ImageRef, AppError>;

    async fn delete_image(&self, access_token: &str, image_id: &str) -> Result<(), AppError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Image and album ids on the host are short alphanumeric strings.
pub fn is_host_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Envelope wrapping every `/3/` response.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct AlbumData {
    #[serde(default)]
    images: Vec<ImageRef>,
}

pub struct ImgurClient {
    http: Client,
    api_url: Url,
    account_username: String,
    client_id: String,
}

impl ImgurClient {
    pub fn new(config: &ImageHostConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                AppError::InternalServerError(format!("Could not build HTTP client: {}", e))
            })?;

        Ok(ImgurClient {
            http,
            api_url: config.api_url.clone(),
            account_username: config.account_username.clone(),
            client_id: config.credentials.client_id.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.api_url.join(path).map_err(|e| {
            AppError::InternalServerError(format!("Invalid image host URL for '{}': {}", path, e))
        })
    }

    /// Appends each segment percent-encoded on its own, so a `/` or `..` inside
    /// an id cannot move the request to another endpoint.
    fn endpoint_segments(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InternalServerError(format!(
                    "Image host URL cannot take a path: {}",
                    self.api_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn album_url(&self, album_hash: &str) -> Result<Url, AppError> {
        self.endpoint_segments(&[
            "3",
            "account",
            self.account_username.as_str(),
            "album",
            album_hash,
        ])
    }

    fn image_url(&self, image_id: &str) -> Result<Url, AppError> {
        self.endpoint_segments(&["3", "image", image_id])
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        auth: &HostAuth,
    ) -> reqwest::RequestBuilder {
        match auth {
            HostAuth::Bearer(token) => request.bearer_auth(token),
            HostAuth::ClientId => {
                request.header("Authorization", format!("Client-ID {}", self.client_id))
            }
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<(StatusCode, String), AppError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Network error while calling image host ({}): {:?}", operation, e);
            AppError::UpstreamUnavailable(format!("{}: {}", operation, e))
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Could not read image host response ({}): {:?}", operation, e);
            AppError::UpstreamUnavailable(format!("{}: {}", operation, e))
        })?;
        Ok((status, body))
    }
}

/// Interprets a `/3/` response. 5xx and unparseable success bodies mean the host is
/// unavailable, while 4xx or `success: false` mean it refused the request.
fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    operation: &str,
) -> Result<T, AppError> {
    if status.is_server_error() {
        return Err(AppError::UpstreamUnavailable(format!(
            "{}: status {}",
            operation, status
        )));
    }

    let envelope = serde_json::from_str::<Envelope>(body);
    if !status.is_success() {
        let reason = envelope
            .ok()
            .and_then(|e| e.data.get("error").map(|err| err.to_string()))
            .unwrap_or_else(|| "no error details".to_string());
        return Err(AppError::UpstreamRejected(format!(
            "{}: status {} ({})",
            operation, status, reason
        )));
    }

    let envelope = envelope.map_err(|e| {
        AppError::UpstreamUnavailable(format!("{}: malformed response: {}", operation, e))
    })?;
    if envelope.success == Some(false) {
        return Err(AppError::UpstreamRejected(format!(
            "{}: host reported failure",
            operation
        )));
    }

    serde_json::from_value(envelope.data).map_err(|e| {
        AppError::UpstreamUnavailable(format!("{}: malformed response data: {}", operation, e))
    })
}

#[async_trait]
impl ImageHost for ImgurClient {
    async fn refresh_access_token(
        &self,
        credentials: &OAuthCredentials,
    ) -> Result<String, AppError> {
        let url = self.endpoint("oauth2/token")?;
        let payload = serde_json::json!({
            "refresh_token": credentials.refresh_token,
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
            "grant_type": "refresh_token",
        });

        let (status, body) = self
            .send(self.http.post(url).json(&payload), "token refresh")
            .await?;
        if !status.is_success() {
            return Err(AppError::UpstreamRejected(format!(
                "token refresh: status {}",
                status
            )));
        }

        let token = serde_json::from_str::<TokenResponse>(&body).map_err(|e| {
            AppError::UpstreamUnavailable(format!("token refresh: malformed response: {}", e))
        })?;
        Ok(token.access_token)
    }

    async fn list_album_images(
        &self,
        album_hash: &str,
        auth: &HostAuth,
    ) -> Result<Vec<ImageRef>, AppError> {
        let url = self.album_url(album_hash)?;
        let request = self.authorize(self.http.get(url), auth);
        let (status, body) = self.send(request, "list album").await?;
        let album: AlbumData = decode_envelope(status, &body, "list album")?;
        Ok(album.images)
    }

    async fn upload_image(
        &self,
        access_token: &str,
        album_hash: &str,
        image: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<ImageRef, AppError> {
        let part = multipart::Part::bytes(image)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| {
                tracing::error!("Could not set MIME type '{}': {}", mime_type, e);
                AppError::InternalServerError("Could not prepare the image file".to_string())
            })?;
        let form = multipart::Form::new()
            .part("image", part)
            .text("album", album_hash.to_string());

        let url = self.endpoint("3/upload")?;
        let request = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .multipart(form);
        let (status, body) = self.send(request, "upload").await?;
        decode_envelope(status, &body, "upload")
    }

    async fn delete_image(&self, access_token: &str, image_id: &str) -> Result<(), AppError> {
        let url = self.image_url(image_id)?;
        let request = self.http.delete(url).bearer_auth(access_token);
        let (status, body) = self.send(request, "delete image").await?;
        let _: Value = decode_envelope(status, &body, "delete image")?;
        Ok(())
    }
}
