//! reqwest-backed remote gallery adapter

use crate::config::RemoteConfig;
use crate::remote::{NewAlbum, NewItem, RemoteAlbum, RemoteGallery, RemoteItem};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const USER_AGENT: &str = concat!("g2migrate/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    id: String,
    feed_href: String,
}

#[derive(Debug, Deserialize)]
struct ItemResponse {
    id: String,
}

/// HTTP client for the hosting service's album/media API.
pub struct HttpRemoteGallery {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl HttpRemoteGallery {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a non-success response onto the error taxonomy: 413 is recoverable at
/// the item level, 5xx is transient, anything else is permanent.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let code = status.as_u16();
    let message = response.text().await.unwrap_or_default();
    Err(match code {
        413 => Error::PayloadTooLarge,
        500..=599 => Error::TransientRemote {
            status: code,
            message,
        },
        _ => Error::PermanentRemote {
            status: code,
            message,
        },
    })
}

#[async_trait]
impl RemoteGallery for HttpRemoteGallery {
    async fn create_album(&self, album: &NewAlbum) -> Result<RemoteAlbum> {
        let body = json!({
            "title": album.title,
            "summary": album.summary,
            "access": album.access.as_str(),
            "timestamp": album.timestamp_us,
        });

        let response = self
            .client
            .post(self.url("/albums"))
            .bearer_auth(&self.auth_token)
            .json(&body)
            .send()
            .await?;
        let created: AlbumResponse = ensure_success(response).await?.json().await?;

        Ok(RemoteAlbum {
            id: created.id,
            feed_href: created.feed_href,
        })
    }

    async fn upload_item(&self, album: &RemoteAlbum, item: &NewItem) -> Result<RemoteItem> {
        let file_name = item
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());
        let bytes = tokio::fs::read(&item.file_path).await?;

        let metadata = json!({
            "title": item.title,
            "summary": item.summary,
            "keywords": item.keywords,
        });
        let form = reqwest::multipart::Form::new()
            .text("metadata", metadata.to_string())
            .part(
                "media",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(item.content_type)?,
            );

        let response = self
            .client
            .post(&album.feed_href)
            .bearer_auth(&self.auth_token)
            .multipart(form)
            .send()
            .await?;
        let uploaded: ItemResponse = ensure_success(response).await?.json().await?;

        Ok(RemoteItem { id: uploaded.id })
    }

    async fn set_rotation(&self, item: &RemoteItem, degrees: i32) -> Result<RemoteItem> {
        let response = self
            .client
            .put(self.url(&format!("/items/{}/rotation", item.id)))
            .bearer_auth(&self.auth_token)
            .json(&json!({ "degrees": degrees }))
            .send()
            .await?;
        let updated: ItemResponse = ensure_success(response).await?.json().await?;

        Ok(RemoteItem { id: updated.id })
    }

    async fn insert_comment(&self, item: &RemoteItem, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("/items/{}/comments", item.id)))
            .bearer_auth(&self.auth_token)
            .json(&json!({ "text": text }))
            .send()
            .await?;
        ensure_success(response).await?;

        Ok(())
    }
}
