//! Remote photo-hosting service interface
//!
//! The hosting service's wire protocol is a thin I/O concern; the pipeline
//! only depends on the four operations below. Tests substitute a recording
//! implementation.

pub mod http;

pub use http::HttpRemoteGallery;

use crate::config::AccessLevel;
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Request to create a remote album.
#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub title: String,
    pub summary: String,
    pub access: AccessLevel,
    /// Creation time in microseconds since epoch, as a decimal string, when
    /// the source album carries a positive timestamp
    pub timestamp_us: Option<String>,
}

/// Request to upload one media item into a remote album.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub summary: String,
    /// Comma-space separated keyword list
    pub keywords: String,
    pub content_type: &'static str,
    pub file_path: PathBuf,
}

/// Handle to a created remote album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAlbum {
    pub id: String,
    /// Absolute upload endpoint for this album's media feed
    pub feed_href: String,
}

/// Handle to an uploaded remote item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub id: String,
}

/// The album/media operations the hosting service exposes.
#[async_trait]
pub trait RemoteGallery: Send + Sync {
    async fn create_album(&self, album: &NewAlbum) -> Result<RemoteAlbum>;

    async fn upload_item(&self, album: &RemoteAlbum, item: &NewItem) -> Result<RemoteItem>;

    /// Set the rotation of an uploaded item, returning the updated handle.
    async fn set_rotation(&self, item: &RemoteItem, degrees: i32) -> Result<RemoteItem>;

    async fn insert_comment(&self, item: &RemoteItem, text: &str) -> Result<()>;
}
