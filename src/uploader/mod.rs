//! Upload orchestrator
//!
//! Walks the albums in sorted-title order, creates remote albums (splitting
//! when the per-album item cap is exceeded), and uploads each supported media
//! item with its metadata, retrying transient failures. Fully sequential:
//! ordering is the one guarantee the migration makes.

mod confirm;

pub use confirm::{AlbumConfirmer, ConfirmDecision, StdinConfirmer};

use crate::config::{MetadataPolicy, MigrateConfig};
use crate::entities::{AlbumItem, Comment};
use crate::gallery::{Gallery, MediaItem};
use crate::remote::{NewAlbum, NewItem, RemoteAlbum, RemoteGallery, RemoteItem};
use crate::retry::{retry_remote, RetryPolicy};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Hard cap on items per remote album; overflow opens a `"<title>_<n>"`
/// continuation album.
pub const MAX_ITEMS_PER_ALBUM: usize = 1000;

/// MIME types the hosting service accepts. Owned here; never patched into a
/// shared registry.
pub const VALID_MIME_TYPES: &[&str] = &[
    "image/bmp",
    "image/gif",
    "image/jpeg",
    "image/png",
    "video/3gpp",
    "video/avi",
    "video/quicktime",
    "video/mp4",
    "video/mpeg",
    "video/mpeg4",
    "video/msvideo",
    "video/x-ms-asf",
    "video/x-ms-wmv",
    "video/x-msvideo",
];

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Source albums uploaded (continuation albums not counted)
    pub albums_uploaded: usize,
    /// Source albums skipped by confirmation or the single-album filter
    pub albums_skipped: usize,
    /// Remote album creations, including cap-overflow continuations
    pub remote_albums_created: usize,
    pub items_uploaded: usize,
    /// Items skipped for unsupported MIME type or oversized payload
    pub items_skipped: usize,
}

/// The sequential upload state machine.
pub struct Uploader<'a> {
    remote: &'a dyn RemoteGallery,
    config: &'a MigrateConfig,
    policy: RetryPolicy,
}

impl<'a> Uploader<'a> {
    pub fn new(remote: &'a dyn RemoteGallery, config: &'a MigrateConfig) -> Self {
        Self {
            remote,
            config,
            policy: RetryPolicy::default(),
        }
    }

    /// Run the migration over a loaded gallery.
    pub async fn run(
        &self,
        gallery: &Gallery,
        confirmer: &mut dyn AlbumConfirmer,
    ) -> Result<MigrationSummary> {
        let mut summary = MigrationSummary::default();
        let mut confirm_all = false;

        for (album_id, display_title) in &gallery.sorted_albums {
            // An album with no grouped media is never created remotely.
            if !gallery.has_media(*album_id) {
                debug!(album = %display_title, "Album has no media, skipping");
                continue;
            }

            if !self.should_upload(display_title, &mut confirm_all, confirmer)? {
                info!(album = %display_title, "Album skipped");
                summary.albums_skipped += 1;
                continue;
            }

            self.upload_album(gallery, *album_id, display_title, &mut summary)
                .await?;
            summary.albums_uploaded += 1;
        }

        Ok(summary)
    }

    fn should_upload(
        &self,
        display_title: &str,
        confirm_all: &mut bool,
        confirmer: &mut dyn AlbumConfirmer,
    ) -> Result<bool> {
        if let Some(filter) = &self.config.single_album {
            return Ok(filter == display_title);
        }
        if !self.config.confirm_each || *confirm_all {
            return Ok(true);
        }
        match confirmer.confirm(display_title)? {
            ConfirmDecision::Upload => Ok(true),
            ConfirmDecision::Skip => Ok(false),
            ConfirmDecision::UploadAll => {
                *confirm_all = true;
                Ok(true)
            }
        }
    }

    async fn upload_album(
        &self,
        gallery: &Gallery,
        album_id: i64,
        display_title: &str,
        summary: &mut MigrationSummary,
    ) -> Result<()> {
        let Some(album) = gallery.albums.get(&album_id) else {
            return Ok(());
        };
        let album_path = gallery
            .album_paths
            .get(&album_id)
            .cloned()
            .unwrap_or_default();

        let mut remote_album = self.create_remote_album(album, display_title, 0).await?;
        summary.remote_albums_created += 1;

        // Items in the current remote album, and the numeric suffix of the
        // current continuation.
        let mut item_count = 0usize;
        let mut split_count = 0usize;

        for media in gallery.media_for(album_id) {
            let file_path = self.media_file_path(&album_path, media);
            let Some(content_type) = supported_mime_type(&file_path) else {
                warn!(
                    item = %media.path_component(),
                    "No supported MIME type, skipping item"
                );
                summary.items_skipped += 1;
                continue;
            };

            item_count += 1;
            if item_count > MAX_ITEMS_PER_ALBUM {
                item_count = 1;
                split_count += 1;
                remote_album = self
                    .create_remote_album(album, display_title, split_count)
                    .await?;
                summary.remote_albums_created += 1;
            }

            let request = item_request(media, content_type, file_path);
            info!(
                file = %media.path_component(),
                title = %request.title,
                summary = %request.summary,
                keywords = %request.keywords,
                "Uploading item"
            );

            let uploaded = match &remote_album {
                Some(album_handle) => {
                    match retry_remote(&self.policy, "item upload", || {
                        self.remote.upload_item(album_handle, &request)
                    })
                    .await
                    {
                        Ok(item) => Some(item),
                        Err(Error::PayloadTooLarge) => {
                            warn!(
                                item = %media.path_component(),
                                "Remote rejected item as too large, skipping"
                            );
                            summary.items_skipped += 1;
                            continue;
                        }
                        Err(err) => return Err(err),
                    }
                }
                None => {
                    info!(file = %media.path_component(), "Dry run: would upload item");
                    None
                }
            };
            summary.items_uploaded += 1;

            if let Some(degrees) = media.rotation() {
                match &uploaded {
                    Some(item) => self.update_rotation(item, degrees).await?,
                    None => info!(
                        item = %media.path_component(),
                        degrees,
                        "Dry run: would set rotation"
                    ),
                }
            }

            for comment in media.comments() {
                match &uploaded {
                    Some(item) => self.insert_comment(item, comment).await?,
                    None => info!(
                        item = %media.path_component(),
                        "Dry run: would insert comment"
                    ),
                }
            }
        }

        Ok(())
    }

    /// Create a remote album, or log the intent in dry-run mode.
    async fn create_remote_album(
        &self,
        album: &AlbumItem,
        display_title: &str,
        split: usize,
    ) -> Result<Option<RemoteAlbum>> {
        let request = album_request(album, display_title, split, self.config);
        info!(
            title = %request.title,
            summary = %request.summary,
            access = request.access.as_str(),
            "Creating remote album"
        );
        if self.config.dry_run {
            info!(title = %request.title, "Dry run: would create album");
            return Ok(None);
        }

        let created = retry_remote(&self.policy, "album creation", || {
            self.remote.create_album(&request)
        })
        .await?;
        Ok(Some(created))
    }

    async fn update_rotation(&self, item: &RemoteItem, degrees: i32) -> Result<()> {
        info!(item_id = %item.id, degrees, "Setting item rotation");
        match self.config.metadata_policy {
            MetadataPolicy::Retry => {
                retry_remote(&self.policy, "rotation update", || {
                    self.remote.set_rotation(item, degrees)
                })
                .await?;
            }
            MetadataPolicy::Ignore => {
                if let Err(err) = self.remote.set_rotation(item, degrees).await {
                    warn!(
                        item_id = %item.id,
                        error = %err,
                        "Rotation update failed, continuing"
                    );
                }
            }
        }
        Ok(())
    }

    async fn insert_comment(&self, item: &RemoteItem, comment: &Comment) -> Result<()> {
        info!(item_id = %item.id, comment_id = comment.id, "Inserting comment");
        match self.config.metadata_policy {
            MetadataPolicy::Retry => {
                retry_remote(&self.policy, "comment insert", || {
                    self.remote.insert_comment(item, comment.remote_text())
                })
                .await?;
            }
            MetadataPolicy::Ignore => {
                if let Err(err) = self.remote.insert_comment(item, comment.remote_text()).await {
                    warn!(
                        item_id = %item.id,
                        comment_id = comment.id,
                        error = %err,
                        "Comment insert failed, continuing"
                    );
                }
            }
        }
        Ok(())
    }

    /// `{gallery_root}/albums/{full_album_path}/{path_component}`
    fn media_file_path(&self, album_path: &str, media: &MediaItem) -> PathBuf {
        self.config
            .gallery_root
            .join("albums")
            .join(album_path)
            .join(media.path_component())
    }
}

/// Guess a content type from the filename and check it against the
/// allow-list.
pub fn supported_mime_type(path: &Path) -> Option<&'static str> {
    let guessed = mime_guess::from_path(path).first_raw()?;
    VALID_MIME_TYPES.iter().copied().find(|mime| *mime == guessed)
}

/// Renormalize a whitespace-separated keyword string into the remote API's
/// comma-space format. Idempotent.
pub fn normalize_keywords(raw: &str) -> String {
    raw.split_whitespace()
        .map(|keyword| keyword.trim_end_matches(','))
        .filter(|keyword| !keyword.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn album_request(
    album: &AlbumItem,
    display_title: &str,
    split: usize,
    config: &MigrateConfig,
) -> NewAlbum {
    let title = if split > 0 {
        format!("{}_{}", display_title, split)
    } else {
        display_title.to_string()
    };
    let summary = if album.core.summary.is_empty() {
        album.core.description.clone()
    } else {
        album.core.summary.clone()
    };
    // The remote API wants the creation time in microseconds, as a string.
    let timestamp_us =
        (album.core.created > 0).then(|| (album.core.created as i128 * 1_000_000).to_string());

    NewAlbum {
        title,
        summary,
        access: config.access,
        timestamp_us,
    }
}

fn item_request(media: &MediaItem, content_type: &'static str, file_path: PathBuf) -> NewItem {
    let core = media.core();

    let title = if core.title.is_empty() {
        media.path_component().to_string()
    } else {
        core.title.clone()
    };

    // The API has a single free-text field. When title, summary and
    // description are all present, description is merged into summary: a
    // deliberate lossy merge.
    let summary = if !core.title.is_empty() && !core.summary.is_empty() && !core.description.is_empty()
    {
        warn!(
            item = %media.path_component(),
            "Title, summary and description all set; merging description into summary"
        );
        format!("{}{}", core.summary, core.description)
    } else if !core.summary.is_empty() {
        core.summary.clone()
    } else if !core.description.is_empty() {
        core.description.clone()
    } else {
        core.title.clone()
    };

    NewItem {
        title,
        summary,
        keywords: normalize_keywords(&core.keywords),
        content_type,
        file_path,
    }
}
