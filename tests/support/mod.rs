//! Shared fixtures: an in-memory gallery store and a recording remote.
#![allow(dead_code)]

use async_trait::async_trait;
use g2migrate::remote::{NewAlbum, NewItem, RemoteAlbum, RemoteGallery, RemoteItem};
use g2migrate::store::{tables, GalleryStore};
use g2migrate::uploader::{AlbumConfirmer, ConfirmDecision};
use g2migrate::{Error, Result};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory `GalleryStore` with Gallery2-shaped fixture builders.
#[derive(Default)]
pub struct MemoryStore {
    tables: HashMap<String, BTreeMap<i64, HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: &str, id: i64, fields: &[(&str, &str)]) {
        let row = self
            .tables
            .entry(table.to_string())
            .or_default()
            .entry(id)
            .or_default();
        for (name, value) in fields {
            row.insert(name.to_string(), value.to_string());
        }
    }

    fn insert_item(&mut self, id: i64, title: &str, summary: &str, description: &str) {
        self.insert(
            tables::ITEM,
            id,
            &[
                ("description", description),
                ("keywords", ""),
                ("summary", summary),
                ("title", title),
                ("originationTimestamp", "0"),
            ],
        );
    }

    fn insert_child(&mut self, id: i64, parent_id: i64) {
        let parent = parent_id.to_string();
        self.insert(tables::CHILD_ENTITY, id, &[("parentId", &parent)]);
    }

    fn insert_fs(&mut self, id: i64, path_component: &str) {
        self.insert(
            tables::FILE_SYSTEM_ENTITY,
            id,
            &[("pathComponent", path_component)],
        );
    }

    /// Album fixture; `parent_id` 0 marks a root album.
    pub fn add_album(&mut self, id: i64, parent_id: i64, title: &str, path_component: &str) {
        self.insert_item(id, title, "", "");
        self.insert_child(id, parent_id);
        self.insert_fs(id, path_component);
        self.insert(tables::ALBUM_ITEM, id, &[("theme", "matrix")]);
    }

    pub fn add_photo(&mut self, id: i64, album_id: i64, title: &str, path_component: &str) {
        self.insert_item(id, title, "", "");
        self.insert_child(id, album_id);
        self.insert_fs(id, path_component);
        self.insert(
            tables::PHOTO_ITEM,
            id,
            &[("width", "800"), ("height", "600")],
        );
    }

    pub fn add_movie(&mut self, id: i64, album_id: i64, title: &str, path_component: &str) {
        self.insert_item(id, title, "", "");
        self.insert_child(id, album_id);
        self.insert_fs(id, path_component);
        self.insert(
            tables::MOVIE_ITEM,
            id,
            &[("width", "640"), ("height", "480"), ("duration", "12")],
        );
    }

    /// Comment fixture, wired through the ChildEntity join the schema uses:
    /// the comment's own id is a ChildEntity whose parent is the photo.
    pub fn add_comment(&mut self, id: i64, photo_id: i64, subject: &str, body: &str) {
        self.insert(
            tables::COMMENT,
            id,
            &[("subject", subject), ("comment", body)],
        );
        self.insert_child(id, photo_id);
    }

    pub fn add_rotation(&mut self, id: i64, photo_id: i64, angle: i32) {
        let source = photo_id.to_string();
        let operations = format!("rotate|{}", angle);
        self.insert(
            tables::DERIVATIVE,
            id,
            &[
                ("derivativeSourceId", &source),
                ("derivativeOperations", &operations),
            ],
        );
    }
}

#[async_trait]
impl GalleryStore for MemoryStore {
    async fn fetch(&self, table: &str, id: i64, fields: &[&str]) -> Result<Vec<Option<String>>> {
        let row = self
            .tables
            .get(table)
            .and_then(|rows| rows.get(&id))
            .ok_or_else(|| {
                Error::StoreMalformed(format!("no row for id {} in table {}", id, table))
            })?;
        Ok(fields.iter().map(|f| row.get(*f).cloned()).collect())
    }

    async fn ids_for_table(&self, table: &str) -> Result<Vec<i64>> {
        Ok(self
            .tables
            .get(table)
            .map(|rows| rows.keys().copied().collect())
            .unwrap_or_default())
    }
}

/// One observed remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    CreateAlbum {
        title: String,
        summary: String,
        access: String,
        timestamp_us: Option<String>,
    },
    UploadItem {
        album_id: String,
        title: String,
        summary: String,
        keywords: String,
        content_type: String,
        file_name: String,
    },
    SetRotation {
        item_id: String,
        degrees: i32,
    },
    InsertComment {
        item_id: String,
        text: String,
    },
}

fn remote_error(status: u16) -> Error {
    match status {
        413 => Error::PayloadTooLarge,
        500..=599 => Error::TransientRemote {
            status,
            message: "server error".to_string(),
        },
        _ => Error::PermanentRemote {
            status,
            message: "client error".to_string(),
        },
    }
}

/// Recording `RemoteGallery` with scriptable failures.
#[derive(Default)]
pub struct RecordingRemote {
    calls: Mutex<Vec<RemoteCall>>,
    /// Every create-album call fails with this status
    pub fail_create_with: Option<u16>,
    /// Per-upload-call failure script, consumed front to back; `None` or an
    /// exhausted script means success
    pub upload_failures: Mutex<VecDeque<Option<u16>>>,
    /// Every set-rotation call fails with this status
    pub fail_rotation_with: Option<u16>,
    next_id: AtomicUsize,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created_album_titles(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RemoteCall::CreateAlbum { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<RemoteCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, RemoteCall::UploadItem { .. }))
            .collect()
    }

    pub fn count(&self, matcher: fn(&RemoteCall) -> bool) -> usize {
        self.calls().iter().filter(|c| matcher(c)).count()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteGallery for RecordingRemote {
    async fn create_album(&self, album: &NewAlbum) -> Result<RemoteAlbum> {
        self.record(RemoteCall::CreateAlbum {
            title: album.title.clone(),
            summary: album.summary.clone(),
            access: album.access.as_str().to_string(),
            timestamp_us: album.timestamp_us.clone(),
        });
        if let Some(status) = self.fail_create_with {
            return Err(remote_error(status));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RemoteAlbum {
            id: format!("album-{}", n),
            feed_href: format!("https://remote.test/feeds/album-{}", n),
        })
    }

    async fn upload_item(&self, album: &RemoteAlbum, item: &NewItem) -> Result<RemoteItem> {
        self.record(RemoteCall::UploadItem {
            album_id: album.id.clone(),
            title: item.title.clone(),
            summary: item.summary.clone(),
            keywords: item.keywords.clone(),
            content_type: item.content_type.to_string(),
            file_name: item
                .file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        });
        if let Some(Some(status)) = self.upload_failures.lock().unwrap().pop_front() {
            return Err(remote_error(status));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RemoteItem {
            id: format!("item-{}", n),
        })
    }

    async fn set_rotation(&self, item: &RemoteItem, degrees: i32) -> Result<RemoteItem> {
        self.record(RemoteCall::SetRotation {
            item_id: item.id.clone(),
            degrees,
        });
        if let Some(status) = self.fail_rotation_with {
            return Err(remote_error(status));
        }
        Ok(item.clone())
    }

    async fn insert_comment(&self, item: &RemoteItem, text: &str) -> Result<()> {
        self.record(RemoteCall::InsertComment {
            item_id: item.id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Confirmer replaying a fixed decision script.
pub struct ScriptedConfirmer {
    decisions: VecDeque<ConfirmDecision>,
    pub prompts: Vec<String>,
}

impl ScriptedConfirmer {
    pub fn new(decisions: Vec<ConfirmDecision>) -> Self {
        Self {
            decisions: decisions.into(),
            prompts: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl AlbumConfirmer for ScriptedConfirmer {
    fn confirm(&mut self, album_title: &str) -> Result<ConfirmDecision> {
        self.prompts.push(album_title.to_string());
        Ok(self
            .decisions
            .pop_front()
            .expect("confirmer consulted more often than scripted"))
    }
}
