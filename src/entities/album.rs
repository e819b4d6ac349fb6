//! Album records

use super::{load_parent_link, load_path_component, take_fields, ItemCore};
use crate::store::{tables, GalleryStore};
use crate::Result;

/// A Gallery2 album. A `parent_id` of `None` marks a root album; the full
/// on-disk path is reconstructed by the gallery builder from parent links.
#[derive(Debug, Clone)]
pub struct AlbumItem {
    pub core: ItemCore,
    pub parent_id: Option<i64>,
    pub path_component: String,
    pub theme: String,
}

impl AlbumItem {
    pub async fn load(store: &dyn GalleryStore, id: i64) -> Result<Self> {
        let core = ItemCore::load(store, id).await?;
        let parent_id = load_parent_link(store, id).await?;
        let path_component = load_path_component(store, id).await?;

        let values = store.fetch(tables::ALBUM_ITEM, id, &["theme"]).await?;
        let [theme] = take_fields(values, tables::ALBUM_ITEM)?;

        Ok(Self {
            core,
            parent_id,
            path_component,
            theme: theme.unwrap_or_default(),
        })
    }
}
