//! Movie records

use super::{integer, load_parent_link, load_path_component, take_fields, ItemCore};
use crate::store::{tables, GalleryStore};
use crate::Result;

/// A Gallery2 movie with its parent link and on-disk name.
#[derive(Debug, Clone)]
pub struct MovieItem {
    pub core: ItemCore,
    pub parent_id: Option<i64>,
    pub path_component: String,
    pub width: i64,
    pub height: i64,
    /// Duration in seconds
    pub duration: i64,
}

impl MovieItem {
    pub async fn load(store: &dyn GalleryStore, id: i64) -> Result<Self> {
        let core = ItemCore::load(store, id).await?;
        let parent_id = load_parent_link(store, id).await?;
        let path_component = load_path_component(store, id).await?;

        let values = store
            .fetch(tables::MOVIE_ITEM, id, &["width", "height", "duration"])
            .await?;
        let [width, height, duration] = take_fields(values, tables::MOVIE_ITEM)?;

        Ok(Self {
            core,
            parent_id,
            path_component,
            width: integer(width, tables::MOVIE_ITEM, "width")?,
            height: integer(height, tables::MOVIE_ITEM, "height")?,
            duration: integer(duration, tables::MOVIE_ITEM, "duration")?,
        })
    }
}
