//! Photo records

use super::{integer, load_parent_link, load_path_component, take_fields, ItemCore};
use crate::entities::Comment;
use crate::store::{tables, GalleryStore};
use crate::Result;

/// A Gallery2 photo with its parent link, on-disk name, and the rotation and
/// comments resolved by the aggregation step.
#[derive(Debug, Clone)]
pub struct PhotoItem {
    pub core: ItemCore,
    pub parent_id: Option<i64>,
    pub path_component: String,
    pub width: i64,
    pub height: i64,
    /// Rotation in degrees, resolved from a `rotate|<angle>` derivative
    pub rotation: Option<i32>,
    /// Comments in attachment order
    pub comments: Vec<Comment>,
}

impl PhotoItem {
    pub async fn load(store: &dyn GalleryStore, id: i64) -> Result<Self> {
        let core = ItemCore::load(store, id).await?;
        let parent_id = load_parent_link(store, id).await?;
        let path_component = load_path_component(store, id).await?;

        let values = store
            .fetch(tables::PHOTO_ITEM, id, &["width", "height"])
            .await?;
        let [width, height] = take_fields(values, tables::PHOTO_ITEM)?;

        Ok(Self {
            core,
            parent_id,
            path_component,
            width: integer(width, tables::PHOTO_ITEM, "width")?,
            height: integer(height, tables::PHOTO_ITEM, "height")?,
            rotation: None,
            comments: Vec::new(),
        })
    }
}
