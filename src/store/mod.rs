//! Record store adapter for the Gallery2 schema
//!
//! The relational backend is exposed to the rest of the pipeline as a
//! field-fetch interface: named fields for a record by table and id, plus
//! id enumeration per table. All business logic lives above this seam.

pub mod mysql;

use crate::Result;
use async_trait::async_trait;

pub use mysql::MySqlStore;

/// Gallery2 table names (unprefixed; the adapter applies the prefix).
pub mod tables {
    pub const ITEM: &str = "Item";
    pub const CHILD_ENTITY: &str = "ChildEntity";
    pub const FILE_SYSTEM_ENTITY: &str = "FileSystemEntity";
    pub const PHOTO_ITEM: &str = "PhotoItem";
    pub const MOVIE_ITEM: &str = "MovieItem";
    pub const ALBUM_ITEM: &str = "AlbumItem";
    pub const DERIVATIVE: &str = "Derivative";
    pub const COMMENT: &str = "Comment";
}

/// Field-fetch interface over the Gallery2 store.
///
/// Every value surfaces as an optional string; the entity layer parses
/// numerics. `NULL` columns come back as `None`.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Fetch the named fields of one record, order-matched to `fields`.
    ///
    /// A record that does not exist is a malformed-store error: ids are
    /// only ever obtained from `ids_for_table` on the same store.
    async fn fetch(&self, table: &str, id: i64, fields: &[&str]) -> Result<Vec<Option<String>>>;

    /// All record ids in a table, in ascending id order.
    async fn ids_for_table(&self, table: &str) -> Result<Vec<i64>>;
}
