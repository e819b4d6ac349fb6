//! Typed Gallery2 records
//!
//! Each entity is hydrated once from the store and never written back. The
//! Gallery2 "multiple inheritance" layout (ChildEntity / FileSystemEntity
//! capabilities) is modeled as plain fields on each record: an optional
//! parent id and a path component, loaded from their own tables.

mod album;
mod comment;
mod derivative;
mod movie;
mod photo;

pub use album::AlbumItem;
pub use comment::Comment;
pub use derivative::Derivative;
pub use movie::MovieItem;
pub use photo::PhotoItem;

use crate::store::{tables, GalleryStore};
use crate::{Error, Result};
use std::fmt;

/// Fields shared by every Gallery2 item (the `Item` table).
///
/// Textual fields are HTML-unescaped exactly once here; NULL columns become
/// empty strings, never null.
#[derive(Debug, Clone)]
pub struct ItemCore {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub keywords: String,
    /// Seconds since epoch; 0 or negative means unknown
    pub created: i64,
}

impl ItemCore {
    pub async fn load(store: &dyn GalleryStore, id: i64) -> Result<Self> {
        let values = store
            .fetch(
                tables::ITEM,
                id,
                &[
                    "description",
                    "keywords",
                    "summary",
                    "title",
                    "originationTimestamp",
                ],
            )
            .await?;
        let [description, keywords, summary, title, created] = take_fields(values, tables::ITEM)?;

        Ok(Self {
            id,
            title: text(title),
            summary: text(summary),
            description: text(description),
            keywords: text(keywords),
            created: integer(created, tables::ITEM, "originationTimestamp")?,
        })
    }

    fn describe(&self, kind: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let created = chrono::DateTime::from_timestamp(self.created, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        write!(
            f,
            "{}: title='{}' created='{}' summary='{}' description='{}' keywords='{}'",
            kind, self.title, created, self.summary, self.description, self.keywords
        )
    }
}

impl fmt::Display for PhotoItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.core.describe("Photo", f)
    }
}

impl fmt::Display for MovieItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.core.describe("Movie", f)
    }
}

impl fmt::Display for AlbumItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.core.describe("Album", f)
    }
}

/// Optional parent id from the `ChildEntity` table.
///
/// Gallery2 stores "no parent" as 0; zero and negative ids normalize to
/// `None`.
pub(crate) async fn load_parent_link(store: &dyn GalleryStore, id: i64) -> Result<Option<i64>> {
    let values = store.fetch(tables::CHILD_ENTITY, id, &["parentId"]).await?;
    let [parent_id] = take_fields(values, tables::CHILD_ENTITY)?;
    Ok(normalize_fk(integer(
        parent_id,
        tables::CHILD_ENTITY,
        "parentId",
    )?))
}

/// On-disk leaf name from the `FileSystemEntity` table.
pub(crate) async fn load_path_component(store: &dyn GalleryStore, id: i64) -> Result<String> {
    let values = store
        .fetch(tables::FILE_SYSTEM_ENTITY, id, &["pathComponent"])
        .await?;
    let [path_component] = take_fields(values, tables::FILE_SYSTEM_ENTITY)?;
    Ok(path_component.unwrap_or_default())
}

/// Zero or negative foreign keys mean "no relation".
pub(crate) fn normalize_fk(raw: i64) -> Option<i64> {
    (raw > 0).then_some(raw)
}

pub(crate) fn text(value: Option<String>) -> String {
    value.map(|v| unescape_html(&v)).unwrap_or_default()
}

pub(crate) fn integer(value: Option<String>, table: &str, field: &str) -> Result<i64> {
    match value {
        None => Ok(0),
        Some(raw) => raw.trim().parse().map_err(|_| {
            Error::StoreMalformed(format!(
                "non-numeric value '{}' in {}.{}",
                raw, table, field
            ))
        }),
    }
}

pub(crate) fn take_fields<const N: usize>(
    values: Vec<Option<String>>,
    table: &str,
) -> Result<[Option<String>; N]> {
    values.try_into().map_err(|v: Vec<_>| {
        Error::StoreMalformed(format!(
            "expected {} fields from table {}, got {}",
            N,
            table,
            v.len()
        ))
    })
}

/// Decode the HTML entities Gallery2 stores in text fields.
fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
