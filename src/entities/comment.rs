//! Comment records

use super::{take_fields, text};
use crate::store::{tables, GalleryStore};
use crate::Result;

/// A Gallery2 comment.
///
/// The comment's own id doubles as a `ChildEntity` id whose parent is the
/// photo the comment belongs to. That join is resolved by the gallery
/// builder, not here.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub subject: String,
    pub body: String,
}

impl Comment {
    pub async fn load(store: &dyn GalleryStore, id: i64) -> Result<Self> {
        let values = store
            .fetch(tables::COMMENT, id, &["subject", "comment"])
            .await?;
        let [subject, body] = take_fields(values, tables::COMMENT)?;

        Ok(Self {
            id,
            subject: text(subject),
            body: text(body),
        })
    }

    /// The single text field sent to the remote service: the body when
    /// present, otherwise the subject.
    pub fn remote_text(&self) -> &str {
        if self.body.is_empty() {
            &self.subject
        } else {
            &self.body
        }
    }
}
