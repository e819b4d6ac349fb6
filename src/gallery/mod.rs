//! Hierarchy and aggregation builder
//!
//! Joins the flat Gallery2 entity sets into the object graph the uploader
//! walks: albums with computed display titles in upload order, media grouped
//! under its parent album with rotation and comments resolved, and full
//! on-disk album paths.

use crate::entities::{AlbumItem, Comment, Derivative, MovieItem, PhotoItem};
use crate::store::{tables, GalleryStore};
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Safety bound on parent-chain walks. The schema is assumed acyclic but is
/// fetched live, never validated.
const MAX_ANCESTRY_DEPTH: usize = 128;

/// Separator between ancestor titles in long-title mode.
const TITLE_SEPARATOR: &str = " - ";

/// Builder inputs taken from the migration configuration.
#[derive(Debug, Clone, Default)]
pub struct GalleryOptions {
    pub long_titles: bool,
    pub truncate_count: usize,
    pub exclude_movies: bool,
}

/// A media item grouped under an album: photo or movie.
#[derive(Debug, Clone)]
pub enum MediaItem {
    Photo(PhotoItem),
    Movie(MovieItem),
}

impl MediaItem {
    pub fn core(&self) -> &crate::entities::ItemCore {
        match self {
            MediaItem::Photo(p) => &p.core,
            MediaItem::Movie(m) => &m.core,
        }
    }

    pub fn path_component(&self) -> &str {
        match self {
            MediaItem::Photo(p) => &p.path_component,
            MediaItem::Movie(m) => &m.path_component,
        }
    }

    /// Rotation resolved from derivatives; only photos carry one.
    pub fn rotation(&self) -> Option<i32> {
        match self {
            MediaItem::Photo(p) => p.rotation,
            MediaItem::Movie(_) => None,
        }
    }

    /// Attached comments in attachment order; only photos carry them.
    pub fn comments(&self) -> &[Comment] {
        match self {
            MediaItem::Photo(p) => &p.comments,
            MediaItem::Movie(_) => &[],
        }
    }
}

/// The fully joined gallery graph, read-only from here on.
#[derive(Debug, Default)]
pub struct Gallery {
    pub albums: HashMap<i64, AlbumItem>,
    /// (album id, display title), sorted lexicographically by title. This is
    /// the upload order.
    pub sorted_albums: Vec<(i64, String)>,
    pub media_by_album: HashMap<i64, Vec<MediaItem>>,
    /// Full on-disk path per album, parent components first
    pub album_paths: HashMap<i64, String>,
}

impl Gallery {
    pub fn media_for(&self, album_id: i64) -> &[MediaItem] {
        self.media_by_album
            .get(&album_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_media(&self, album_id: i64) -> bool {
        !self.media_for(album_id).is_empty()
    }
}

/// Load every entity set from the store and join them.
pub async fn load_gallery(store: &dyn GalleryStore, options: &GalleryOptions) -> Result<Gallery> {
    let album_ids = store.ids_for_table(tables::ALBUM_ITEM).await?;
    let mut albums = HashMap::with_capacity(album_ids.len());
    for id in album_ids {
        let album = AlbumItem::load(store, id).await?;
        debug!(%album, "Loaded album");
        albums.insert(id, album);
    }
    info!(albums = albums.len(), "Loaded album set");

    let mut sorted_albums = Vec::with_capacity(albums.len());
    let mut album_paths = HashMap::with_capacity(albums.len());
    for album in albums.values() {
        sorted_albums.push((album.core.id, display_title(&albums, album, options)?));
        album_paths.insert(album.core.id, full_album_path(&albums, album)?);
    }
    sorted_albums.sort_by(|a, b| a.1.cmp(&b.1));

    // Child links, needed for the comment join: a comment's own id is a
    // ChildEntity id whose parent is the commented photo.
    let mut child_parents = HashMap::new();
    for id in store.ids_for_table(tables::CHILD_ENTITY).await? {
        if let Some(parent_id) = crate::entities::load_parent_link(store, id).await? {
            child_parents.insert(id, parent_id);
        }
    }

    let mut comments_by_photo: HashMap<i64, Vec<Comment>> = HashMap::new();
    let comment_ids = store.ids_for_table(tables::COMMENT).await?;
    let comment_count = comment_ids.len();
    for id in comment_ids {
        let comment = Comment::load(store, id).await?;
        match child_parents.get(&id) {
            Some(photo_id) => comments_by_photo.entry(*photo_id).or_default().push(comment),
            None => debug!(comment_id = id, "Comment has no child-entity link, dropped"),
        }
    }

    let mut derivatives_by_source: HashMap<i64, Vec<Derivative>> = HashMap::new();
    for id in store.ids_for_table(tables::DERIVATIVE).await? {
        let derivative = Derivative::load(store, id).await?;
        if let Some(source_id) = derivative.source_id {
            derivatives_by_source
                .entry(source_id)
                .or_default()
                .push(derivative);
        }
    }
    info!(
        comments = comment_count,
        derivative_sources = derivatives_by_source.len(),
        "Loaded comment and derivative sets"
    );

    let mut media_by_album: HashMap<i64, Vec<MediaItem>> = HashMap::new();
    let mut photo_count = 0usize;
    for id in store.ids_for_table(tables::PHOTO_ITEM).await? {
        let mut photo = PhotoItem::load(store, id).await?;
        photo.rotation = derivatives_by_source
            .get(&id)
            .and_then(|derivatives| derivatives.iter().find_map(Derivative::rotation_angle));
        photo.comments = comments_by_photo.remove(&id).unwrap_or_default();

        let Some(album_id) = photo.parent_id else {
            warn!(photo_id = id, "Photo has no parent album, dropped");
            continue;
        };
        debug!(%photo, "Loaded photo");
        media_by_album
            .entry(album_id)
            .or_default()
            .push(MediaItem::Photo(photo));
        photo_count += 1;
    }

    let mut movie_count = 0usize;
    if !options.exclude_movies {
        for id in store.ids_for_table(tables::MOVIE_ITEM).await? {
            let movie = MovieItem::load(store, id).await?;
            let Some(album_id) = movie.parent_id else {
                warn!(movie_id = id, "Movie has no parent album, dropped");
                continue;
            };
            debug!(%movie, "Loaded movie");
            media_by_album
                .entry(album_id)
                .or_default()
                .push(MediaItem::Movie(movie));
            movie_count += 1;
        }
    }
    info!(
        photos = photo_count,
        movies = movie_count,
        "Grouped media under albums"
    );

    Ok(Gallery {
        albums,
        sorted_albums,
        media_by_album,
        album_paths,
    })
}

/// The album chain from root to `leaf`, following parent links.
///
/// A parent id pointing at an album missing from the store ends the walk
/// with a warning; chains longer than the safety depth are treated as
/// cycles.
fn ancestor_chain<'a>(
    albums: &'a HashMap<i64, AlbumItem>,
    leaf: &'a AlbumItem,
) -> Result<Vec<&'a AlbumItem>> {
    let mut chain = vec![leaf];
    let mut parent_id = leaf.parent_id;
    while let Some(id) = parent_id {
        if chain.len() > MAX_ANCESTRY_DEPTH {
            return Err(Error::HierarchyCycle {
                album_id: leaf.core.id,
            });
        }
        match albums.get(&id) {
            Some(parent) => {
                chain.push(parent);
                parent_id = parent.parent_id;
            }
            None => {
                warn!(
                    album_id = leaf.core.id,
                    missing_parent = id,
                    "Album parent missing from store, treating as root"
                );
                break;
            }
        }
    }
    chain.reverse();
    Ok(chain)
}

/// Compute the display title of an album.
///
/// Plain mode returns the album's own title. Long-titles mode joins ancestor
/// titles root-first with `" - "`, dropping `truncate_count` leading
/// segments but always keeping the leaf title.
pub fn display_title(
    albums: &HashMap<i64, AlbumItem>,
    leaf: &AlbumItem,
    options: &GalleryOptions,
) -> Result<String> {
    if !options.long_titles {
        return Ok(leaf.core.title.clone());
    }

    let chain = ancestor_chain(albums, leaf)?;
    let mut titles: Vec<&str> = chain.iter().map(|album| album.core.title.as_str()).collect();
    for _ in 0..options.truncate_count {
        if titles.len() > 1 {
            titles.remove(0);
        }
    }
    Ok(titles.join(TITLE_SEPARATOR))
}

/// Full on-disk album path, parent path components joined with `/`.
pub fn full_album_path(albums: &HashMap<i64, AlbumItem>, leaf: &AlbumItem) -> Result<String> {
    let chain = ancestor_chain(albums, leaf)?;
    let components: Vec<&str> = chain
        .iter()
        .map(|album| album.path_component.as_str())
        .collect();
    Ok(components.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ItemCore;

    fn album(id: i64, parent_id: Option<i64>, title: &str, path: &str) -> AlbumItem {
        AlbumItem {
            core: ItemCore {
                id,
                title: title.to_string(),
                summary: String::new(),
                description: String::new(),
                keywords: String::new(),
                created: 0,
            },
            parent_id,
            path_component: path.to_string(),
            theme: String::new(),
        }
    }

    fn album_map(albums: Vec<AlbumItem>) -> HashMap<i64, AlbumItem> {
        albums.into_iter().map(|a| (a.core.id, a)).collect()
    }

    fn long_titles(truncate_count: usize) -> GalleryOptions {
        GalleryOptions {
            long_titles: true,
            truncate_count,
            exclude_movies: false,
        }
    }

    #[test]
    fn plain_display_title_is_own_title() {
        let albums = album_map(vec![
            album(1, None, "Root", "root"),
            album(2, Some(1), "Holidays", "holidays"),
        ]);
        let title =
            display_title(&albums, &albums[&2], &GalleryOptions::default()).unwrap();
        assert_eq!(title, "Holidays");
    }

    #[test]
    fn long_title_joins_ancestors_root_first() {
        let albums = album_map(vec![
            album(1, None, "Root", "root"),
            album(2, Some(1), "2005", "2005"),
            album(3, Some(2), "Winter", "winter"),
        ]);
        let title = display_title(&albums, &albums[&3], &long_titles(0)).unwrap();
        assert_eq!(title, "Root - 2005 - Winter");
    }

    #[test]
    fn truncation_drops_leading_ancestors() {
        let albums = album_map(vec![
            album(1, None, "Root", "root"),
            album(2, Some(1), "2005", "2005"),
            album(3, Some(2), "Winter", "winter"),
        ]);
        let title = display_title(&albums, &albums[&3], &long_titles(1)).unwrap();
        assert_eq!(title, "2005 - Winter");
    }

    #[test]
    fn truncation_never_removes_the_leaf_title() {
        let albums = album_map(vec![
            album(1, None, "Root", "root"),
            album(2, Some(1), "Winter", "winter"),
        ]);
        let title = display_title(&albums, &albums[&2], &long_titles(10)).unwrap();
        assert_eq!(title, "Winter");
    }

    #[test]
    fn full_path_joins_components() {
        let albums = album_map(vec![
            album(1, None, "Root", "root"),
            album(2, Some(1), "2005", "2005"),
            album(3, Some(2), "Winter", "winter"),
        ]);
        assert_eq!(full_album_path(&albums, &albums[&3]).unwrap(), "root/2005/winter");
        assert_eq!(full_album_path(&albums, &albums[&1]).unwrap(), "root");
    }

    #[test]
    fn cyclic_parent_chain_is_detected() {
        let albums = album_map(vec![
            album(1, Some(2), "A", "a"),
            album(2, Some(1), "B", "b"),
        ]);
        let err = full_album_path(&albums, &albums[&1]).unwrap_err();
        assert!(matches!(err, Error::HierarchyCycle { album_id: 1 }));
    }

    #[test]
    fn missing_parent_ends_the_walk() {
        let albums = album_map(vec![album(5, Some(99), "Orphan", "orphan")]);
        assert_eq!(full_album_path(&albums, &albums[&5]).unwrap(), "orphan");
    }
}
