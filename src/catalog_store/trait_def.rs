//! CatalogStore trait definition.

use super::models::{
    Album, AlbumCreate, AlbumWithTracks, CatalogSearchResults, Track, TrackCreate,
};
use anyhow::Result;

/// Maximum number of tracks and of albums returned by [`CatalogStore::search`].
pub const SEARCH_RESULTS_LIMIT: usize = 10;

/// Storage backend for locally managed tracks and albums.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Tracks
    // =========================================================================

    fn list_tracks(&self, skip: usize, limit: usize) -> Result<Vec<Track>>;

    /// Returns Ok(None) if the track does not exist.
    fn get_track(&self, id: i64) -> Result<Option<Track>>;

    fn create_track(&self, track: TrackCreate) -> Result<Track>;

    /// Returns false if there was no track with the given id.
    fn delete_track(&self, id: i64) -> Result<bool>;

    // =========================================================================
    // Albums
    // =========================================================================

    fn list_albums(&self, skip: usize, limit: usize) -> Result<Vec<Album>>;

    fn get_album(&self, id: i64) -> Result<Option<Album>>;

    /// Returns the album together with every track referencing it.
    fn get_album_with_tracks(&self, id: i64) -> Result<Option<AlbumWithTracks>>;

    fn create_album(&self, album: AlbumCreate) -> Result<Album>;

    /// Returns false if there was no album with the given id.
    fn delete_album(&self, id: i64) -> Result<bool>;

    // =========================================================================
    // Search
    // =========================================================================

    /// Case-insensitive substring search. Tracks match on title, artist or
    /// genre; albums on title or artist. At most [`SEARCH_RESULTS_LIMIT`] of each.
    fn search(&self, query: &str) -> Result<CatalogSearchResults>;
}
