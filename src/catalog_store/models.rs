//! Catalog entities as exposed by the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub audio_url: String,
    pub cover_image: Option<String>,
    /// Duration in seconds.
    pub duration: f64,
    pub album_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackCreate {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub audio_url: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub duration: f64,
    pub album_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub cover_image: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumCreate {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Defaults to the creation time when omitted.
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumWithTracks {
    #[serde(flatten)]
    pub album: Album,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSearchResults {
    pub tracks: Vec<Track>,
    pub albums: Vec<Album>,
}
