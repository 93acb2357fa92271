//! Shapes exchanged with the upstream provider, and the albums we build
//! out of its tracks.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Grouping key used for tracks without a `genre_id`.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Artist name used for tracks that carry no artist object.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Reads an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything but an integer reads as absent.
fn integer_or_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_i64())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamArtist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The album object embedded in a provider track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamAlbumRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_big: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A track as returned by the provider. Fields we don't interpret are kept in
/// `extra` so the track serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamTrack {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<UpstreamArtist>,
    #[serde(
        default,
        deserialize_with = "integer_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<UpstreamAlbumRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpstreamTrack {
    pub fn artist_name(&self) -> &str {
        self.artist
            .as_ref()
            .map(|artist| artist.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn genre_key(&self) -> GenreKey {
        match self.genre_id {
            Some(id) => GenreKey::Id(id),
            None => GenreKey::Name(UNKNOWN_GENRE.to_string()),
        }
    }
}

/// What tracks are grouped on in the genre pass. Serializes as a bare number
/// or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum GenreKey {
    Id(i64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumTracks {
    pub data: Vec<UpstreamTrack>,
}

/// An album-shaped aggregate built locally from radio tracks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedAlbum {
    pub id: i64,
    pub title: String,
    pub artist: AlbumArtist,
    pub cover_small: Option<String>,
    pub cover_medium: Option<String>,
    pub cover_big: Option<String>,
    pub tracks: AlbumTracks,
    pub release_date: String,
    pub is_custom: bool,
    pub nb_tracks: usize,
    pub genre_id: GenreKey,
}

/// An element of a genre album listing: either a provider album passed
/// through as-is, or one we synthesized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenreAlbum {
    Provider(Value),
    Synthesized(SynthesizedAlbum),
}
