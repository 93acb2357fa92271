//! Access to the upstream music catalog and genre album browsing.

mod client;
mod error;
mod genre_albums;
mod genres;
mod models;
mod synthesizer;

pub use client::{DeezerClient, MusicProvider, DEFAULT_DEEZER_BASE_URL};
pub use error::UpstreamError;
pub use genre_albums::{GenreAlbumService, RADIO_TRACKS_LIMIT, TRACKS_PER_SYNTHESIZED_ALBUM};
pub use genres::{genre_id, genre_names, random_genre, Genre, GENRE_CATALOG, NO_GENRE_ID};
pub use models::{
    AlbumArtist, AlbumTracks, GenreAlbum, GenreKey, SynthesizedAlbum, UpstreamAlbumRef,
    UpstreamArtist, UpstreamTrack, UNKNOWN_ARTIST, UNKNOWN_GENRE,
};
pub use synthesizer::{
    synthesize, synthetic_id, ARTIST_ALBUM_ID_PREFIX, GENRE_ALBUM_ID_PREFIX,
    GENRE_PASS_THRESHOLD, MIN_ARTIST_ALBUM_TRACKS, MIN_GENRE_ALBUM_TRACKS,
};
