use super::client::MusicProvider;
use super::error::UpstreamError;
use super::genres::{genre_id, random_genre};
use super::models::GenreAlbum;
use super::synthesizer::synthesize;
use std::sync::Arc;
use tracing::{debug, info};

/// How many radio tracks are fetched to synthesize albums from.
pub const RADIO_TRACKS_LIMIT: usize = 100;
pub const TRACKS_PER_SYNTHESIZED_ALBUM: usize = 10;

/// Assembles album listings for a genre, topping up real provider albums
/// with synthesized ones when the search comes back short.
#[derive(Clone)]
pub struct GenreAlbumService {
    provider: Arc<dyn MusicProvider>,
}

impl GenreAlbumService {
    pub fn new(provider: Arc<dyn MusicProvider>) -> Self {
        Self { provider }
    }

    /// Returns at most `limit` albums for `genre_name`, or for a random
    /// catalog genre when none is given. Provider search results come first.
    pub async fn get_genre_albums(
        &self,
        genre_name: Option<&str>,
        limit: usize,
    ) -> Result<Vec<GenreAlbum>, UpstreamError> {
        let genre_name = match genre_name {
            Some(name) => name,
            None => random_genre().name,
        };
        let radio_id = genre_id(genre_name);
        debug!("Genre albums for '{}' (radio {})", genre_name, radio_id);

        let mut albums: Vec<GenreAlbum> = self
            .provider
            .search_albums(genre_name, limit)
            .await?
            .into_iter()
            .take(limit)
            .map(GenreAlbum::Provider)
            .collect();

        if albums.len() < limit {
            let tracks = self
                .provider
                .radio_tracks(radio_id, RADIO_TRACKS_LIMIT)
                .await?;
            let missing = limit - albums.len();
            let synthesized = synthesize(&tracks, TRACKS_PER_SYNTHESIZED_ALBUM);
            info!(
                "Genre '{}': {} provider albums, {} synthesized from {} radio tracks",
                genre_name,
                albums.len(),
                synthesized.len().min(missing),
                tracks.len()
            );
            albums.extend(
                synthesized
                    .into_iter()
                    .take(missing)
                    .map(GenreAlbum::Synthesized),
            );
        }

        albums.truncate(limit);
        Ok(albums)
    }
}
