//! Thin proxy over the upstream provider, plus genre album browsing.

use super::response::{ApiError, Envelope};
use super::state::{GuardedMusicProvider, ServerState};
use crate::deezer::{genre_names, GenreAlbum, GenreAlbumService};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_DEEZER_LIMIT: usize = 10;

fn default_deezer_limit() -> usize {
    DEFAULT_DEEZER_LIMIT
}

#[derive(Deserialize, Debug)]
struct LimitQuery {
    #[serde(default = "default_deezer_limit")]
    limit: usize,
}

#[derive(Deserialize, Debug)]
struct DeezerSearchQuery {
    q: Option<String>,
    #[serde(default = "default_deezer_limit")]
    limit: usize,
}

#[derive(Deserialize, Debug)]
struct CustomAlbumsQuery {
    genre: Option<String>,
    #[serde(default = "default_deezer_limit")]
    limit: usize,
}

#[derive(Serialize, Debug)]
struct DeezerSearchResults {
    tracks: Vec<Value>,
    albums: Vec<Value>,
}

async fn chart_tracks(
    State(provider): State<GuardedMusicProvider>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Envelope<Vec<Value>>, ApiError> {
    let Query(query) = query?;
    Ok(Envelope::success(provider.chart_tracks(query.limit).await?))
}

async fn get_track(
    State(provider): State<GuardedMusicProvider>,
    Path(id): Path<i64>,
) -> Result<Envelope<Value>, ApiError> {
    Ok(Envelope::success(provider.track(id).await?))
}

async fn get_album(
    State(provider): State<GuardedMusicProvider>,
    Path(id): Path<i64>,
) -> Result<Envelope<Value>, ApiError> {
    Ok(Envelope::success(provider.album(id).await?))
}

async fn search(
    State(provider): State<GuardedMusicProvider>,
    query: Result<Query<DeezerSearchQuery>, QueryRejection>,
) -> Result<Envelope<DeezerSearchResults>, ApiError> {
    let Query(query) = query?;
    let q = query
        .q
        .ok_or_else(|| ApiError::BadRequest("Missing query parameter 'q'".to_string()))?;
    let tracks = provider.search_tracks(&q, query.limit).await?;
    let albums = provider.search_albums(&q, query.limit).await?;
    Ok(Envelope::success(DeezerSearchResults { tracks, albums }))
}

async fn list_genres() -> Envelope<Vec<&'static str>> {
    Envelope::success(genre_names())
}

async fn genre_albums(
    State(service): State<GenreAlbumService>,
    Path(genre_name): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Envelope<Vec<GenreAlbum>>, ApiError> {
    let Query(query) = query?;
    let albums = service
        .get_genre_albums(Some(&genre_name), query.limit)
        .await?;
    Ok(Envelope::success(albums))
}

async fn custom_albums(
    State(service): State<GenreAlbumService>,
    query: Result<Query<CustomAlbumsQuery>, QueryRejection>,
) -> Result<Envelope<Vec<GenreAlbum>>, ApiError> {
    let Query(query) = query?;
    let genre = query.genre.as_deref().filter(|genre| !genre.is_empty());
    let albums = service.get_genre_albums(genre, query.limit).await?;
    Ok(Envelope::success(albums))
}

pub fn make_deezer_routes(state: ServerState) -> Router {
    Router::new()
        .route("/tracks", get(chart_tracks))
        .route("/tracks/{id}", get(get_track))
        .route("/albums/{id}", get(get_album))
        .route("/search", get(search))
        .route("/genres", get(list_genres))
        .route("/genre/{genre_name}/albums", get(genre_albums))
        .route("/custom-albums", get(custom_albums))
        .with_state(state)
}
