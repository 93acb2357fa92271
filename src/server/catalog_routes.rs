//! Locally managed tracks and albums, and their text search.

use super::response::{ApiError, Envelope};
use super::state::{GuardedCatalogStore, ServerState};
use crate::catalog_store::{
    Album, AlbumCreate, AlbumWithTracks, CatalogSearchResults, Track, TrackCreate,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_PAGE_LIMIT: usize = 100;

fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

#[derive(Deserialize, Debug)]
pub struct Pagination {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_page_limit")]
    pub limit: usize,
}

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
    pub q: Option<String>,
}

async fn list_tracks(
    State(catalog_store): State<GuardedCatalogStore>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Track>>, ApiError> {
    let Query(pagination) = pagination?;
    Ok(Json(
        catalog_store.list_tracks(pagination.skip, pagination.limit)?,
    ))
}

async fn get_track(
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Json<Track>, ApiError> {
    catalog_store
        .get_track(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Track"))
}

async fn create_track(
    State(catalog_store): State<GuardedCatalogStore>,
    body: Result<Json<TrackCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(track) = body?;
    let created = catalog_store.create_track(track)?;
    debug!("Created track {} '{}'", created.id, created.title);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_track(
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if catalog_store.delete_track(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Track"))
    }
}

async fn list_albums(
    State(catalog_store): State<GuardedCatalogStore>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Album>>, ApiError> {
    let Query(pagination) = pagination?;
    Ok(Json(
        catalog_store.list_albums(pagination.skip, pagination.limit)?,
    ))
}

async fn get_album(
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Json<AlbumWithTracks>, ApiError> {
    catalog_store
        .get_album_with_tracks(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Album"))
}

async fn create_album(
    State(catalog_store): State<GuardedCatalogStore>,
    body: Result<Json<AlbumCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(album) = body?;
    let created = catalog_store.create_album(album)?;
    debug!("Created album {} '{}'", created.id, created.title);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_album(
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if catalog_store.delete_album(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Album"))
    }
}

async fn search(
    State(catalog_store): State<GuardedCatalogStore>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Envelope<CatalogSearchResults>, ApiError> {
    let Query(query) = query?;
    let q = query
        .q
        .ok_or_else(|| ApiError::BadRequest("Missing query parameter 'q'".to_string()))?;
    let results = catalog_store.search(&q)?;
    Ok(Envelope::with_message(results, "Search results"))
}

pub fn make_catalog_routes(state: ServerState) -> Router {
    Router::new()
        .route("/tracks", get(list_tracks).post(create_track))
        .route("/tracks/{id}", get(get_track).delete(delete_track))
        .route("/albums", get(list_albums).post(create_album))
        .route("/albums/{id}", get(get_album).delete(delete_album))
        .route("/search", get(search))
        .with_state(state)
}
