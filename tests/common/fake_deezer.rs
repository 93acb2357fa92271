//! In-process stand-in for the upstream music catalog API
//!
//! Serves the handful of endpoints the server consumes from a random port,
//! with canned payloads and per-endpoint call counters.

use super::constants::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct Calls {
    chart: AtomicUsize,
    track: AtomicUsize,
    album: AtomicUsize,
    search_tracks: AtomicUsize,
    search_albums: AtomicUsize,
    radio: AtomicUsize,
    radio_genres: Mutex<Vec<i64>>,
}

#[derive(Deserialize)]
struct ListingQuery {
    q: Option<String>,
    limit: Option<usize>,
}

fn upstream_track(id: i64, title: &str, artist: &str, genre_id: i64) -> Value {
    json!({
        "id": id,
        "title": title,
        "preview": format!("https://cdn.example.com/preview/{}.mp3", id),
        "duration": 180,
        "genre_id": genre_id,
        "artist": { "id": id * 10, "name": artist },
        "album": {
            "id": id * 100,
            "cover": format!("https://cdn.example.com/cover/{}.jpg", id),
            "cover_small": format!("https://cdn.example.com/cover/{}-small.jpg", id),
            "cover_medium": format!("https://cdn.example.com/cover/{}-medium.jpg", id),
            "cover_big": format!("https://cdn.example.com/cover/{}-big.jpg", id),
        },
    })
}

fn upstream_album(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "cover_medium": format!("https://cdn.example.com/album/{}.jpg", id),
        "artist": { "name": "Search Artist" },
        "record_type": "album",
    })
}

/// 4 tracks by one artist, 3 by another and 2 singles: two artist albums,
/// too few leftovers for a genre album.
fn radio_tracks() -> Vec<Value> {
    let mut tracks = Vec::new();
    for i in 0..4 {
        tracks.push(upstream_track(
            1000 + i,
            &format!("Star Song {}", i + 1),
            FAKE_RADIO_ARTIST_1,
            152,
        ));
    }
    for i in 0..3 {
        tracks.push(upstream_track(
            2000 + i,
            &format!("Duo Song {}", i + 1),
            FAKE_RADIO_ARTIST_2,
            152,
        ));
    }
    tracks.push(upstream_track(3000, "Lonely Song", "Solo One", 152));
    tracks.push(upstream_track(3001, "Another Lonely Song", "Solo Two", 152));
    tracks
}

/// 3 tracks by one artist with null titles and a string genre id, 3 tracks
/// whose artist name is null, and one track that cannot be read at all.
fn degraded_radio_tracks() -> Vec<Value> {
    let mut tracks = Vec::new();
    for i in 0..3 {
        let mut track = upstream_track(4000 + i, "", FAKE_DEGRADED_RADIO_ARTIST, 144);
        track["title"] = Value::Null;
        if i == 1 {
            track["genre_id"] = json!("144");
        }
        tracks.push(track);
    }
    for i in 0..3 {
        let mut track = upstream_track(5000 + i, &format!("Nameless {}", i + 1), "", 144);
        track["artist"]["name"] = Value::Null;
        tracks.push(track);
    }
    tracks.push(json!({ "id": "not-a-number", "title": "Unreadable" }));
    tracks
}

fn take_limit(items: Vec<Value>, limit: Option<usize>) -> Json<Value> {
    let items: Vec<Value> = items.into_iter().take(limit.unwrap_or(25)).collect();
    let total = items.len();
    Json(json!({ "data": items, "total": total }))
}

async fn chart(State(calls): State<Arc<Calls>>, Query(query): Query<ListingQuery>) -> Json<Value> {
    calls.chart.fetch_add(1, Ordering::SeqCst);
    let tracks = (0..FAKE_CHART_TRACKS_COUNT as i64)
        .map(|i| upstream_track(i + 1, &format!("Chart Hit {}", i + 1), "Chart Artist", 132))
        .collect();
    take_limit(tracks, query.limit)
}

async fn track(State(calls): State<Arc<Calls>>, Path(id): Path<i64>) -> Response {
    calls.track.fetch_add(1, Ordering::SeqCst);
    if id == FAKE_MISSING_TRACK_ID {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(upstream_track(id, "Fetched Track", "Fetched Artist", 132)).into_response()
}

async fn album(State(calls): State<Arc<Calls>>, Path(id): Path<i64>) -> Json<Value> {
    calls.album.fetch_add(1, Ordering::SeqCst);
    Json(upstream_album(id, "Fetched Album"))
}

async fn search_tracks(
    State(calls): State<Arc<Calls>>,
    Query(query): Query<ListingQuery>,
) -> Json<Value> {
    calls.search_tracks.fetch_add(1, Ordering::SeqCst);
    let q = query.q.unwrap_or_default();
    let tracks = (0..FAKE_SEARCH_TRACKS_COUNT as i64)
        .map(|i| upstream_track(500 + i, &format!("{} Song {}", q, i + 1), "Search Artist", 132))
        .collect();
    take_limit(tracks, query.limit)
}

async fn search_albums(
    State(calls): State<Arc<Calls>>,
    Query(query): Query<ListingQuery>,
) -> Json<Value> {
    calls.search_albums.fetch_add(1, Ordering::SeqCst);
    let q = query.q.unwrap_or_default();
    let albums = (0..FAKE_SEARCH_ALBUMS_COUNT as i64)
        .map(|i| upstream_album(700 + i, &format!("{} Album {}", q, i + 1)))
        .collect();
    take_limit(albums, query.limit)
}

async fn radio(
    State(calls): State<Arc<Calls>>,
    Path(genre_id): Path<i64>,
    Query(query): Query<ListingQuery>,
) -> Json<Value> {
    calls.radio.fetch_add(1, Ordering::SeqCst);
    calls.radio_genres.lock().unwrap().push(genre_id);
    let tracks = if genre_id == FAKE_DEGRADED_RADIO_GENRE_ID {
        degraded_radio_tracks()
    } else {
        radio_tracks()
    };
    take_limit(tracks, query.limit)
}

/// Fake upstream server, shut down when dropped.
pub struct FakeDeezer {
    pub base_url: String,
    calls: Arc<Calls>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeDeezer {
    pub async fn spawn() -> Self {
        let calls = Arc::new(Calls::default());
        let app = Router::new()
            .route("/chart/0/tracks", get(chart))
            .route("/track/{id}", get(track))
            .route("/album/{id}", get(album))
            .route("/search", get(search_tracks))
            .route("/search/album", get(search_albums))
            .route("/radio/{genre_id}/tracks", get(radio))
            .with_state(calls.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake upstream");
        let port = listener.local_addr().expect("No local address").port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake upstream failed");
        });

        FakeDeezer {
            base_url: format!("http://127.0.0.1:{}", port),
            calls,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn chart_calls(&self) -> usize {
        self.calls.chart.load(Ordering::SeqCst)
    }

    pub fn track_calls(&self) -> usize {
        self.calls.track.load(Ordering::SeqCst)
    }

    pub fn album_calls(&self) -> usize {
        self.calls.album.load(Ordering::SeqCst)
    }

    pub fn search_tracks_calls(&self) -> usize {
        self.calls.search_tracks.load(Ordering::SeqCst)
    }

    pub fn search_albums_calls(&self) -> usize {
        self.calls.search_albums.load(Ordering::SeqCst)
    }

    pub fn radio_calls(&self) -> usize {
        self.calls.radio.load(Ordering::SeqCst)
    }

    /// Genre ids of the radios requested so far, in order.
    pub fn radio_genres(&self) -> Vec<i64> {
        self.calls.radio_genres.lock().unwrap().clone()
    }
}

impl Drop for FakeDeezer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
