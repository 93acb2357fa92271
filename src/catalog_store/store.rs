//! SQLite-backed catalog store.

use super::models::*;
use super::schema::{ALBUMS_TABLE, CATALOG_VERSIONED_SCHEMAS, TRACKS_TABLE};
use super::trait_def::{CatalogStore, SEARCH_RESULTS_LIMIT};
use crate::sqlite_persistence::open_versioned_db;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const TRACK_COLUMNS: &str = "id, title, artist, genre, audio_url, cover_image, duration, album_id";
const ALBUM_COLUMNS: &str = "id, title, artist, cover_image, release_date";

#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

fn track_from_row(row: &Row) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        genre: row.get(3)?,
        audio_url: row.get(4)?,
        cover_image: row.get(5)?,
        duration: row.get(6)?,
        album_id: row.get(7)?,
    })
}

fn album_from_row(row: &Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        cover_image: row.get(3)?,
        release_date: row
            .get::<_, Option<i64>>(4)?
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}

/// Escapes LIKE wildcards so the query is matched literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl SqliteCatalogStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned_db(db_path, CATALOG_VERSIONED_SCHEMAS, "catalog")?;

        let album_count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", ALBUMS_TABLE.name), [], |r| r.get(0))
            .unwrap_or(0);
        let track_count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", TRACKS_TABLE.name), [], |r| r.get(0))
            .unwrap_or(0);
        info!(
            "Opened catalog: {} albums, {} tracks",
            album_count, track_count
        );

        Ok(SqliteCatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn tracks_of_album(conn: &Connection, album_id: i64) -> Result<Vec<Track>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE album_id = ?1 ORDER BY id",
            TRACK_COLUMNS, TRACKS_TABLE.name
        ))?;
        let tracks = stmt
            .query_map(params![album_id], track_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn list_tracks(&self, skip: usize, limit: usize) -> Result<Vec<Track>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY id LIMIT ?1 OFFSET ?2",
            TRACK_COLUMNS, TRACKS_TABLE.name
        ))?;
        let tracks = stmt
            .query_map(params![limit as i64, skip as i64], track_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    fn get_track(&self, id: i64) -> Result<Option<Track>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM {} WHERE id = ?1", TRACK_COLUMNS, TRACKS_TABLE.name),
            params![id],
            track_from_row,
        )
        .optional()
        .with_context(|| format!("Failed to read track {}", id))
    }

    fn create_track(&self, track: TrackCreate) -> Result<Track> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO {} (title, artist, genre, audio_url, cover_image, duration, album_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                TRACKS_TABLE.name
            ),
            params![
                track.title,
                track.artist,
                track.genre,
                track.audio_url,
                track.cover_image,
                track.duration,
                track.album_id
            ],
        )
        .context("Failed to insert track")?;
        let id = conn.last_insert_rowid();
        debug!("Created track {}", id);

        Ok(Track {
            id,
            title: track.title,
            artist: track.artist,
            genre: track.genre,
            audio_url: track.audio_url,
            cover_image: track.cover_image,
            duration: track.duration,
            album_id: track.album_id,
        })
    }

    fn delete_track(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", TRACKS_TABLE.name),
            params![id],
        )?;
        Ok(deleted > 0)
    }

    fn list_albums(&self, skip: usize, limit: usize) -> Result<Vec<Album>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY id LIMIT ?1 OFFSET ?2",
            ALBUM_COLUMNS, ALBUMS_TABLE.name
        ))?;
        let albums = stmt
            .query_map(params![limit as i64, skip as i64], album_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(albums)
    }

    fn get_album(&self, id: i64) -> Result<Option<Album>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM {} WHERE id = ?1", ALBUM_COLUMNS, ALBUMS_TABLE.name),
            params![id],
            album_from_row,
        )
        .optional()
        .with_context(|| format!("Failed to read album {}", id))
    }

    fn get_album_with_tracks(&self, id: i64) -> Result<Option<AlbumWithTracks>> {
        let album = match self.get_album(id)? {
            Some(album) => album,
            None => return Ok(None),
        };
        let conn = self.conn.lock().unwrap();
        let tracks = Self::tracks_of_album(&conn, id)?;
        Ok(Some(AlbumWithTracks { album, tracks }))
    }

    fn create_album(&self, album: AlbumCreate) -> Result<Album> {
        // Stored with second precision, so truncate before handing it back.
        let release_date = album
            .release_date
            .unwrap_or_else(Utc::now)
            .timestamp();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO {} (title, artist, cover_image, release_date) VALUES (?1, ?2, ?3, ?4)",
                ALBUMS_TABLE.name
            ),
            params![album.title, album.artist, album.cover_image, release_date],
        )
        .context("Failed to insert album")?;
        let id = conn.last_insert_rowid();
        debug!("Created album {}", id);

        Ok(Album {
            id,
            title: album.title,
            artist: album.artist,
            cover_image: album.cover_image,
            release_date: DateTime::from_timestamp(release_date, 0),
        })
    }

    fn delete_album(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", ALBUMS_TABLE.name),
            params![id],
        )?;
        Ok(deleted > 0)
    }

    fn search(&self, query: &str) -> Result<CatalogSearchResults> {
        let pattern = like_pattern(query);
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} \
             WHERE title LIKE ?1 ESCAPE '\\' OR artist LIKE ?1 ESCAPE '\\' OR genre LIKE ?1 ESCAPE '\\' \
             ORDER BY id LIMIT ?2",
            TRACK_COLUMNS, TRACKS_TABLE.name
        ))?;
        let tracks = stmt
            .query_map(params![pattern, SEARCH_RESULTS_LIMIT as i64], track_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} \
             WHERE title LIKE ?1 ESCAPE '\\' OR artist LIKE ?1 ESCAPE '\\' \
             ORDER BY id LIMIT ?2",
            ALBUM_COLUMNS, ALBUMS_TABLE.name
        ))?;
        let albums = stmt
            .query_map(params![pattern, SEARCH_RESULTS_LIMIT as i64], album_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CatalogSearchResults { tracks, albums })
    }
}
