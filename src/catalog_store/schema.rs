//! SQLite schema of the local catalog database.

use crate::sqlite_column;
use crate::sqlite_persistence::{SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

pub const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("cover_image", &SqlType::Text),
        // Unix seconds
        sqlite_column!("release_date", &SqlType::Integer),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_albums_title", "title"),
        ("idx_albums_artist", "artist"),
    ],
    unique_constraints: &[],
};

// album_id is a plain reference: tracks may be created before their album
// and survive its deletion.
pub const TRACKS_TABLE: Table = Table {
    name: "tracks",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("genre", &SqlType::Text, non_null = true),
        sqlite_column!("audio_url", &SqlType::Text, non_null = true),
        sqlite_column!("cover_image", &SqlType::Text),
        sqlite_column!("duration", &SqlType::Real, non_null = true),
        sqlite_column!("album_id", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_tracks_title", "title"),
        ("idx_tracks_artist", "artist"),
        ("idx_tracks_album_id", "album_id"),
    ],
    unique_constraints: &[],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ALBUMS_TABLE, TRACKS_TABLE],
    migration: None,
}];
