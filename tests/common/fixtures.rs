//! Test fixture creation for the catalog and user databases

use super::constants::*;
use anyhow::Result;
use playpod_catalog_server::catalog_store::{
    AlbumCreate, CatalogStore, SqliteCatalogStore, TrackCreate,
};
use playpod_catalog_server::user::{
    PasswordCredentials, SqliteUserStore, UserCredentialsStore, UserStore,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn track(title: &str, artist: &str, genre: &str, album_id: i64, duration: f64) -> TrackCreate {
    TrackCreate {
        title: title.to_string(),
        artist: artist.to_string(),
        genre: genre.to_string(),
        audio_url: format!(
            "https://media.example.com/{}.mp3",
            title.to_lowercase().replace(' ', "-")
        ),
        cover_image: None,
        duration,
        album_id,
    }
}

/// Creates a temporary catalog with 2 albums and 5 tracks.
/// Returns (temp_dir, catalog_db_path).
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let catalog_db_path = dir.path().join("catalog.db");
    let store = SqliteCatalogStore::new(&catalog_db_path)?;

    let album_1 = store.create_album(AlbumCreate {
        title: ALBUM_1_TITLE.to_string(),
        artist: ARTIST_1_NAME.to_string(),
        cover_image: Some("https://media.example.com/first-album.jpg".to_string()),
        release_date: None,
    })?;
    let album_2 = store.create_album(AlbumCreate {
        title: ALBUM_2_TITLE.to_string(),
        artist: ARTIST_2_NAME.to_string(),
        cover_image: None,
        release_date: None,
    })?;
    assert_eq!(album_1.id, ALBUM_1_ID);
    assert_eq!(album_2.id, ALBUM_2_ID);

    store.create_track(track(TRACK_1_TITLE, ARTIST_1_NAME, "Rock", album_1.id, 210.0))?;
    store.create_track(track(TRACK_2_TITLE, ARTIST_1_NAME, "Rock", album_1.id, 185.5))?;
    store.create_track(track(TRACK_3_TITLE, ARTIST_1_NAME, "Rock", album_1.id, 242.0))?;
    store.create_track(track(TRACK_4_TITLE, ARTIST_2_NAME, "Jazz", album_2.id, 301.0))?;
    store.create_track(track(TRACK_5_TITLE, ARTIST_2_NAME, "Jazz", album_2.id, 199.0))?;

    Ok((dir, catalog_db_path))
}

fn add_user(store: &SqliteUserStore, username: &str, email: &str, password: &str) -> Result<()> {
    let user = store.create_user(username, email)?;
    store.set_password_credentials(&PasswordCredentials::new(user.id, password)?)?;
    Ok(())
}

/// Creates a temporary user database with the two test users.
/// Returns (temp_dir, user_db_path).
pub fn create_test_db_with_users() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("user.db");
    let store = SqliteUserStore::new(&db_path)?;

    add_user(&store, TEST_USER, TEST_EMAIL, TEST_PASS)?;
    add_user(&store, OTHER_USER, OTHER_EMAIL, OTHER_PASS)?;

    Ok((dir, db_path))
}
