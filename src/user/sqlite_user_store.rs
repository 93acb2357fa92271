use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_versioned_db, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
    DEFAULT_TIMESTAMP,
};
use crate::user::*;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// V 0
const USER_TABLE_V_0: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("username", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "is_active",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("1")
        ),
        sqlite_column!("profile_image", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[],
    indices: &[
        ("idx_user_username", "username"),
        ("idx_user_email", "email"),
    ],
};
const USER_PASSWORD_CREDENTIALS_V_0: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            is_unique = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[],
    indices: &[],
};
const FAVORITES_TABLE_V_0: Table = Table {
    name: "favorites",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("track_id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("audio_url", &SqlType::Text, non_null = true),
        sqlite_column!("cover_image", &SqlType::Text, non_null = true),
        sqlite_column!("duration", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["user_id", "track_id"]],
    indices: &[("idx_favorites_user_id", "user_id")],
};

/// V 1
const HISTORY_TABLE_V_1: Table = Table {
    name: "history",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("track_id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("audio_url", &SqlType::Text, non_null = true),
        sqlite_column!("cover_image", &SqlType::Text),
        sqlite_column!("duration", &SqlType::Integer, non_null = true),
        // Unix millis
        sqlite_column!("played_at", &SqlType::Integer, non_null = true),
    ],
    unique_constraints: &[],
    indices: &[
        ("idx_history_user_id", "user_id"),
        ("idx_history_played_at", "played_at"),
    ],
};

pub const USER_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[
            USER_TABLE_V_0,
            USER_PASSWORD_CREDENTIALS_V_0,
            FAVORITES_TABLE_V_0,
        ],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[
            USER_TABLE_V_0,
            USER_PASSWORD_CREDENTIALS_V_0,
            FAVORITES_TABLE_V_0,
            HISTORY_TABLE_V_1,
        ],
        migration: Some(|conn: &Connection| HISTORY_TABLE_V_1.create(conn)),
    },
];

const USER_COLUMNS: &str = "id, username, email, is_active, profile_image";
const FAVORITE_COLUMNS: &str =
    "id, user_id, track_id, title, artist, audio_url, cover_image, duration";
const HISTORY_COLUMNS: &str =
    "id, user_id, track_id, title, artist, audio_url, cover_image, duration, played_at";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        is_active: row.get::<_, i64>(3)? != 0,
        profile_image: row.get(4)?,
    })
}

fn favorite_from_row(row: &Row) -> rusqlite::Result<Favorite> {
    Ok(Favorite {
        id: row.get(0)?,
        user_id: row.get(1)?,
        track_id: row.get(2)?,
        title: row.get(3)?,
        artist: row.get(4)?,
        audio_url: row.get(5)?,
        cover_image: row.get(6)?,
        duration: row.get(7)?,
    })
}

fn history_from_row(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let played_at_millis: i64 = row.get(8)?;
    Ok(HistoryEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        track_id: row.get(2)?,
        title: row.get(3)?,
        artist: row.get(4)?,
        audio_url: row.get(5)?,
        cover_image: row.get(6)?,
        duration: row.get(7)?,
        played_at: DateTime::from_timestamp_millis(played_at_millis).unwrap_or_default(),
    })
}

#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, USER_VERSIONED_SCHEMAS, "user")?;
        let user_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))
            .unwrap_or(0);
        info!("Opened user db with {} users", user_count);
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn find_user(&self, column: &str, value: &dyn rusqlite::ToSql) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                &format!("SELECT {} FROM user WHERE {} = ?1", USER_COLUMNS, column),
                [value],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_favorite(conn: &Connection, user_id: i64, track_id: &str) -> Result<Option<Favorite>> {
        let favorite = conn
            .query_row(
                &format!(
                    "SELECT {} FROM favorites WHERE user_id = ?1 AND track_id = ?2",
                    FAVORITE_COLUMNS
                ),
                params![user_id, track_id],
                favorite_from_row,
            )
            .optional()?;
        Ok(favorite)
    }
}

fn upsert_credentials(conn: &Connection, credentials: &PasswordCredentials) -> Result<()> {
    conn.execute(
        "INSERT INTO user_password_credentials (user_id, salt, hash, hasher) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(user_id) DO UPDATE SET salt = excluded.salt, hash = excluded.hash, \
         hasher = excluded.hasher",
        params![
            credentials.user_id,
            credentials.salt,
            credentials.hash,
            credentials.hasher.to_string()
        ],
    )
    .with_context(|| {
        format!(
            "Failed to store password credentials of user {}",
            credentials.user_id
        )
    })?;
    Ok(())
}

/// The column named in a UNIQUE violation on the user table, if that is
/// what `err` is.
fn user_conflict(err: &rusqlite::Error) -> Option<UserConflict> {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message))
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            if message.contains("user.email") {
                Some(UserConflict::Email)
            } else if message.contains("user.username") {
                Some(UserConflict::Username)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn insert_user(conn: &Connection, username: &str, email: &str) -> Result<User> {
    if let Err(err) = conn.execute(
        "INSERT INTO user (username, email) VALUES (?1, ?2)",
        params![username, email],
    ) {
        return Err(match user_conflict(&err) {
            Some(conflict) => conflict.into(),
            None => anyhow::Error::new(err).context(format!("Failed to create user {}", username)),
        });
    }
    let id = conn.last_insert_rowid();
    debug!("Created user {} with id {}", username, id);
    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        is_active: true,
        profile_image: None,
    })
}

impl UserStore for SqliteUserStore {
    fn create_user(&self, username: &str, email: &str) -> Result<User> {
        let conn = self.conn.lock().unwrap();
        insert_user(&conn, username, email)
    }

    fn create_user_with_credentials(
        &self,
        username: &str,
        email: &str,
        mut credentials: PasswordCredentials,
    ) -> Result<User> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let user = insert_user(&tx, username, email)?;
        credentials.user_id = user.id;
        upsert_credentials(&tx, &credentials)?;
        tx.commit()?;
        Ok(user)
    }

    fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.find_user("id", &user_id)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_user("username", &username)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_user("email", &email)
    }

    fn list_users(&self, skip: usize, limit: usize) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM user ORDER BY id LIMIT ?1 OFFSET ?2",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map(params![limit as i64, skip as i64], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}

impl UserCredentialsStore for SqliteUserStore {
    fn get_password_credentials(&self, user_id: i64) -> Result<Option<PasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT salt, hash, hasher FROM user_password_credentials WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((salt, hash, hasher)) => Ok(Some(PasswordCredentials {
                user_id,
                salt,
                hash,
                hasher: hasher.parse()?,
            })),
        }
    }

    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        upsert_credentials(&conn, credentials)
    }
}

impl FavoritesStore for SqliteUserStore {
    fn list_favorites(&self, user_id: i64) -> Result<Vec<Favorite>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM favorites WHERE user_id = ?1 ORDER BY id",
            FAVORITE_COLUMNS
        ))?;
        let favorites = stmt
            .query_map(params![user_id], favorite_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(favorites)
    }

    fn add_favorite(&self, user_id: i64, favorite: FavoriteCreate) -> Result<Favorite> {
        let conn = self.conn.lock().unwrap();
        if let Some(existing) = Self::find_favorite(&conn, user_id, &favorite.track_id)? {
            return Ok(existing);
        }

        conn.execute(
            "INSERT INTO favorites (user_id, track_id, title, artist, audio_url, cover_image, duration) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                favorite.track_id,
                favorite.title,
                favorite.artist,
                favorite.audio_url,
                favorite.cover_image,
                favorite.duration
            ],
        )
        .with_context(|| format!("Failed to add favorite for user {}", user_id))?;

        Ok(Favorite {
            id: conn.last_insert_rowid(),
            user_id,
            track_id: favorite.track_id,
            title: favorite.title,
            artist: favorite.artist,
            audio_url: favorite.audio_url,
            cover_image: favorite.cover_image,
            duration: favorite.duration,
        })
    }

    fn remove_favorite(&self, user_id: i64, track_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND track_id = ?2",
            params![user_id, track_id],
        )?;
        Ok(deleted > 0)
    }
}

impl HistoryStore for SqliteUserStore {
    fn list_history(&self, user_id: i64, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM history WHERE user_id = ?1 ORDER BY played_at DESC, id DESC LIMIT ?2",
            HISTORY_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![user_id, limit as i64], history_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn add_history(&self, user_id: i64, entry: HistoryCreate) -> Result<HistoryEntry> {
        let played_at_millis = Utc::now().timestamp_millis();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO history (user_id, track_id, title, artist, audio_url, cover_image, duration, played_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user_id,
                entry.track_id,
                entry.title,
                entry.artist,
                entry.audio_url,
                entry.cover_image,
                entry.duration,
                played_at_millis
            ],
        )
        .with_context(|| format!("Failed to add history entry for user {}", user_id))?;

        Ok(HistoryEntry {
            id: conn.last_insert_rowid(),
            user_id,
            track_id: entry.track_id,
            title: entry.title,
            artist: entry.artist,
            audio_url: entry.audio_url,
            cover_image: entry.cover_image,
            duration: entry.duration,
            played_at: DateTime::from_timestamp_millis(played_at_millis).unwrap_or_default(),
        })
    }

    fn clear_history(&self, user_id: i64) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM history WHERE user_id = ?1", params![user_id])?;
        debug!("Cleared {} history entries of user {}", deleted, user_id);
        Ok(deleted)
    }
}
