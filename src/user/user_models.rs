use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserLogin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: String) -> Self {
        AccessToken {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// A provider track bookmarked by a user. `track_id` is the provider's id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub track_id: String,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub cover_image: String,
    pub duration: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteCreate {
    pub track_id: String,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub cover_image: String,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub track_id: String,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub cover_image: Option<String>,
    pub duration: i64,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryCreate {
    pub track_id: String,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub duration: i64,
}
