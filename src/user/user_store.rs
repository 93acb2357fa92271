use super::auth::PasswordCredentials;
use super::user_models::{Favorite, FavoriteCreate, HistoryCreate, HistoryEntry, User};
use anyhow::Result;
use thiserror::Error;

/// Why a new user could not be inserted. Travels inside the store's
/// `anyhow::Error` and can be recovered with `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserConflict {
    #[error("Email already registered")]
    Email,
    #[error("Username already registered")]
    Username,
}

pub trait UserStore: Send + Sync {
    /// Creates a new active user and returns it.
    /// Returns a [`UserConflict`] error if the username or email is taken.
    fn create_user(&self, username: &str, email: &str) -> Result<User>;

    /// Creates the user and its password credentials atomically. The
    /// `user_id` of `credentials` is replaced by the new user's id.
    fn create_user_with_credentials(
        &self,
        username: &str,
        email: &str,
        credentials: PasswordCredentials,
    ) -> Result<User>;

    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Returns Ok(None) if no user has the given username.
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Returns Ok(None) if no user has the given email.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    fn list_users(&self, skip: usize, limit: usize) -> Result<Vec<User>>;
}

pub trait UserCredentialsStore: Send + Sync {
    /// Returns Ok(None) if the user has no password set.
    fn get_password_credentials(&self, user_id: i64) -> Result<Option<PasswordCredentials>>;

    /// Inserts or replaces the user's password credentials.
    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()>;
}

pub trait FavoritesStore: Send + Sync {
    fn list_favorites(&self, user_id: i64) -> Result<Vec<Favorite>>;

    /// Adds a favorite. If the user already has the track, the existing
    /// row is returned unchanged.
    fn add_favorite(&self, user_id: i64, favorite: FavoriteCreate) -> Result<Favorite>;

    /// Returns false if the user had no favorite with the given track id.
    fn remove_favorite(&self, user_id: i64, track_id: &str) -> Result<bool>;
}

pub trait HistoryStore: Send + Sync {
    /// Returns up to `limit` entries, most recent first.
    fn list_history(&self, user_id: i64, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Records a play at the current time.
    fn add_history(&self, user_id: i64, entry: HistoryCreate) -> Result<HistoryEntry>;

    /// Returns the number of deleted entries.
    fn clear_history(&self, user_id: i64) -> Result<usize>;
}

pub trait FullUserStore: UserStore + UserCredentialsStore + FavoritesStore + HistoryStore {}

impl<T: UserStore + UserCredentialsStore + FavoritesStore + HistoryStore> FullUserStore for T {}
