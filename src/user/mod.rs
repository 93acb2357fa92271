pub mod auth;
mod sqlite_user_store;
mod user_manager;
pub mod user_models;
mod user_store;

pub use auth::{PasswordCredentials, PlaypodHasher, TokenSigner};
pub use sqlite_user_store::{SqliteUserStore, USER_VERSIONED_SCHEMAS};
pub use user_manager::{RegistrationError, UserManager, HISTORY_PAGE_SIZE};
pub use user_models::{
    AccessToken, Favorite, FavoriteCreate, HistoryCreate, HistoryEntry, User, UserCreate,
    UserLogin,
};
pub use user_store::{
    FavoritesStore, FullUserStore, HistoryStore, UserConflict, UserCredentialsStore, UserStore,
};
