use axum::extract::FromRef;

use crate::catalog_store::CatalogStore;
use crate::deezer::{GenreAlbumService, MusicProvider};
use crate::user::UserManager;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedUserManager = Arc<UserManager>;
pub type GuardedMusicProvider = Arc<dyn MusicProvider>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub user_manager: GuardedUserManager,
    pub music_provider: GuardedMusicProvider,
    pub genre_albums: GenreAlbumService,
    pub hash: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        catalog_store: GuardedCatalogStore,
        user_manager: GuardedUserManager,
        music_provider: GuardedMusicProvider,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_store,
            user_manager,
            genre_albums: GenreAlbumService::new(music_provider.clone()),
            music_provider,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedMusicProvider {
    fn from_ref(input: &ServerState) -> Self {
        input.music_provider.clone()
    }
}

impl FromRef<ServerState> for GenreAlbumService {
    fn from_ref(input: &ServerState) -> Self {
        input.genre_albums.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
