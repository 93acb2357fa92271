//! Accounts, login, and the per-user favorites and listening history.

use super::catalog_routes::Pagination;
use super::response::ApiError;
use super::session::{Session, COOKIE_SESSION_TOKEN_KEY};
use super::state::{GuardedUserManager, ServerState};
use crate::user::{
    AccessToken, Favorite, FavoriteCreate, HistoryCreate, HistoryEntry, User, UserCreate,
    UserLogin,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, info};

async fn create_user(
    State(user_manager): State<GuardedUserManager>,
    body: Result<Json<UserCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(user) = body?;
    let created = user_manager.register(user)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_users(
    State(user_manager): State<GuardedUserManager>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<User>>, ApiError> {
    let Query(pagination) = pagination?;
    Ok(Json(
        user_manager.list_users(pagination.skip, pagination.limit)?,
    ))
}

async fn get_user(
    State(user_manager): State<GuardedUserManager>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    user_manager
        .get_user(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("User"))
}

async fn login(
    State(user_manager): State<GuardedUserManager>,
    jar: CookieJar,
    body: Result<Json<UserLogin>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    debug!("login() called for {}", body.username);
    let token = user_manager
        .login(&body.username, &body.password)?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect username or password".to_string()))?;
    info!("User {} logged in", body.username);

    let cookie = Cookie::build((COOKIE_SESSION_TOKEN_KEY, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(AccessToken::bearer(token))))
}

async fn get_favorites(
    State(user_manager): State<GuardedUserManager>,
    session: Session,
) -> Result<Json<Vec<Favorite>>, ApiError> {
    Ok(Json(user_manager.get_favorites(session.user.id)?))
}

async fn add_favorite(
    State(user_manager): State<GuardedUserManager>,
    session: Session,
    body: Result<Json<FavoriteCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(favorite) = body?;
    let favorite = user_manager.add_favorite(session.user.id, favorite)?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

async fn remove_favorite(
    State(user_manager): State<GuardedUserManager>,
    session: Session,
    Path(track_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if user_manager.remove_favorite(session.user.id, &track_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Favorite"))
    }
}

async fn get_history(
    State(user_manager): State<GuardedUserManager>,
    session: Session,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(user_manager.get_history(session.user.id)?))
}

async fn add_history(
    State(user_manager): State<GuardedUserManager>,
    session: Session,
    body: Result<Json<HistoryCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(entry) = body?;
    let entry = user_manager.add_history(session.user.id, entry)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn clear_history(
    State(user_manager): State<GuardedUserManager>,
    session: Session,
) -> Result<StatusCode, ApiError> {
    let cleared = user_manager.clear_history(session.user.id)?;
    debug!(
        "Cleared {} history entries of {}",
        cleared, session.user.username
    );
    Ok(StatusCode::NO_CONTENT)
}

pub fn make_account_routes(state: ServerState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/login", post(login))
        .with_state(state)
}

/// Favorites and history. Mounted both under `/api` and at the root.
pub fn make_user_content_routes(state: ServerState) -> Router {
    Router::new()
        .route("/favorites", get(get_favorites).post(add_favorite))
        .route("/favorites/{track_id}", delete(remove_favorite))
        .route(
            "/history",
            get(get_history).post(add_history).delete(clear_history),
        )
        .with_state(state)
}
