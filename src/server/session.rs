use super::response::ApiError;
use super::state::ServerState;
use crate::user::User;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

/// The authenticated user of a request.
#[derive(Debug)]
pub struct Session {
    pub user: User,
}

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

fn extract_session_token_from_headers(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(HEADER_SESSION_TOKEN_KEY)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn extract_session_token_from_cookies(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(|cookie| cookie.value().to_string())
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token_from_headers(parts)
            .or_else(|| extract_session_token_from_cookies(parts))
            .ok_or_else(|| {
                debug!("No token in headers nor cookies.");
                ApiError::Unauthorized("Not authenticated".to_string())
            })?;

        match ctx.user_manager.user_from_token(&token)? {
            Some(user) if user.is_active => Ok(Session { user }),
            Some(user) => {
                debug!("Rejected token of inactive user {}", user.username);
                Err(ApiError::Unauthorized("Inactive user".to_string()))
            }
            None => Err(ApiError::Unauthorized(
                "Could not validate credentials".to_string(),
            )),
        }
    }
}
