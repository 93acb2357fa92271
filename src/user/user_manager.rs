use super::auth::{PasswordCredentials, TokenSigner};
use super::user_models::{
    Favorite, FavoriteCreate, HistoryCreate, HistoryEntry, User, UserCreate,
};
use super::user_store::{FullUserStore, UserConflict};
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// How many history entries are returned, most recent first.
pub const HISTORY_PAGE_SIZE: usize = 50;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct UserManager {
    user_store: Arc<dyn FullUserStore>,
    token_signer: TokenSigner,
}

impl UserManager {
    pub fn new(user_store: Arc<dyn FullUserStore>, token_signer: TokenSigner) -> Self {
        Self {
            user_store,
            token_signer,
        }
    }

    pub fn register(&self, user: UserCreate) -> Result<User, RegistrationError> {
        let username = user.username.trim();
        let email = user.email.trim();

        if username.is_empty() {
            return Err(RegistrationError::Invalid(
                "The username cannot be empty".to_string(),
            ));
        }
        if !EMAIL_REGEX.is_match(email) {
            return Err(RegistrationError::Invalid(format!(
                "Invalid email address: {}",
                email
            )));
        }
        if user.password.is_empty() {
            return Err(RegistrationError::Invalid(
                "The password cannot be empty".to_string(),
            ));
        }
        if self.user_store.get_user_by_email(email)?.is_some() {
            return Err(RegistrationError::Invalid(
                "Email already registered".to_string(),
            ));
        }
        if self.user_store.get_user_by_username(username)?.is_some() {
            return Err(RegistrationError::Invalid(
                "Username already registered".to_string(),
            ));
        }

        let credentials = PasswordCredentials::new(0, &user.password)?;
        let created = self
            .user_store
            .create_user_with_credentials(username, email, credentials)
            .map_err(|err| match err.downcast::<UserConflict>() {
                Ok(conflict) => RegistrationError::Invalid(conflict.to_string()),
                Err(err) => RegistrationError::Internal(err),
            })?;
        info!("Registered user {} ({})", created.username, created.id);
        Ok(created)
    }

    /// Returns a signed access token if the username and password match.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<String>> {
        let Some(user) = self.user_store.get_user_by_username(username)? else {
            debug!("Login attempt for unknown user {}", username);
            return Ok(None);
        };
        let Some(credentials) = self.user_store.get_password_credentials(user.id)? else {
            debug!("Login attempt for user {} without password", username);
            return Ok(None);
        };
        if !credentials.matches(password)? {
            debug!("Wrong password for user {}", username);
            return Ok(None);
        }
        self.issue_token(&user.username).map(Some)
    }

    pub fn issue_token(&self, username: &str) -> Result<String> {
        self.token_signer.issue(username)
    }

    /// Resolves a token to its user. Returns Ok(None) for invalid or expired
    /// tokens and for tokens of users that no longer exist.
    pub fn user_from_token(&self, token: &str) -> Result<Option<User>> {
        let username = match self.token_signer.verify(token) {
            Ok(username) => username,
            Err(err) => {
                debug!("Rejected token: {:#}", err);
                return Ok(None);
            }
        };
        self.user_store.get_user_by_username(&username)
    }

    pub fn set_password(&self, username: &str, password: &str) -> Result<()> {
        let user = self
            .user_store
            .get_user_by_username(username)?
            .with_context(|| format!("User {} not found.", username))?;
        let credentials = PasswordCredentials::new(user.id, password)?;
        self.user_store.set_password_credentials(&credentials)
    }

    pub fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.user_store.get_user(user_id)
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_store.get_user_by_username(username)
    }

    pub fn list_users(&self, skip: usize, limit: usize) -> Result<Vec<User>> {
        self.user_store.list_users(skip, limit)
    }

    pub fn get_favorites(&self, user_id: i64) -> Result<Vec<Favorite>> {
        self.user_store.list_favorites(user_id)
    }

    pub fn add_favorite(&self, user_id: i64, favorite: FavoriteCreate) -> Result<Favorite> {
        self.user_store.add_favorite(user_id, favorite)
    }

    pub fn remove_favorite(&self, user_id: i64, track_id: &str) -> Result<bool> {
        self.user_store.remove_favorite(user_id, track_id)
    }

    pub fn get_history(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        self.user_store.list_history(user_id, HISTORY_PAGE_SIZE)
    }

    pub fn add_history(&self, user_id: i64, entry: HistoryCreate) -> Result<HistoryEntry> {
        self.user_store.add_history(user_id, entry)
    }

    pub fn clear_history(&self, user_id: i64) -> Result<usize> {
        self.user_store.clear_history(user_id)
    }
}
