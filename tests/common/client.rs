//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client. Sessions travel either in the cookie set by login or,
/// when a token is set, in the `Authorization` header.
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    /// Sent as a bearer token when set
    pub token: Option<String>,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Creates a client logged in as the test user through the session cookie
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        Self::authenticated_as(base_url, TEST_USER, TEST_PASS).await
    }

    pub async fn authenticated_as(base_url: String, username: &str, password: &str) -> Self {
        let client = Self::new(base_url);

        let response = client.login(username, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Authentication of {} failed: {:?}",
            username,
            response.text().await
        );

        client
    }

    /// Creates a cookie-less client that sends the test user's access token
    /// in the `Authorization` header
    pub async fn with_bearer_token(base_url: String) -> Self {
        let login_client = Self::new(base_url.clone());
        let body = login_client.login(TEST_USER, TEST_PASS).await.json::<Value>().await;
        let token = body
            .expect("Login response is not JSON")["access_token"]
            .as_str()
            .expect("Login response has no access_token")
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");
        Self {
            client,
            base_url,
            token: Some(token),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Response {
        builder
            .send()
            .await
            .unwrap_or_else(|err| panic!("{} request failed: {}", what, err))
    }

    /// GET an arbitrary path
    pub async fn get_path(&self, path: &str) -> Response {
        self.send(self.request(Method::GET, path), path).await
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// POST /api/login
    pub async fn login(&self, username: &str, password: &str) -> Response {
        let builder = self
            .request(Method::POST, "/api/login")
            .json(&json!({ "username": username, "password": password }));
        self.send(builder, "Login").await
    }

    /// POST /api/users
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Response {
        let builder = self.request(Method::POST, "/api/users").json(&json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        self.send(builder, "Register").await
    }

    /// GET /api/users
    pub async fn list_users(&self, skip: usize, limit: usize) -> Response {
        let path = format!("/api/users?skip={}&limit={}", skip, limit);
        self.send(self.request(Method::GET, &path), "List users").await
    }

    /// GET /api/users/{id}
    pub async fn get_user(&self, id: i64) -> Response {
        let path = format!("/api/users/{}", id);
        self.send(self.request(Method::GET, &path), "Get user").await
    }

    // ========================================================================
    // Local Catalog
    // ========================================================================

    /// GET /api/tracks
    pub async fn list_tracks(&self, skip: usize, limit: usize) -> Response {
        let path = format!("/api/tracks?skip={}&limit={}", skip, limit);
        self.send(self.request(Method::GET, &path), "List tracks").await
    }

    /// GET /api/tracks/{id}
    pub async fn get_track(&self, id: i64) -> Response {
        let path = format!("/api/tracks/{}", id);
        self.send(self.request(Method::GET, &path), "Get track").await
    }

    /// POST /api/tracks
    pub async fn create_track(&self, body: Value) -> Response {
        let builder = self.request(Method::POST, "/api/tracks").json(&body);
        self.send(builder, "Create track").await
    }

    /// DELETE /api/tracks/{id}
    pub async fn delete_track(&self, id: i64) -> Response {
        let path = format!("/api/tracks/{}", id);
        self.send(self.request(Method::DELETE, &path), "Delete track")
            .await
    }

    /// GET /api/albums
    pub async fn list_albums(&self, skip: usize, limit: usize) -> Response {
        let path = format!("/api/albums?skip={}&limit={}", skip, limit);
        self.send(self.request(Method::GET, &path), "List albums").await
    }

    /// GET /api/albums/{id}
    pub async fn get_album(&self, id: i64) -> Response {
        let path = format!("/api/albums/{}", id);
        self.send(self.request(Method::GET, &path), "Get album").await
    }

    /// POST /api/albums
    pub async fn create_album(&self, body: Value) -> Response {
        let builder = self.request(Method::POST, "/api/albums").json(&body);
        self.send(builder, "Create album").await
    }

    /// DELETE /api/albums/{id}
    pub async fn delete_album(&self, id: i64) -> Response {
        let path = format!("/api/albums/{}", id);
        self.send(self.request(Method::DELETE, &path), "Delete album")
            .await
    }

    /// GET /api/search?q=
    pub async fn search(&self, query: &str) -> Response {
        let builder = self
            .request(Method::GET, "/api/search")
            .query(&[("q", query)]);
        self.send(builder, "Search").await
    }

    // ========================================================================
    // Favorites and History
    // ========================================================================

    /// GET {prefix}/favorites, prefix being "/api" or ""
    pub async fn get_favorites_at(&self, prefix: &str) -> Response {
        let path = format!("{}/favorites", prefix);
        self.send(self.request(Method::GET, &path), "Get favorites")
            .await
    }

    /// GET /api/favorites
    pub async fn get_favorites(&self) -> Response {
        self.get_favorites_at("/api").await
    }

    /// POST /api/favorites
    pub async fn add_favorite(&self, track_id: &str, title: &str) -> Response {
        let builder = self.request(Method::POST, "/api/favorites").json(&json!({
            "track_id": track_id,
            "title": title,
            "artist": "Some Artist",
            "audio_url": format!("https://cdn.example.com/preview/{}.mp3", track_id),
            "cover_image": format!("https://cdn.example.com/cover/{}.jpg", track_id),
            "duration": 30,
        }));
        self.send(builder, "Add favorite").await
    }

    /// DELETE /api/favorites/{track_id}
    pub async fn remove_favorite(&self, track_id: &str) -> Response {
        let path = format!("/api/favorites/{}", track_id);
        self.send(self.request(Method::DELETE, &path), "Remove favorite")
            .await
    }

    /// GET /api/history
    pub async fn get_history(&self) -> Response {
        self.send(self.request(Method::GET, "/api/history"), "Get history")
            .await
    }

    /// POST /api/history
    pub async fn add_history(&self, track_id: &str, title: &str) -> Response {
        let builder = self.request(Method::POST, "/api/history").json(&json!({
            "track_id": track_id,
            "title": title,
            "artist": "Some Artist",
            "audio_url": format!("https://cdn.example.com/preview/{}.mp3", track_id),
            "duration": 30,
        }));
        self.send(builder, "Add history").await
    }

    /// DELETE /api/history
    pub async fn clear_history(&self) -> Response {
        self.send(self.request(Method::DELETE, "/api/history"), "Clear history")
            .await
    }

    // ========================================================================
    // Upstream Proxy
    // ========================================================================

    /// GET /api/deezer/tracks?limit=
    pub async fn deezer_chart(&self, limit: Option<usize>) -> Response {
        let mut builder = self.request(Method::GET, "/api/deezer/tracks");
        if let Some(limit) = limit {
            builder = builder.query(&[("limit", limit)]);
        }
        self.send(builder, "Deezer chart").await
    }

    /// GET /api/deezer/tracks/{id}
    pub async fn deezer_track(&self, id: i64) -> Response {
        let path = format!("/api/deezer/tracks/{}", id);
        self.send(self.request(Method::GET, &path), "Deezer track")
            .await
    }

    /// GET /api/deezer/albums/{id}
    pub async fn deezer_album(&self, id: i64) -> Response {
        let path = format!("/api/deezer/albums/{}", id);
        self.send(self.request(Method::GET, &path), "Deezer album")
            .await
    }

    /// GET /api/deezer/search?q=
    pub async fn deezer_search(&self, query: &str) -> Response {
        let builder = self
            .request(Method::GET, "/api/deezer/search")
            .query(&[("q", query)]);
        self.send(builder, "Deezer search").await
    }

    /// GET /api/deezer/genres
    pub async fn deezer_genres(&self) -> Response {
        self.send(self.request(Method::GET, "/api/deezer/genres"), "Deezer genres")
            .await
    }

    /// GET /api/deezer/genre/{genre_name}/albums?limit=
    pub async fn deezer_genre_albums(&self, genre_name: &str, limit: usize) -> Response {
        let path = format!("/api/deezer/genre/{}/albums", genre_name);
        let builder = self
            .request(Method::GET, &path)
            .query(&[("limit", limit)]);
        self.send(builder, "Deezer genre albums").await
    }

    /// GET /api/deezer/custom-albums?genre=&limit=
    pub async fn deezer_custom_albums(&self, genre: Option<&str>, limit: usize) -> Response {
        let mut builder = self
            .request(Method::GET, "/api/deezer/custom-albums")
            .query(&[("limit", limit)]);
        if let Some(genre) = genre {
            builder = builder.query(&[("genre", genre)]);
        }
        self.send(builder, "Deezer custom albums").await
    }
}
