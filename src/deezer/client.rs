//! HTTP client for the upstream music catalog.

use super::error::UpstreamError;
use super::models::UpstreamTrack;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_DEEZER_BASE_URL: &str = "https://api.deezer.com";

/// The provider endpoints we consume. Implemented by [`DeezerClient`] and by
/// in-memory fakes in tests.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    async fn chart_tracks(&self, limit: usize) -> Result<Vec<Value>, UpstreamError>;

    async fn track(&self, id: i64) -> Result<Value, UpstreamError>;

    async fn album(&self, id: i64) -> Result<Value, UpstreamError>;

    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Value>, UpstreamError>;

    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<Value>, UpstreamError>;

    /// Tracks of the radio for a genre. Genre id 0 is the provider's
    /// "no genre" radio.
    async fn radio_tracks(
        &self,
        genre_id: i64,
        limit: usize,
    ) -> Result<Vec<UpstreamTrack>, UpstreamError>;
}

pub struct DeezerClient {
    client: reqwest::Client,
    base_url: String,
}

/// Extracts the `data` array of a listing response, empty when absent.
fn data_items(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => vec![],
        },
        _ => vec![],
    }
}

impl DeezerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl MusicProvider for DeezerClient {
    async fn chart_tracks(&self, limit: usize) -> Result<Vec<Value>, UpstreamError> {
        let body = self
            .get_json("/chart/0/tracks", &[("limit", limit.to_string())])
            .await?;
        Ok(data_items(body))
    }

    async fn track(&self, id: i64) -> Result<Value, UpstreamError> {
        self.get_json(&format!("/track/{}", id), &[]).await
    }

    async fn album(&self, id: i64) -> Result<Value, UpstreamError> {
        self.get_json(&format!("/album/{}", id), &[]).await
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Value>, UpstreamError> {
        let body = self
            .get_json(
                "/search",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(data_items(body))
    }

    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<Value>, UpstreamError> {
        let body = self
            .get_json(
                "/search/album",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(data_items(body))
    }

    async fn radio_tracks(
        &self,
        genre_id: i64,
        limit: usize,
    ) -> Result<Vec<UpstreamTrack>, UpstreamError> {
        let body = self
            .get_json(
                &format!("/radio/{}/tracks", genre_id),
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(radio_track_items(body))
    }
}

/// Decodes the tracks of a radio listing. Tracks that cannot be read at all
/// are skipped.
fn radio_track_items(body: Value) -> Vec<UpstreamTrack> {
    data_items(body)
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<UpstreamTrack>(item) {
            Ok(track) => Some(track),
            Err(err) => {
                warn!("Skipping unreadable radio track: {}", err);
                None
            }
        })
        .collect()
}
