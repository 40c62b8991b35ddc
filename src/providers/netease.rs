use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::lyrics::TrackSet;
use crate::providers::{LyricProvider, SongId};

/// NetEase Cloud Music client
#[derive(Debug, Clone)]
pub struct Netease {
    /// HTTP client for making requests
    client: Client,
    /// Search endpoint (form POST)
    search_endpoint: String,
    /// Lyric endpoint (GET)
    lyric_endpoint: String,
    /// User-Agent header value
    user_agent: String,
    /// Referer header value for searches
    referer: String,
}

/// Search response body
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub songs: Vec<SearchSong>,
}

#[derive(Debug, Deserialize)]
pub struct SearchSong {
    pub id: SongId,
}

/// Lyric response body; every track is optional
#[derive(Debug, Deserialize)]
pub struct LyricResponse {
    #[serde(default)]
    pub lrc: Option<LyricBlob>,
    #[serde(default)]
    pub tlyric: Option<LyricBlob>,
    #[serde(default)]
    pub romalrc: Option<LyricBlob>,
    #[serde(default)]
    pub yrc: Option<LyricBlob>,
}

#[derive(Debug, Deserialize)]
pub struct LyricBlob {
    #[serde(default)]
    pub lyric: Option<String>,
}

impl LyricResponse {
    pub fn into_tracks(self) -> TrackSet {
        let text = |blob: Option<LyricBlob>| blob.and_then(|b| b.lyric);
        TrackSet {
            plain: text(self.lrc),
            translation: text(self.tlyric),
            romanization: text(self.romalrc),
            word_level: text(self.yrc),
        }
    }
}

/// Top song id of a search response body
pub fn parse_search_response(body: &str) -> Result<Option<SongId>, ProviderError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("search response: {}", e)))?;

    Ok(response
        .result
        .and_then(|result| result.songs.into_iter().next())
        .map(|song| song.id))
}

/// Song id for a search reply; a rejected search counts as a miss
pub fn search_outcome(status: StatusCode, body: &str) -> Result<Option<SongId>, ProviderError> {
    if !status.is_success() {
        warn!("NetEase search rejected with status {}", status);
        return Ok(None);
    }

    parse_search_response(body)
}

/// Tracks of a lyric response body
pub fn parse_lyric_response(body: &str) -> Result<TrackSet, ProviderError> {
    let response: LyricResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("lyric response: {}", e)))?;

    Ok(response.into_tracks())
}

impl Netease {
    /// Create a client from provider settings
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout * 2)
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            search_endpoint: config.search_endpoint.clone(),
            lyric_endpoint: config.lyric_endpoint.clone(),
            user_agent: config.user_agent.clone(),
            referer: config.referer.clone(),
        })
    }

    async fn read_body(response: Response) -> Result<String, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl LyricProvider for Netease {
    fn name(&self) -> &str {
        "netease"
    }

    async fn search(&self, keyword: &str) -> Result<Option<SongId>, ProviderError> {
        debug!("Searching NetEase for '{}'", keyword);

        let response = self.client
            .post(&self.search_endpoint)
            .header(USER_AGENT, self.user_agent.as_str())
            .header(REFERER, self.referer.as_str())
            .form(&[("s", keyword), ("type", "1"), ("offset", "0"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        search_outcome(status, &body)
    }

    async fn fetch_tracks(&self, song_id: SongId) -> Result<TrackSet, ProviderError> {
        debug!("Fetching NetEase lyrics for song {}", song_id);

        let response = self.client
            .get(&self.lyric_endpoint)
            .header(USER_AGENT, self.user_agent.as_str())
            .query(&[
                ("id", song_id.to_string()),
                ("lv", "1".to_string()),
                ("tv", "-1".to_string()),
                ("rv", "-1".to_string()),
                ("yv", "1".to_string()),
            ])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        parse_lyric_response(&body)
    }
}
