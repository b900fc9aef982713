use eyre::{Result, bail, eyre};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;

/// Maximum number of IDs `videos.list` accepts in one call, and the largest page size
pub const MAX_BATCH: usize = 50;

/// Envelope shared by every `*.list` endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default)]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub statistics: Option<ChannelStatistics>,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub view_count: Option<String>,
    pub video_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: Option<SearchSnippet>,
}

impl SearchResult {
    pub fn channel_id(&self) -> Option<&str> {
        self.id
            .channel_id
            .as_deref()
            .or_else(|| self.snippet.as_ref().and_then(|s| s.channel_id.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub content_details: Option<PlaylistItemContentDetails>,
}

impl PlaylistItem {
    pub fn video_id(self) -> Option<String> {
        self.content_details.map(|cd| cd.video_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<VideoStatistics>,
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: String,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub high: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Best available thumbnail URL, preferring the high resolution one
    pub fn best(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoContentDetails {
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentSnippet {
    pub author_display_name: String,
    pub text_display: String,
    pub like_count: u64,
    pub published_at: String,
}

/// Counts arrive as decimal strings; absent or unparsable counts are zero.
pub fn count(value: &Option<String>) -> u64 {
    value.as_deref().and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// How to look a channel up in `channels.list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLookup<'a> {
    Id(&'a str),
    Username(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Channel,
    Video,
}

impl SearchKind {
    fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Channel => "channel",
            SearchKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    pub q: &'a str,
    pub kind: SearchKind,
    pub channel_id: Option<&'a str>,
    pub max_results: u32,
}

/// The subset of the YouTube Data API v3 this tool consumes.
///
/// Every method issues exactly one request. Non-2xx statuses and transport
/// failures (including timeouts) come back as `Err`.
#[allow(async_fn_in_trait)]
pub trait DataApi {
    async fn channels(&self, lookup: ChannelLookup<'_>, part: &str) -> Result<ListResponse<Channel>>;

    async fn search(&self, query: SearchQuery<'_>) -> Result<ListResponse<SearchResult>>;

    async fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>) -> Result<ListResponse<PlaylistItem>>;

    /// Batch lookup of up to [`MAX_BATCH`] videos by ID
    async fn videos(&self, ids: &[String]) -> Result<ListResponse<Video>>;

    async fn comment_threads(&self, video_id: &str, max_results: u32) -> Result<ListResponse<CommentThread>>;
}

/// reqwest-backed client for the YouTube Data API
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{resource}", self.config.base_url.trim_end_matches('/'));
        debug!("GET {url} {params:?}");

        // Request URLs carry the API key; strip them from every error before it is logged
        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| eyre!("YouTube API {resource} request failed: {}", e.without_url()))?;

        resp.json()
            .await
            .map_err(|e| eyre!("YouTube API {resource} response unreadable: {}", e.without_url()))
    }
}

impl DataApi for ApiClient {
    async fn channels(&self, lookup: ChannelLookup<'_>, part: &str) -> Result<ListResponse<Channel>> {
        let filter = match lookup {
            ChannelLookup::Id(id) => ("id", id),
            ChannelLookup::Username(name) => ("forUsername", name),
        };
        self.get("channels", &[("part", part), filter]).await
    }

    async fn search(&self, query: SearchQuery<'_>) -> Result<ListResponse<SearchResult>> {
        let max_results = query.max_results.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("type", query.kind.as_str()),
            ("q", query.q),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(channel_id) = query.channel_id {
            params.push(("channelId", channel_id));
        }
        self.get("search", &params).await
    }

    async fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>) -> Result<ListResponse<PlaylistItem>> {
        let max_results = MAX_BATCH.to_string();
        let mut params = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        self.get("playlistItems", &params).await
    }

    async fn videos(&self, ids: &[String]) -> Result<ListResponse<Video>> {
        if ids.len() > MAX_BATCH {
            bail!("videos.list accepts at most {MAX_BATCH} IDs, got {}", ids.len());
        }
        let ids = ids.join(",");
        self.get(
            "videos",
            &[("part", "snippet,statistics,contentDetails"), ("id", ids.as_str())],
        )
        .await
    }

    async fn comment_threads(&self, video_id: &str, max_results: u32) -> Result<ListResponse<CommentThread>> {
        let max_results = max_results.to_string();
        self.get(
            "commentThreads",
            &[
                ("part", "snippet"),
                ("videoId", video_id),
                ("order", "relevance"),
                ("maxResults", max_results.as_str()),
            ],
        )
        .await
    }
}
