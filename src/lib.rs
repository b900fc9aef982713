pub mod channels;
pub mod collect;
pub mod config;
pub mod duration;
pub mod metrics;
pub mod output;
pub mod resolve;
pub mod search;
pub mod youtube;

#[cfg(test)]
mod fake;

use serde::Serialize;

use crate::youtube::Video;

/// Canonical YouTube channel ID (`UC...`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single video with its statistics, as collected from the API
#[derive(Debug, Clone, Serialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: String,
    pub duration_seconds: u64,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub engagement_rate: f64,
}

impl VideoRecord {
    /// Build a record from a `videos.list` item, computing derived fields once.
    pub fn from_video(video: &Video) -> Self {
        let snippet = video.snippet.clone().unwrap_or_default();
        let stats = video.statistics.clone().unwrap_or_default();
        let duration = video
            .content_details
            .as_ref()
            .map(|cd| duration::parse_iso8601(&cd.duration))
            .unwrap_or(0);

        let view_count = youtube::count(&stats.view_count);
        let like_count = youtube::count(&stats.like_count);
        let comment_count = youtube::count(&stats.comment_count);

        Self {
            id: video.id.clone(),
            title: snippet.title,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            published_at: snippet.published_at,
            duration_seconds: duration,
            view_count,
            like_count,
            comment_count,
            engagement_rate: metrics::engagement_rate(view_count, like_count, comment_count),
        }
    }

    pub fn url(&self) -> String {
        watch_url(&self.id)
    }

    /// Publication date without the time component
    pub fn published_date(&self) -> &str {
        self.published_at.get(..10).unwrap_or(&self.published_at)
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
