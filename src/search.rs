use std::collections::HashMap;
use std::sync::LazyLock;

use eyre::{Result, bail};
use log::{debug, info, warn};
use regex::Regex;
use serde::Serialize;

use crate::VideoRecord;
use crate::channels::ChannelEntry;
use crate::metrics::{self, OutlierTier};
use crate::youtube::{self, ChannelLookup, CommentThread, DataApi, MAX_BATCH, SearchKind, SearchQuery, Video};

/// Videos shorter than this count as shorts
pub const SHORT_VIDEO_SECS: u64 = 180;

/// Comment threads fetched per video before ranking by likes
const COMMENT_POOL: u32 = 20;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[default]
    All,
    /// Under three minutes
    Short,
    /// Three minutes or longer
    Long,
}

impl VideoType {
    pub fn accepts(&self, duration_secs: u64) -> bool {
        match self {
            VideoType::All => true,
            VideoType::Short => duration_secs < SHORT_VIDEO_SECS,
            VideoType::Long => duration_secs >= SHORT_VIDEO_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Outlier,
    Views,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub keyword: String,
    pub video_type: VideoType,
    pub sort: SortBy,
    /// Results must score strictly above this multiplier
    pub min_outlier: f64,
    pub limit: usize,
    /// Attach this many top comments to each result
    pub comments: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            video_type: VideoType::All,
            sort: SortBy::Outlier,
            min_outlier: 2.0,
            limit: 10,
            comments: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub like_count: u64,
    pub published_at: String,
}

impl Comment {
    fn from_thread(thread: CommentThread) -> Self {
        let c = thread.snippet.top_level_comment.snippet;
        Self {
            author: c.author_display_name,
            text: clean_comment_text(&c.text_display),
            like_count: c.like_count,
            published_at: c.published_at.get(..10).unwrap_or(&c.published_at).to_string(),
        }
    }
}

/// A search hit scored against its channel's average views
#[derive(Debug, Clone, Serialize)]
pub struct ScoredVideo {
    #[serde(flatten)]
    pub record: VideoRecord,
    pub outlier_multiplier: f64,
    pub tier: OutlierTier,
    pub channel_average_views: f64,
    pub thumbnail: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_comments: Option<Vec<Comment>>,
}

/// Search each channel for `options.keyword` and return the outliers.
pub async fn search<A: DataApi>(api: &A, channels: &[ChannelEntry], options: &SearchOptions) -> Result<Vec<ScoredVideo>> {
    let keyword = options.keyword.trim();
    if keyword.is_empty() {
        bail!("search keyword is empty");
    }
    if channels.is_empty() {
        bail!("no channels selected");
    }

    let averages = channel_averages(api, channels).await;

    let mut video_ids = Vec::new();
    for channel in channels {
        let query = SearchQuery {
            q: keyword,
            kind: SearchKind::Video,
            channel_id: Some(channel.id.as_str()),
            max_results: MAX_BATCH as u32,
        };
        match api.search(query).await {
            Ok(resp) => {
                let before = video_ids.len();
                video_ids.extend(resp.items.into_iter().filter_map(|r| r.id.video_id));
                debug!("{}: {} hits for {keyword:?}", channel.name, video_ids.len() - before);
            }
            Err(e) => warn!("Video search in {} failed: {e}", channel.name),
        }
    }

    if video_ids.is_empty() {
        info!("No videos found for {keyword:?} across {} channels", channels.len());
        return Ok(Vec::new());
    }

    let mut details = Vec::new();
    for chunk in video_ids.chunks(MAX_BATCH) {
        match api.videos(chunk).await {
            Ok(resp) => details.extend(resp.items),
            Err(e) => warn!("Video details for {} IDs failed: {e}", chunk.len()),
        }
    }

    let keyword_lower = keyword.to_lowercase();
    let mut results: Vec<ScoredVideo> = details
        .iter()
        .filter(|v| matches_keyword(v, &keyword_lower))
        .map(|v| score(v, &averages))
        .filter(|s| s.outlier_multiplier > options.min_outlier)
        .filter(|s| options.video_type.accepts(s.record.duration_seconds))
        .collect();

    match options.sort {
        SortBy::Outlier => results.sort_by(|a, b| b.outlier_multiplier.total_cmp(&a.outlier_multiplier)),
        SortBy::Views => results.sort_by(|a, b| b.record.view_count.cmp(&a.record.view_count)),
    }
    results.truncate(options.limit);

    if let Some(n) = options.comments {
        let total = results.len();
        for (i, result) in results.iter_mut().enumerate() {
            debug!("Fetching comments for result {} of {total}", i + 1);
            result.top_comments = Some(top_comments(api, &result.record.id, n).await);
        }
    }

    info!("{} of {} candidate videos matched {keyword:?}", results.len(), details.len());
    Ok(results)
}

/// Average views per video for each channel; zero when statistics are unavailable
pub async fn channel_averages<A: DataApi>(api: &A, channels: &[ChannelEntry]) -> HashMap<String, f64> {
    let mut averages = HashMap::new();
    for channel in channels {
        let average = match api.channels(ChannelLookup::Id(channel.id.as_str()), "statistics").await {
            Ok(resp) => resp
                .items
                .into_iter()
                .next()
                .and_then(|c| c.statistics)
                .map(|s| metrics::channel_average_views(youtube::count(&s.view_count), youtube::count(&s.video_count)))
                .unwrap_or(0.0),
            Err(e) => {
                warn!("Statistics for {} failed: {e}", channel.name);
                0.0
            }
        };
        debug!("{}: average {average:.0} views per video", channel.name);
        averages.insert(channel.id.clone(), average);
    }
    averages
}

/// Case-insensitive match against title, description or any tag
fn matches_keyword(video: &Video, keyword_lower: &str) -> bool {
    let Some(snippet) = &video.snippet else {
        return false;
    };
    snippet.title.to_lowercase().contains(keyword_lower)
        || snippet.description.to_lowercase().contains(keyword_lower)
        || snippet.tags.iter().any(|t| t.to_lowercase().contains(keyword_lower))
}

fn score(video: &Video, averages: &HashMap<String, f64>) -> ScoredVideo {
    let record = VideoRecord::from_video(video);
    let average = averages.get(&record.channel_id).copied().unwrap_or(0.0);
    let multiplier = metrics::outlier_multiplier(record.view_count, record.engagement_rate, average);
    let thumbnail = video
        .snippet
        .as_ref()
        .and_then(|s| s.thumbnails.best())
        .map(str::to_string);

    ScoredVideo {
        url: record.url(),
        record,
        outlier_multiplier: multiplier,
        tier: OutlierTier::of(multiplier),
        channel_average_views: average,
        thumbnail,
        top_comments: None,
    }
}

/// Most-liked comments for a video. Disabled comments and failures yield an empty list.
pub async fn top_comments<A: DataApi>(api: &A, video_id: &str, n: usize) -> Vec<Comment> {
    let threads = match api.comment_threads(video_id, COMMENT_POOL).await {
        Ok(resp) => resp.items,
        Err(e) => {
            warn!("Comments for {video_id} unavailable: {e}");
            return Vec::new();
        }
    };

    let mut comments: Vec<Comment> = threads.into_iter().map(Comment::from_thread).collect();
    comments.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    comments.truncate(n);
    debug!("Fetched {} comments for {video_id}", comments.len());
    comments
}

fn clean_comment_text(html: &str) -> String {
    let stripped = HTML_TAG.replace_all(html, "");
    html_escape::decode_html_entities(&stripped)
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}
