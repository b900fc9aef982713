//! In-memory `DataApi` for unit tests. Records every call by endpoint name.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use eyre::{Result, bail};

use crate::youtube::*;

#[derive(Default)]
pub struct FakeApi {
    /// legacy username -> channel ID
    pub usernames: HashMap<String, String>,
    /// channel search query -> channel ID
    pub channel_hits: HashMap<String, String>,
    /// channel ID -> channel resource
    pub channels: HashMap<String, Channel>,
    /// pages of the single uploads playlist
    pub pages: Vec<Vec<String>>,
    /// video ID -> video resource
    pub videos: HashMap<String, Video>,
    /// channel ID -> video IDs returned by a keyword search
    pub video_hits: HashMap<String, Vec<String>>,
    /// video ID -> comment threads
    pub comments: HashMap<String, Vec<CommentThread>>,
    /// endpoints that respond with an error
    pub failing: HashSet<&'static str>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeApi {
    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == endpoint).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, endpoint: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(endpoint);
        if self.failing.contains(endpoint) {
            bail!("{endpoint} returned 403 Forbidden");
        }
        Ok(())
    }

    /// Install `pages` as the uploads playlist, registering a qualifying video for every ID
    pub fn with_pages(mut self, pages: Vec<Vec<String>>, duration: &str) -> Self {
        for id in pages.iter().flatten() {
            self.videos.insert(id.clone(), video(id, duration, 100, 1, 1));
        }
        self.pages = pages;
        self
    }
}

pub fn video(id: &str, duration: &str, views: u64, likes: u64, comments: u64) -> Video {
    Video {
        id: id.to_string(),
        snippet: Some(VideoSnippet {
            title: format!("Video {id}"),
            channel_id: "UCchannel".to_string(),
            channel_title: "Channel".to_string(),
            published_at: "2024-01-15T08:00:00Z".to_string(),
            ..Default::default()
        }),
        statistics: Some(VideoStatistics {
            view_count: Some(views.to_string()),
            like_count: Some(likes.to_string()),
            comment_count: Some(comments.to_string()),
        }),
        content_details: Some(VideoContentDetails {
            duration: duration.to_string(),
        }),
    }
}

pub fn channel(id: &str, views: u64, videos: u64, uploads: Option<&str>) -> Channel {
    Channel {
        id: id.to_string(),
        statistics: Some(ChannelStatistics {
            view_count: Some(views.to_string()),
            video_count: Some(videos.to_string()),
        }),
        content_details: Some(ChannelContentDetails {
            related_playlists: Some(RelatedPlaylists {
                uploads: uploads.map(str::to_string),
            }),
        }),
    }
}

pub fn comment(author: &str, text: &str, likes: u64) -> CommentThread {
    CommentThread {
        snippet: CommentThreadSnippet {
            top_level_comment: TopLevelComment {
                snippet: CommentSnippet {
                    author_display_name: author.to_string(),
                    text_display: text.to_string(),
                    like_count: likes,
                    published_at: "2024-02-01T09:30:00Z".to_string(),
                },
            },
        },
    }
}

pub fn ids(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

fn list<T>(items: Vec<T>, next_page_token: Option<String>) -> ListResponse<T> {
    ListResponse { items, next_page_token }
}

impl DataApi for FakeApi {
    async fn channels(&self, lookup: ChannelLookup<'_>, _part: &str) -> Result<ListResponse<Channel>> {
        self.record("channels")?;
        let found = match lookup {
            ChannelLookup::Id(id) => self.channels.get(id).cloned(),
            ChannelLookup::Username(name) => self.usernames.get(name).map(|id| Channel {
                id: id.clone(),
                ..Default::default()
            }),
        };
        Ok(list(found.into_iter().collect(), None))
    }

    async fn search(&self, query: SearchQuery<'_>) -> Result<ListResponse<SearchResult>> {
        self.record("search")?;
        let items = match query.kind {
            SearchKind::Channel => self
                .channel_hits
                .get(query.q)
                .map(|id| SearchResult {
                    id: SearchResultId {
                        channel_id: Some(id.clone()),
                        ..Default::default()
                    },
                    snippet: None,
                })
                .into_iter()
                .collect(),
            SearchKind::Video => query
                .channel_id
                .and_then(|c| self.video_hits.get(c))
                .map(|ids| {
                    ids.iter()
                        .map(|id| SearchResult {
                            id: SearchResultId {
                                video_id: Some(id.clone()),
                                ..Default::default()
                            },
                            snippet: None,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        };
        Ok(list(items, None))
    }

    async fn playlist_items(&self, _playlist_id: &str, page_token: Option<&str>) -> Result<ListResponse<PlaylistItem>> {
        self.record("playlistItems")?;
        let index: usize = page_token.and_then(|t| t.strip_prefix("page-")?.parse().ok()).unwrap_or(0);
        let items = self
            .pages
            .get(index)
            .map(|ids| {
                ids.iter()
                    .map(|id| PlaylistItem {
                        content_details: Some(PlaylistItemContentDetails { video_id: id.clone() }),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(list(items, next))
    }

    async fn videos(&self, ids: &[String]) -> Result<ListResponse<Video>> {
        self.record("videos")?;
        assert!(ids.len() <= MAX_BATCH, "batch of {} exceeds the API limit", ids.len());
        let items = ids.iter().filter_map(|id| self.videos.get(id).cloned()).collect();
        Ok(list(items, None))
    }

    async fn comment_threads(&self, video_id: &str, max_results: u32) -> Result<ListResponse<CommentThread>> {
        self.record("commentThreads")?;
        let items = self
            .comments
            .get(video_id)
            .map(|c| c.iter().take(max_results as usize).cloned().collect())
            .unwrap_or_default();
        Ok(list(items, None))
    }
}
