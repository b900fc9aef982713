use log::{debug, info, warn};

use crate::youtube::{ChannelLookup, DataApi, PlaylistItem};
use crate::{ChannelId, VideoRecord};

/// Look up the generated "uploads" playlist for a channel
pub async fn uploads_playlist_id<A: DataApi>(api: &A, channel: &ChannelId) -> Option<String> {
    let resp = match api.channels(ChannelLookup::Id(channel.as_str()), "contentDetails").await {
        Ok(resp) => resp,
        Err(e) => {
            warn!("Uploads lookup for {channel} failed: {e}");
            return None;
        }
    };

    resp.items
        .into_iter()
        .next()
        .and_then(|c| c.content_details)
        .and_then(|cd| cd.related_playlists)
        .and_then(|rp| rp.uploads)
        .filter(|id| !id.is_empty())
}

/// Lazy, finite walk over a playlist, one page per request.
///
/// Ends after a page without a continuation cursor, an empty page, or a
/// failed request. Once ended it issues no further requests.
pub struct UploadPages<'a, A> {
    api: &'a A,
    playlist_id: String,
    cursor: Option<String>,
    done: bool,
    pages_fetched: usize,
}

impl<'a, A: DataApi> UploadPages<'a, A> {
    pub fn new(api: &'a A, playlist_id: impl Into<String>) -> Self {
        Self {
            api,
            playlist_id: playlist_id.into(),
            cursor: None,
            done: false,
            pages_fetched: 0,
        }
    }

    /// Video IDs of the next page, or `None` once the playlist is exhausted
    pub async fn next_page(&mut self) -> Option<Vec<String>> {
        if self.done {
            return None;
        }

        let resp = match self.api.playlist_items(&self.playlist_id, self.cursor.as_deref()).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Playlist page {} of {} failed: {e}", self.pages_fetched + 1, self.playlist_id);
                self.done = true;
                return None;
            }
        };
        self.pages_fetched += 1;

        self.cursor = resp.next_page_token;
        if self.cursor.is_none() {
            self.done = true;
        }

        let ids: Vec<String> = resp.items.into_iter().filter_map(PlaylistItem::video_id).collect();
        debug!("Playlist page {} of {}: {} items", self.pages_fetched, self.playlist_id, ids.len());

        if ids.is_empty() {
            self.done = true;
            return None;
        }
        Some(ids)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

/// Collect up to `cap` videos from a playlist that are strictly shorter than
/// `max_duration_secs`.
///
/// Stops at the first failed page or batch request and returns what was
/// gathered before it. Stops mid-page once `cap` is reached.
pub async fn collect<A: DataApi>(api: &A, playlist_id: &str, max_duration_secs: u64, cap: usize) -> Vec<VideoRecord> {
    let mut records = Vec::new();
    if cap == 0 {
        return records;
    }

    let mut pages = UploadPages::new(api, playlist_id);

    while let Some(ids) = pages.next_page().await {
        let details = match api.videos(&ids).await {
            Ok(resp) => resp.items,
            Err(e) => {
                warn!("Video details for page {} failed: {e}", pages.pages_fetched());
                break;
            }
        };

        for video in &details {
            let record = VideoRecord::from_video(video);
            if record.duration_seconds >= max_duration_secs {
                continue;
            }
            records.push(record);
            if records.len() >= cap {
                info!("Reached cap of {cap} after {} pages", pages.pages_fetched());
                return records;
            }
        }
    }

    info!("Collected {} videos from {} pages of {playlist_id}", records.len(), pages.pages_fetched());
    records
}
