use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use serde::Serialize;

use crate::ChannelId;
use crate::youtube::{ChannelLookup, DataApi, SearchKind, SearchQuery};

static EXPLICIT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^UC[\w-]{21}$").expect("valid channel ID regex"));

/// Channel page tabs that may trail a handle in a pasted URL
const TAB_SEGMENTS: &[&str] = &[
    "about",
    "community",
    "featured",
    "live",
    "playlists",
    "shorts",
    "streams",
    "videos",
];

/// How a channel reference will be turned into a channel ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "identifier", rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Already a channel ID; used as-is
    ExplicitId(String),
    /// Legacy `/user/<name>` username
    Username(String),
    /// `/c/<name>` custom URL or `@handle`
    CustomHandle(String),
    /// Free text
    Raw(String),
}

impl ResolutionMode {
    pub fn identifier(&self) -> &str {
        match self {
            ResolutionMode::ExplicitId(s)
            | ResolutionMode::Username(s)
            | ResolutionMode::CustomHandle(s)
            | ResolutionMode::Raw(s) => s,
        }
    }

    fn strategies(&self) -> &'static [Strategy] {
        match self {
            ResolutionMode::ExplicitId(_) => &[Strategy::Literal],
            ResolutionMode::Username(_) => &[Strategy::LegacyUsername, Strategy::ChannelSearch],
            ResolutionMode::CustomHandle(_) | ResolutionMode::Raw(_) => &[Strategy::ChannelSearch],
        }
    }
}

impl std::fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResolutionMode::ExplicitId(_) => "explicit-id",
            ResolutionMode::Username(_) => "username",
            ResolutionMode::CustomHandle(_) => "custom-handle",
            ResolutionMode::Raw(_) => "raw",
        };
        write!(f, "{name}")
    }
}

/// One step of the resolution fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Literal,
    LegacyUsername,
    ChannelSearch,
}

pub fn is_channel_id(candidate: &str) -> bool {
    EXPLICIT_ID.is_match(candidate)
}

/// Classify a free-form channel reference by its shape. No network access.
pub fn classify(reference: &str) -> ResolutionMode {
    let reference = reference.trim();

    if is_channel_id(reference) {
        return ResolutionMode::ExplicitId(reference.to_string());
    }

    let Some(segments) = path_segments(reference) else {
        return ResolutionMode::Raw(reference.trim_start_matches('@').to_string());
    };

    if let [prefix, value, ..] = segments.as_slice() {
        match *prefix {
            "channel" => return ResolutionMode::ExplicitId(value.to_string()),
            "user" => return ResolutionMode::Username(value.to_string()),
            "c" => return ResolutionMode::CustomHandle(value.to_string()),
            _ => {}
        }
    }

    let last = segments
        .iter()
        .rev()
        .find(|s| !TAB_SEGMENTS.contains(*s))
        .or(segments.last())
        .copied()
        .unwrap_or_default();

    if is_channel_id(last) {
        return ResolutionMode::ExplicitId(last.to_string());
    }

    ResolutionMode::CustomHandle(last.trim_start_matches('@').to_string())
}

/// Path segments of a URL-shaped reference, or `None` for plain text.
fn path_segments(reference: &str) -> Option<Vec<&str>> {
    let without_scheme = reference
        .strip_prefix("https://")
        .or_else(|| reference.strip_prefix("http://"));
    let has_scheme = without_scheme.is_some();
    let rest = without_scheme.unwrap_or(reference);
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    let (head, path) = match rest.split_once('/') {
        Some(parts) => parts,
        None if has_scheme => (rest, ""),
        None => return None,
    };

    // Without a host only a channel path prefix or an @handle makes this a path ("AC/DC" stays text)
    let path = if has_scheme || head.contains('.') {
        path
    } else if matches!(head, "channel" | "user" | "c") || head.starts_with('@') {
        rest
    } else {
        return None;
    };

    Some(path.split('/').filter(|s| !s.is_empty()).collect())
}

/// Resolve a channel reference to a canonical channel ID.
///
/// Explicit IDs return without any request. Request failures at a step count
/// as "no result" for that step; `None` means every applicable step came up empty.
pub async fn resolve<A: DataApi>(api: &A, reference: &str) -> Option<ChannelId> {
    let mode = classify(reference);
    debug!("Classified {reference:?} as {mode}");
    resolve_mode(api, &mode).await
}

/// The channel ID a mode names outright, when no request is needed to find it
pub fn literal(mode: &ResolutionMode) -> Option<ChannelId> {
    match mode {
        ResolutionMode::ExplicitId(id) if !id.is_empty() => Some(ChannelId::new(id.as_str())),
        _ => None,
    }
}

pub async fn resolve_mode<A: DataApi>(api: &A, mode: &ResolutionMode) -> Option<ChannelId> {
    let identifier = mode.identifier();
    if identifier.is_empty() {
        warn!("Empty channel reference");
        return None;
    }

    for strategy in mode.strategies() {
        let found = match strategy {
            Strategy::Literal => Some(identifier.to_string()),
            Strategy::LegacyUsername => lookup_username(api, identifier).await,
            Strategy::ChannelSearch => search_channel(api, identifier).await,
        };
        if let Some(id) = found {
            info!("Resolved {identifier:?} ({mode}) via {strategy:?} to {id}");
            return Some(ChannelId::new(id));
        }
        debug!("{strategy:?} found nothing for {identifier:?}");
    }

    info!("Could not resolve {identifier:?} ({mode})");
    None
}

async fn lookup_username<A: DataApi>(api: &A, username: &str) -> Option<String> {
    match api.channels(ChannelLookup::Username(username), "id").await {
        Ok(resp) => resp.items.into_iter().next().map(|c| c.id),
        Err(e) => {
            warn!("Username lookup for {username:?} failed: {e}");
            None
        }
    }
}

async fn search_channel<A: DataApi>(api: &A, query: &str) -> Option<String> {
    let query = SearchQuery {
        q: query,
        kind: SearchKind::Channel,
        channel_id: None,
        max_results: 1,
    };
    match api.search(query).await {
        Ok(resp) => resp.items.first().and_then(|r| r.channel_id()).map(str::to_string),
        Err(e) => {
            warn!("Channel search for {:?} failed: {e}", query.q);
            None
        }
    }
}
