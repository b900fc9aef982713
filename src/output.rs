use serde::Serialize;

use crate::duration::format_duration;
use crate::resolve::ResolutionMode;
use crate::search::ScoredVideo;
use crate::{ChannelId, VideoRecord};

/// Compact view/like counts: 1.2M, 3.4K, 999
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[derive(Serialize)]
struct Resolution<'a> {
    reference: &'a str,
    #[serde(flatten)]
    mode: &'a ResolutionMode,
    channel_id: Option<&'a ChannelId>,
}

pub fn render_resolution_text(mode: &ResolutionMode, channel_id: &ChannelId) -> String {
    format!("{channel_id}\t({mode}: {})", mode.identifier())
}

pub fn render_resolution_json(reference: &str, mode: &ResolutionMode, channel_id: Option<&ChannelId>) -> String {
    render_json(&Resolution {
        reference,
        mode,
        channel_id,
    })
}

/// One line per video: date, duration, views, engagement, title
pub fn render_records_text(records: &[VideoRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "{}  {:>9}  {:>7} views  {:>5.2}%  {}  {}",
                r.published_date(),
                format_duration(r.duration_seconds),
                format_number(r.view_count),
                r.engagement_rate,
                r.title,
                r.url(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A block per result with outlier score, channel average and optional comments
pub fn render_scored_text(results: &[ScoredVideo]) -> String {
    results
        .iter()
        .map(|s| {
            let r = &s.record;
            let mut block = format!(
                "{}\n  {} • {}\n  Views: {} | Duration: {}\n  Outlier: {:.1}x ({}) | Channel avg: {}\n  Engagement: {:.1}%\n  {}",
                r.title,
                r.channel_title,
                r.published_date(),
                format_number(r.view_count),
                format_duration(r.duration_seconds),
                s.outlier_multiplier,
                s.tier,
                format_number(s.channel_average_views as u64),
                r.engagement_rate,
                s.url,
            );
            match &s.top_comments {
                Some(comments) if comments.is_empty() => block.push_str("\n  No comments available"),
                Some(comments) => {
                    for c in comments {
                        block.push_str(&format!(
                            "\n    {} ({} likes, {}): {}",
                            c.author,
                            format_number(c.like_count),
                            c.published_at,
                            c.text
                        ));
                    }
                }
                None => {}
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake;
    use crate::metrics::OutlierTier;
    use crate::search::Comment;

    fn sample_record() -> VideoRecord {
        VideoRecord::from_video(&fake::video("abc", "PT3M33S", 1_500, 50, 10))
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1.0K");
        assert_eq!(format_number(12_345), "12.3K");
        assert_eq!(format_number(2_500_000), "2.5M");
    }

    #[test]
    fn test_render_records_text() {
        let output = render_records_text(&[sample_record()]);
        assert_eq!(
            output,
            "2024-01-15     3m 33s     1.5K views   4.00%  Video abc  https://www.youtube.com/watch?v=abc"
        );
    }

    #[test]
    fn test_render_records_text_empty() {
        assert_eq!(render_records_text(&[]), "");
    }

    #[test]
    fn test_render_resolution() {
        let mode = ResolutionMode::Username("olduser".to_string());
        let id = ChannelId::new("UCxyz");
        assert_eq!(render_resolution_text(&mode, &id), "UCxyz\t(username: olduser)");

        let json: serde_json::Value =
            serde_json::from_str(&render_resolution_json("youtube.com/user/olduser", &mode, Some(&id))).unwrap();
        assert_eq!(json["mode"], "username");
        assert_eq!(json["identifier"], "olduser");
        assert_eq!(json["channel_id"], "UCxyz");
    }

    #[test]
    fn test_render_scored_with_comments() {
        let scored = ScoredVideo {
            record: sample_record(),
            outlier_multiplier: 3.3,
            tier: OutlierTier::Notable,
            channel_average_views: 480.0,
            thumbnail: None,
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            top_comments: Some(vec![Comment {
                author: "@fan".to_string(),
                text: "love it".to_string(),
                like_count: 1_200,
                published_at: "2024-02-01".to_string(),
            }]),
        };
        let output = render_scored_text(&[scored]);
        assert!(output.starts_with("Video abc\n  Channel • 2024-01-15"));
        assert!(output.contains("Outlier: 3.3x (notable) | Channel avg: 480"));
        assert!(output.contains("@fan (1.2K likes, 2024-02-01): love it"));
    }

    #[test]
    fn test_render_scored_json_flattens_record() {
        let scored = ScoredVideo {
            record: sample_record(),
            outlier_multiplier: 12.0,
            tier: OutlierTier::Viral,
            channel_average_views: 100.0,
            thumbnail: Some("https://i.ytimg.com/h.jpg".to_string()),
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            top_comments: None,
        };
        let json: serde_json::Value = serde_json::from_str(&render_json(&[scored])).unwrap();
        assert_eq!(json[0]["id"], "abc");
        assert_eq!(json[0]["tier"], "viral");
        assert!(json[0].get("top_comments").is_none());
    }
}
