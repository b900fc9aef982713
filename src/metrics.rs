use serde::Serialize;

/// (likes + comments) / views, as a percentage. Zero when there are no views.
pub fn engagement_rate(views: u64, likes: u64, comments: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (likes as f64 + comments as f64) / views as f64 * 100.0
}

/// Average views per uploaded video for a channel
pub fn channel_average_views(view_count: u64, video_count: u64) -> f64 {
    if video_count == 0 {
        return 0.0;
    }
    view_count as f64 / video_count as f64
}

/// Engagement-adjusted views relative to the channel average.
///
/// Zero when the channel average is unknown or zero.
pub fn outlier_multiplier(views: u64, engagement_rate: f64, channel_average: f64) -> f64 {
    if channel_average <= 0.0 {
        return 0.0;
    }
    views as f64 * (1.0 + engagement_rate / 100.0) / channel_average
}

/// Bracket an outlier multiplier falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierTier {
    Normal,
    Notable,
    Strong,
    Viral,
}

impl OutlierTier {
    pub fn of(multiplier: f64) -> Self {
        if multiplier < 2.0 {
            OutlierTier::Normal
        } else if multiplier < 5.0 {
            OutlierTier::Notable
        } else if multiplier < 10.0 {
            OutlierTier::Strong
        } else {
            OutlierTier::Viral
        }
    }
}

impl std::fmt::Display for OutlierTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutlierTier::Normal => write!(f, "normal"),
            OutlierTier::Notable => write!(f, "notable"),
            OutlierTier::Strong => write!(f, "strong"),
            OutlierTier::Viral => write!(f, "viral"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_rate() {
        let rate = engagement_rate(1000, 50, 10);
        assert!((rate - 6.0).abs() < 1e-9);
        assert_eq!(format!("{rate:.2}"), "6.00");
    }

    #[test]
    fn test_engagement_rate_zero_views() {
        assert_eq!(engagement_rate(0, 0, 0), 0.0);
        assert_eq!(engagement_rate(0, 500, 20), 0.0);
    }

    #[test]
    fn test_engagement_rate_huge_counts() {
        let rate = engagement_rate(u64::MAX, u64::MAX, u64::MAX);
        assert!((rate - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_channel_average_views() {
        assert_eq!(channel_average_views(5000, 10), 500.0);
        assert_eq!(channel_average_views(5000, 0), 0.0);
    }

    #[test]
    fn test_outlier_multiplier() {
        // 1000 views at 6% engagement against a 500 view average
        let m = outlier_multiplier(1000, 6.0, 500.0);
        assert!((m - 2.12).abs() < 1e-9);
    }

    #[test]
    fn test_outlier_multiplier_unknown_average() {
        assert_eq!(outlier_multiplier(1000, 6.0, 0.0), 0.0);
    }

    #[test]
    fn test_outlier_tier_brackets() {
        assert_eq!(OutlierTier::of(0.0), OutlierTier::Normal);
        assert_eq!(OutlierTier::of(1.99), OutlierTier::Normal);
        assert_eq!(OutlierTier::of(2.0), OutlierTier::Notable);
        assert_eq!(OutlierTier::of(4.9), OutlierTier::Notable);
        assert_eq!(OutlierTier::of(5.0), OutlierTier::Strong);
        assert_eq!(OutlierTier::of(10.0), OutlierTier::Viral);
        assert_eq!(OutlierTier::Viral.to_string(), "viral");
    }
}
