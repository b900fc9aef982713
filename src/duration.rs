use std::sync::LazyLock;

use log::debug;
use regex::Regex;

static ISO8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$").expect("valid duration regex")
});

/// Parse an ISO-8601 duration (`PT1H2M3S`, `P1DT4H`) into whole seconds.
///
/// Malformed input yields 0 rather than an error, so such videos pass every
/// "shorter than" filter.
pub fn parse_iso8601(duration: &str) -> u64 {
    let duration = duration.trim();
    let Some(caps) = ISO8601.captures(duration) else {
        debug!("Malformed duration {duration:?}, treating as 0s");
        return 0;
    };

    // Absent components count as zero; a component or total that does not fit in u64 is malformed
    let part = |i: usize| -> Option<u64> { caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok()) };
    let total = [(1, 86_400), (2, 3_600), (3, 60), (4, 1)]
        .into_iter()
        .try_fold(0u64, |acc, (i, unit)| part(i)?.checked_mul(unit)?.checked_add(acc));

    total.unwrap_or_else(|| {
        debug!("Duration {duration:?} overflows, treating as 0s");
        0
    })
}

/// Render seconds as `1h 2m 3s`, `2m 3s` or `3s`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
