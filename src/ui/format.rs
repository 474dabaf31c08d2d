//! Text formatting helpers for list rows.

use chrono::{DateTime, TimeZone, Utc};

/// Human-friendly age of `then` relative to `now` ("3h ago").
pub fn relative_time<Tz: TimeZone>(then: &DateTime<Tz>, now: DateTime<Utc>) -> String {
    let seconds = (now - then.with_timezone(&Utc)).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else if weeks < 52 {
        format!("{}w ago", weeks)
    } else {
        format!("{}y ago", weeks / 52)
    }
}

/// Shorten `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(relative_time(&now, now), "just now");
        assert_eq!(relative_time(&(now - Duration::minutes(5)), now), "5m ago");
        assert_eq!(relative_time(&(now - Duration::hours(3)), now), "3h ago");
        assert_eq!(relative_time(&(now - Duration::days(2)), now), "2d ago");
        assert_eq!(relative_time(&(now - Duration::days(21)), now), "3w ago");
        assert_eq!(relative_time(&(now - Duration::days(800)), now), "2y ago");
    }

    #[test]
    fn future_dates_read_as_just_now() {
        let now = Utc::now();
        assert_eq!(relative_time(&(now + Duration::hours(1)), now), "just now");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("feature/long-branch", 10), "feature...");
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }
}
