use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Whole seconds between `start` and `end`, zero when `end` is earlier.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let secs = (end - start).num_seconds();
    u32::try_from(secs.max(0)).unwrap_or(u32::MAX)
}

/// `m:ss`, or `h:mm:ss` once an hour or more remains.
pub fn format_countdown(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
