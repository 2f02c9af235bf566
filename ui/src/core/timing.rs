//! Wall-clock helpers: capture timestamps, timers, and human-readable ages.

use time::{macros::format_description, OffsetDateTime};

/// Current Unix time in whole seconds.
pub fn now_unix_seconds() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// `2026-10-19 14:05 UTC`, or `-` for timestamps out of range.
pub fn format_utc(seconds: i64) -> String {
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .and_then(|ts| {
            ts.format(&format_description!(
                "[year]-[month]-[day] [hour]:[minute] UTC"
            ))
            .ok()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Compact age: `<1m`, `12m`, `5h`, `2d 3h`. Future timestamps read as `<1m`.
pub fn human_age(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        return "<1m".into();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    if hours < 48 {
        return format!("{hours}h");
    }
    let days = hours / 24;
    let rem_hours = hours % 24;
    if rem_hours == 0 {
        format!("{days}d")
    } else {
        format!("{days}d {rem_hours}h")
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(ms: u32) {
    tokio::time::sleep(std::time::Duration::from_millis(u64::from(ms))).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_seconds_in_utc() {
        assert_eq!(format_utc(1_700_000_000), "2023-11-14 22:13 UTC");
    }

    #[test]
    fn ages_are_compact() {
        assert_eq!(human_age(-5), "<1m");
        assert_eq!(human_age(59), "<1m");
        assert_eq!(human_age(60 * 7), "7m");
        assert_eq!(human_age(3600 * 5 + 120), "5h");
        assert_eq!(human_age(3600 * 48), "2d");
        assert_eq!(human_age(3600 * 51), "2d 3h");
    }

    #[test]
    fn out_of_range_timestamp_is_a_dash() {
        assert_eq!(format_utc(i64::MAX), "-");
    }
}
