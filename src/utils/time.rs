/// Format seconds to HH:MM:SS or MM:SS clock text
pub fn format_time(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0).floor() as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format seconds to the player's timestamp form (e.g. "1h23m45s").
/// Used both for the embed start parameter and for shareable watch links.
pub fn format_twitch_timestamp(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0).floor() as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{}h{}m{}s", hours, minutes, secs)
}

/// Parse a duration string like "3h21m10s" (any component optional) to seconds.
/// A bare number is taken as seconds. Returns None when nothing could be read
/// or the total does not fit.
pub fn parse_twitch_duration(duration: &str) -> Option<f64> {
    let duration = duration.trim();
    if let Ok(secs) = duration.parse::<f64>() {
        return (secs.is_finite() && secs >= 0.0).then_some(secs);
    }

    let mut total = 0u64;
    let mut digits = String::new();
    let mut matched = false;

    for ch in duration.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let unit = match ch {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        let value: u64 = digits.parse().ok()?;
        total = value.checked_mul(unit)?.checked_add(total)?;
        digits.clear();
        matched = true;
    }

    if !digits.is_empty() || !matched {
        return None;
    }
    Some(total as f64)
}

/// Compact duration for chapter summaries: "1h05m", "5m03s" or "42s"
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0).floor() as u64;
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;

    if h > 0 {
        format!("{}h{:02}m", h, m)
    } else if m > 0 {
        format!("{}m{:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Public watch link for a video at a given offset
pub fn watch_url(video_id: &str, seconds: f64) -> String {
    format!(
        "https://www.twitch.tv/videos/{}?t={}",
        video_id,
        format_twitch_timestamp(seconds)
    )
}
