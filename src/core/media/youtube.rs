use regex::Regex;
use std::sync::LazyLock;

/// Links the downloader accepts: watch pages, youtu.be short links and shorts.
static DOWNLOAD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(https?://)?(www\.|m\.)?(youtube\.com/watch\?v=|youtu\.be/|youtube\.com/shorts/)([\w-]{11})",
    )
    .expect("download URL pattern is valid")
});

/// Any link shape that carries a video id (embeds, /v/, extra query params...).
static ANY_VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("video id pattern is valid")
});

/// Video id of a link the downloader will accept, or `None`.
pub fn downloadable_video_id(url: &str) -> Option<String> {
    DOWNLOAD_URL
        .captures(url)
        .and_then(|caps| caps.get(4))
        .map(|m| m.as_str().to_string())
}

/// Best-effort video id from any YouTube link.
pub fn extract_video_id(url: &str) -> Option<String> {
    ANY_VIDEO_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn unit(count: u64, singular: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}s", count, singular)
    }
}

/// Human-readable duration: `42 seconds`, `1 hour 2 minutes 5 seconds`, `3 minutes`.
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{} seconds", seconds);
    }

    let (minutes, seconds) = (seconds / 60, seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    if seconds > 0 {
        parts.push(unit(seconds, "second"));
    }
    parts.join(" ")
}
