use crate::core::media::youtube::{downloadable_video_id, extract_video_id, format_duration};
use crate::core::media::{DownloadedTrack, MediaDownloader, MediaError, TrackMetadata};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;

const UNKNOWN_TITLE: &str = "Unknown title";
const UNKNOWN_DURATION: &str = "Unknown";

/// The subset of yt-dlp's `--dump-json` output we keep.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct InfoJson {
    title: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
}

/// Runs the `yt-dlp` binary and keeps its output in a cache directory.
///
/// Each video leaves two files behind: `{id}.opus` and `{id}.metadata.json`.
/// When both exist the download is skipped entirely.
pub struct YtDlpDownloader {
    cache_dir: PathBuf,
    binary: String,
}

impl YtDlpDownloader {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            binary: "yt-dlp".to_string(),
        }
    }

    fn audio_path(&self, video_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.opus", video_id))
    }

    fn metadata_path(&self, video_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.metadata.json", video_id))
    }

    async fn cached(&self, video_id: &str) -> Result<Option<DownloadedTrack>, MediaError> {
        let audio = self.audio_path(video_id);
        let metadata = self.metadata_path(video_id);
        if !audio.exists() || !metadata.exists() {
            return Ok(None);
        }

        let meta = match read_metadata(&metadata).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(video_id, "Unreadable metadata sidecar, downloading again: {}", e);
                return Ok(None);
            }
        };
        tracing::debug!(video_id, "Using cached download");
        Ok(Some(track_from(audio, video_id, meta)))
    }

    async fn run_downloader(&self, url: &str) -> Result<InfoJson, MediaError> {
        let template = self.cache_dir.join("%(id)s.%(ext)s");
        let output = Command::new(&self.binary)
            .args(["--no-playlist", "-f", "bestaudio/best", "-x"])
            .args(["--audio-format", "opus", "--audio-quality", "192K"])
            .arg("-o")
            .arg(&template)
            .args(["--dump-json", "--no-simulate", "--quiet", "--no-warnings"])
            .arg(url)
            .output()
            .await
            .map_err(|e| {
                MediaError::Downloader(format!("could not start {}: {}", self.binary, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::Downloader(stderr.trim().to_string()));
        }

        parse_info(&String::from_utf8_lossy(&output.stdout))
    }
}

/// yt-dlp prints one JSON object per line; the last one describes our video.
fn parse_info(stdout: &str) -> Result<InfoJson, MediaError> {
    let line = stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| MediaError::Downloader("no video information printed".to_string()))?;
    Ok(serde_json::from_str(line)?)
}

fn metadata_from(info: InfoJson) -> TrackMetadata {
    TrackMetadata {
        title: info.title,
        duration: info
            .duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| format_duration(d.round() as u64)),
        thumbnail: info.thumbnail,
    }
}

fn track_from(path: PathBuf, video_id: &str, meta: TrackMetadata) -> DownloadedTrack {
    DownloadedTrack {
        path,
        title: meta.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        duration: meta.duration.unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
        thumbnail: meta.thumbnail,
        video_id: video_id.to_string(),
    }
}

async fn read_metadata(path: &Path) -> Result<TrackMetadata, MediaError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Writes next to the target and renames, so a crash never leaves half a sidecar.
async fn write_metadata(path: &Path, meta: &TrackMetadata) -> Result<(), MediaError> {
    let json = serde_json::to_string_pretty(meta)?;
    let staging = path.with_extension("json.new");
    tokio::fs::write(&staging, json).await?;
    tokio::fs::rename(&staging, path).await?;
    Ok(())
}

#[async_trait]
impl MediaDownloader for YtDlpDownloader {
    async fn download(&self, url: &str) -> Result<DownloadedTrack, MediaError> {
        // Embed and /v/ links carry an id too; yt-dlp always gets the plain watch URL.
        let video_id = downloadable_video_id(url)
            .or_else(|| extract_video_id(url))
            .ok_or_else(|| MediaError::UnsupportedUrl(url.to_string()))?;

        if let Some(track) = self.cached(&video_id).await? {
            return Ok(track);
        }

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        tracing::info!(%video_id, "Downloading audio with yt-dlp");
        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let info = self.run_downloader(&watch_url).await?;

        let audio = self.audio_path(&video_id);
        if !audio.exists() {
            return Err(MediaError::MissingFile(audio));
        }

        let meta = metadata_from(info);
        write_metadata(&self.metadata_path(&video_id), &meta).await?;
        Ok(track_from(audio, &video_id, meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_cache_hit_skips_download() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.opus"), b"audio").unwrap();
        std::fs::write(
            dir.path().join("dQw4w9WgXcQ.metadata.json"),
            r#"{"title":"Never Gonna Give You Up","duration":"3 minutes 33 seconds"}"#,
        )
        .unwrap();

        let mut downloader = YtDlpDownloader::new(dir.path());
        // Any attempt to actually run the downloader would fail loudly.
        downloader.binary = "definitely-not-installed-yt-dlp".to_string();

        let track = downloader
            .download("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(track.title, "Never Gonna Give You Up");
        assert_eq!(track.duration, "3 minutes 33 seconds");
        assert_eq!(track.video_id, "dQw4w9WgXcQ");
        assert_eq!(track.path, dir.path().join("dQw4w9WgXcQ.opus"));
    }

    #[tokio::test]
    async fn test_audio_without_metadata_is_not_a_cache_hit() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.opus"), b"audio").unwrap();

        let mut downloader = YtDlpDownloader::new(dir.path());
        downloader.binary = "definitely-not-installed-yt-dlp".to_string();

        let err = downloader
            .download("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Downloader(_)));
    }

    #[tokio::test]
    async fn test_embed_link_resolves_to_cached_video() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.opus"), b"audio").unwrap();
        let sidecar = dir.path().join("dQw4w9WgXcQ.metadata.json");
        std::fs::write(sidecar, r#"{"title":"Song"}"#).unwrap();

        let mut downloader = YtDlpDownloader::new(dir.path());
        downloader.binary = "definitely-not-installed-yt-dlp".to_string();

        let track = downloader
            .download("https://www.youtube.com/embed/dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(track.video_id, "dQw4w9WgXcQ");
        assert_eq!(track.duration, UNKNOWN_DURATION);
    }

    #[tokio::test]
    async fn test_truncated_metadata_downloads_again() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.opus"), b"audio").unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.metadata.json"), r#"{"title":"So"#).unwrap();

        let mut downloader = YtDlpDownloader::new(dir.path());
        downloader.binary = "definitely-not-installed-yt-dlp".to_string();

        // Reaching the downloader at all means the sidecar was treated as a miss.
        let err = downloader
            .download("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Downloader(_)));
    }

    #[tokio::test]
    async fn test_write_metadata_replaces_old_sidecar() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abc.metadata.json");
        std::fs::write(&path, "garbage").unwrap();

        let meta = TrackMetadata {
            title: Some("Song".to_string()),
            duration: Some("1 minute".to_string()),
            thumbnail: None,
        };
        write_metadata(&path, &meta).await.unwrap();

        let back = read_metadata(&path).await.unwrap();
        assert_eq!(back.title.as_deref(), Some("Song"));
        assert!(!dir.path().join("abc.metadata.json.new").exists());
    }

    #[tokio::test]
    async fn test_unsupported_url() {
        let dir = TempDir::new().unwrap();
        let downloader = YtDlpDownloader::new(dir.path());
        let err = downloader
            .download("https://vimeo.com/12345")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedUrl(_)));
    }

    #[test]
    fn test_parse_info_uses_last_line() {
        let stdout = concat!(
            "{\"title\":\"playlist\"}\n",
            "{\"title\":\"Song\",\"duration\":75.4,",
            "\"thumbnail\":\"https://i.ytimg.com/x.jpg\"}\n\n",
        );
        let meta = metadata_from(parse_info(stdout).unwrap());
        assert_eq!(meta.title.as_deref(), Some("Song"));
        assert_eq!(meta.duration.as_deref(), Some("1 minute 15 seconds"));
        assert_eq!(meta.thumbnail.as_deref(), Some("https://i.ytimg.com/x.jpg"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let track = track_from(
            PathBuf::from("/tmp/x.opus"),
            "x",
            TrackMetadata {
                title: None,
                duration: None,
                thumbnail: None,
            },
        );
        assert_eq!(track.title, UNKNOWN_TITLE);
        assert_eq!(track.duration, UNKNOWN_DURATION);
    }
}
