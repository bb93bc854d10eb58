use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// An audio file ready to play or upload, plus what we know about it.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedTrack {
    pub path: PathBuf,
    pub title: String,
    /// Already formatted, e.g. "4 minutes 20 seconds".
    pub duration: String,
    pub thumbnail: Option<String>,
    pub video_id: String,
}

/// Sidecar written next to every cached download so repeat requests skip yt-dlp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub duration: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Not a supported YouTube link: {0}")]
    UnsupportedUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Downloader failed: {0}")]
    Downloader(String),

    #[error("Downloader output could not be parsed: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Downloaded file is missing: {0}")]
    MissingFile(PathBuf),
}

#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Downloads (or reuses a cached copy of) the audio of a YouTube video.
    async fn download(&self, url: &str) -> Result<DownloadedTrack, MediaError>;
}
