pub mod media_models;
pub mod youtube;

pub use media_models::{DownloadedTrack, MediaDownloader, MediaError, TrackMetadata};
