pub mod ytdlp_downloader;

pub use ytdlp_downloader::YtDlpDownloader;
