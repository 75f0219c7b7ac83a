//! Pluggable backends that turn a video id into an audio file on disk.
//!
//! All of the protocol work - stream extraction, format selection, any
//! conversion - belongs to the backend's wrapped library, never to this
//! crate.

use std::future::Future;
use std::path::PathBuf;
use tokio::sync::mpsc;

pub mod native;
pub mod yt_dlp;

/// Progress report sent by a backend while a download is in flight.
#[derive(Debug, Clone, Copy)]
pub struct DownloadProgress {
    pub bytes_downloaded: u64,
    pub total_size_bytes: Option<u64>,
}

pub trait YoutubeDownloader {
    type Error;
    /// Download the audio track for `video_id` into `dest_dir`, using `stem`
    /// as the file stem. Returns the path of the file that was produced; the
    /// caller owns renaming it into place.
    fn download_audio(
        &self,
        video_id: String,
        dest_dir: PathBuf,
        stem: String,
        progress: mpsc::Sender<DownloadProgress>,
    ) -> impl Future<Output = Result<PathBuf, Self::Error>> + Send;
}
