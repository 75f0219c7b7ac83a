//! Downloads a single track and hands the finished file to the tagger.

use crate::app::tags;
use crate::filename;
use crate::metadata::Track;
use crate::youtube_downloader::{DownloadProgress, YoutubeDownloader};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{info, warn};

const CALLBACK_CHANNEL_SIZE: usize = 64;
/// Only log every this-many percent of progress, to keep playlist output
/// readable.
const PROGRESS_LOG_STEP: u64 = 25;

/// A failure downloading one track. Isolated per item - the caller decides
/// whether the batch continues.
#[derive(Debug)]
pub enum TrackDownloadError<E> {
    Backend(E),
    Rename(std::io::Error),
}

impl<E: Display> Display for TrackDownloadError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackDownloadError::Backend(e) => write!(f, "{e}"),
            TrackDownloadError::Rename(e) => write!(f, "Error moving file into place <{e}>"),
        }
    }
}

/// Download `track` into `out_dir`, rename it to its final
/// `{title} By {channel} ~ {display name}.mp3` name, and tag it.
///
/// Tagging failures are logged but do not fail the track - the audio itself
/// arrived intact.
pub async fn download_and_tag<T>(
    backend: &T,
    track: &Track,
    out_dir: &Path,
    display_name: &str,
) -> Result<PathBuf, TrackDownloadError<T::Error>>
where
    T: YoutubeDownloader,
    T::Error: Display,
{
    info!("Downloading \"{}\"", track.title);
    let (tx, rx) = mpsc::channel(CALLBACK_CHANNEL_SIZE);
    let progress_logger = tokio::spawn(log_progress(
        ReceiverStream::new(rx),
        track.title.clone(),
    ));
    let produced = backend
        .download_audio(
            track.video_id.clone(),
            out_dir.to_path_buf(),
            track.video_id.clone(),
            tx,
        )
        .await
        .map_err(TrackDownloadError::Backend)?;
    // The backend dropped its sender, so the logger is already winding down.
    let _ = progress_logger.await;
    let final_path = out_dir.join(filename::track_filename(
        &track.title,
        &track.channel,
        display_name,
    ));
    fs_err::tokio::rename(&produced, &final_path)
        .await
        .map_err(TrackDownloadError::Rename)?;
    if let Err(e) = tags::write_tags(&final_path, track) {
        warn!("Failed to tag {} <{e}>", final_path.display());
    }
    info!("Finished \"{}\"", track.title);
    Ok(final_path)
}

async fn log_progress(mut progress: ReceiverStream<DownloadProgress>, title: String) {
    let mut last_logged = 0;
    while let Some(update) = progress.next().await {
        let Some(total) = update.total_size_bytes.filter(|total| *total > 0) else {
            continue;
        };
        let percent = update.bytes_downloaded * 100 / total;
        if percent >= last_logged + PROGRESS_LOG_STEP {
            info!("\"{title}\" - {percent}% downloaded");
            last_logged = percent;
        }
    }
}
